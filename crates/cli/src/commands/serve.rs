//! `briefcast serve` — Start the HTTP gateway.

use std::path::Path;

use briefcast_gateway::{BRIEFINGS_ENDPOINT, PASSWORD_PARAM};

pub async fn run(
    config_path: &Path,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📰 Briefcast Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    for briefing_id in config.briefings().keys() {
        let path = BRIEFINGS_ENDPOINT.replace("{briefing_id}", briefing_id);
        println!(
            "   Feed:      http://{}:{}{path}?{PASSWORD_PARAM}=…",
            config.gateway.host, config.gateway.port
        );
    }
    println!(
        "   Legacy Alexa route: {}",
        if config.gateway.legacy_alexa_route { "on" } else { "off" }
    );

    briefcast_gateway::start(config).await?;

    Ok(())
}
