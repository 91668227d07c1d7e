//! `briefcast render` — Print a rendered briefing without the HTTP layer.

use std::path::Path;

use briefcast_gateway::FlashBriefingResponder;

pub async fn run(config_path: &Path, briefing_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let responder = FlashBriefingResponder::from_config(&config)?;

    let items = responder.render(briefing_id)?;
    println!("{}", serde_json::to_string_pretty(&items)?);

    Ok(())
}
