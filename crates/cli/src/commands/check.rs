//! `briefcast check` — Validate configuration and list briefings.

use std::path::Path;

use briefcast_config::AppConfig;
use briefcast_core::BriefingEntry;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Briefcast Check");
    println!("==================\n");

    let mut issues = 0;

    if !config_path.exists() {
        println!(
            "  ❌ No config file at {} — run `briefcast init`",
            config_path.display()
        );
        return Ok(());
    }

    let config = match AppConfig::load_with_env(config_path) {
        Ok(config) => {
            println!("  ✅ Config file valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            return Ok(());
        }
    };

    if config.password().is_some() {
        println!("  ✅ Flash briefing password set");
    } else {
        println!("  ⚠️  No flash_briefings.password — every request will be rejected");
        issues += 1;
    }

    let briefings = config.briefings();
    if briefings.is_empty() {
        println!("  ⚠️  No flash briefings configured");
        issues += 1;
    }
    for (briefing_id, entry) in &briefings {
        match entry {
            BriefingEntry::Items(items) => {
                println!("  ✅ {briefing_id}: {} item(s)", items.len());
            }
            BriefingEntry::Malformed(_) => {
                let reason = entry.malformed_reason().unwrap_or_default();
                println!("  ⚠️  {briefing_id}: {reason}, will answer 404");
                issues += 1;
            }
        }
    }

    println!();
    let gateway = &config.gateway;
    println!("   Gateway:   {}:{}", gateway.host, gateway.port);
    println!("   Variables: {}", config.templates.variables.len());

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
