//! `briefcast init` — First-time setup.

use std::path::Path;

use briefcast_config::AppConfig;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("📰 Briefcast — First-Time Setup");
    println!("===============================\n");

    if AppConfig::write_default(config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!(
            "   1. Edit {} and change flash_briefings.password",
            config_path.display()
        );
        println!("   2. Run: briefcast check");
        println!("   3. Run: briefcast serve\n");
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
    }

    Ok(())
}
