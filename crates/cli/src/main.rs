//! Briefcast CLI — the main entry point.
//!
//! Commands:
//! - `init`    — Create the config directory and a starter config
//! - `serve`   — Start the HTTP gateway serving flash briefings
//! - `check`   — Validate config and list configured briefings
//! - `render`  — Render one briefing to stdout, bypassing HTTP

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "briefcast",
    about = "Briefcast — authenticated flash briefing feeds",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config.toml (defaults to ~/.briefcast/config.toml)
    #[arg(short, long, global = true, env = "BRIEFCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config directory and a starter config.toml
    Init,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration and list briefings
    Check,

    /// Render a briefing as JSON without going through HTTP
    Render {
        /// Briefing id, as configured under [flash_briefings]
        briefing_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = commands::config_path(cli.config);

    match cli.command {
        Commands::Init => commands::init::run(&config_path).await?,
        Commands::Serve { port } => commands::serve::run(&config_path, port).await?,
        Commands::Check => commands::check::run(&config_path).await?,
        Commands::Render { briefing_id } => {
            commands::render::run(&config_path, &briefing_id).await?
        }
    }

    Ok(())
}
