use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fixture_sync::cli::Cli;
use fixture_sync::commands;
use infrastructure::AppConfig;

async fn run() -> Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,fixture_sync=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    info!(config_dir = %cli.config_dir, "Loading configuration...");
    let config = AppConfig::load(&cli.config_dir)?;

    commands::execute(cli.command, config).await
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(run()) {
        eprintln!("\n❌ CRITICAL ERROR: {:?}", e);
        eprintln!("--------------------------------------------------");
        eprintln!("fixture-sync stopped because of a fatal error.");
        std::process::exit(1);
    }
}
