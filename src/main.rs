//! terrarium - Terraform front-end
//!
//! Command-line entry point: parses arguments, loads configuration, sets up
//! logging and runs the selected command.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terrarium::cli::Cli;
use terrarium::config;
use terrarium::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config().await?;

    init_logging(cli.debug || config.debug);
    info!("Starting terrarium");

    cli.execute(config).await?;

    Ok(())
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "terrarium=debug" } else { "terrarium=info" };

    // Ignore a second initialization
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
