//! Main entry point for the Flutter build step

use clap::Parser;
use color_eyre::eyre::Result;
use flutter_step_config::Config;
use tracing_subscriber::EnvFilter;

mod error;
mod export;
mod flutter;
mod step;

use error::CONFIG_EXIT_CODE;

/// Flutter build step - install the SDK, run Flutter commands and deploy
/// the build artifacts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet)?;

    // Step inputs come from the environment, not the command line.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(CONFIG_EXIT_CODE);
        }
    };
    config.print();

    if let Err(e) = step::run(config).await {
        tracing::error!("Step failed: {e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn setup_logging(verbose: u8, quiet: u8) -> Result<()> {
    let log_level = match (verbose, quiet) {
        (0, 0) => "info",
        (1, 0) => "debug",
        (v, 0) if v >= 2 => "trace",
        (0, 1) => "warn",
        (0, 2) => "error",
        (0, q) if q > 2 => "off",
        _ => "info", // If both are set, default to info
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
