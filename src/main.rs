// src/main.rs

//! Prospector CLI
//!
//! Runs the lead-generation pipeline either behind the HTTP control
//! surface (`serve`) or once to completion in the foreground (`run`).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use prospector::{
    error::Result,
    models::Config,
    pipeline::{Pipeline, StatusCell},
    server::{self, AppState},
    storage::LocalStore,
};

/// Prospector - Outbound Lead Generation Pipeline
#[derive(Parser, Debug)]
#[command(
    name = "prospector",
    version,
    about = "Outbound lead-generation pipeline"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP control API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the full pipeline once for a query and exit
    Run {
        /// Search query for candidate organizations
        query: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let config = Arc::new(config);
            let status = Arc::new(StatusCell::new());
            let pipeline = Arc::new(Pipeline::new(Arc::clone(&config), Arc::clone(&status))?);
            let state = AppState {
                pipeline,
                status,
                store: LocalStore::new(&config.paths.data_dir),
            };

            server::serve(&config, state).await?;
        }

        Command::Run { query } => {
            config.validate()?;

            let config = Arc::new(config);
            let status = Arc::new(StatusCell::new());
            let pipeline = Pipeline::new(Arc::clone(&config), status)?;

            pipeline.run_once(&query).await?;
            log::info!("Pipeline complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }
    }

    Ok(())
}
