mod config;
mod config_cmd;
mod extract_cmd;
mod serve;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use odolog_logging::{init_console_logger, init_logger};
use tracing::info;

#[derive(Parser)]
#[command(name = "odolog")]
#[command(about = "Odometer bot: records drivers' mileage readings from chat into a ledger")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $ODOLOG_CONFIG_DIR/config.yaml or ~/.odolog/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and start recording odometer commands
    Serve,
    /// Extract date, time, and location from a photo or recognized-text file
    Extract {
        /// Image (run through OCR) or plain text file
        file: PathBuf,
    },
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
    /// Check the effective config and report problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = config::load(cli.config.as_deref()).await?;
    let logging = loaded.config.logging.clone().unwrap_or_default();
    let level = logging.level.as_deref().unwrap_or("info");

    match cli.command {
        Commands::Serve => {
            match &logging.dir {
                Some(dir) => init_logger(dir, level),
                None => init_console_logger(level),
            }
            info!(config = %loaded.path.display(), "Configuration loaded");
            serve::run(loaded.config).await?;
        }
        Commands::Extract { file } => {
            init_console_logger("warn");
            let ocr = loaded.config.ocr.clone().unwrap_or_default();
            extract_cmd::run(&file, &ocr).await?;
        }
        Commands::Config { action } => {
            init_console_logger("warn");
            match action {
                ConfigAction::Show => config_cmd::show(&loaded)?,
                ConfigAction::Validate => config_cmd::validate_cmd(&loaded)?,
            }
        }
    }

    Ok(())
}
