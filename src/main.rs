use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatmap::cli::{run_config, run_index, OutputFormat};
use chatmap::Config;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    env!("CHATMAP_VERSION_SUFFIX")
);

#[derive(Parser)]
#[command(name = "chatmap")]
#[command(author, version = VERSION, about = "chatmap - minimap navigation for chat transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open transcripts in the terminal viewer (Tab switches between files)
    View {
        /// JSON Lines transcript files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the index of user messages in a transcript
    Index {
        /// JSON Lines transcript file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the configuration file and effective settings
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Log to a file while the viewer owns the terminal, to stderr otherwise
fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let filter = if verbose { "chatmap=debug" } else { "chatmap=info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if to_file {
        let log_path = Config::data_dir()?.join("chatmap.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, matches!(cli.command, Commands::View { .. }))?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    match cli.command {
        Commands::View { files } => {
            let config = Config::load_from(&config_path)?;
            tracing::info!("Opening {} transcript(s)", files.len());
            chatmap::tui::run_viewer(files, config).await?;
        }
        Commands::Index { file, format } => {
            let config = Config::load_from(&config_path)?;
            run_index(&file, format, config.minimap.preview_chars)?;
        }
        Commands::Config { init } => {
            run_config(&config_path, init)?;
        }
    }

    Ok(())
}
