use clap::{Parser, Subcommand};
use std::path::PathBuf;

use blade_config::{BladeConfig, ConfigLoader};
use blade_core::BladeError;

mod inspect;
mod remote;
mod start;

/// blade: behavior scheduler for a remotely coordinated device
#[derive(Parser)]
#[command(name = "blade", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to blade.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the blade until interrupted
    Start {
        /// Identity to use instead of blade.name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List discovered behaviors with their priority and capabilities
    Behaviors,
    /// Poll the coordination service once and show this blade's pending pair
    Poll,
    /// Send a response as this blade
    Send {
        /// Response text
        text: String,
    },
    /// Show how a message payload is normalized and matched
    Inspect {
        /// Message payload
        text: String,
        /// Keyword that must appear as a whole word (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> blade_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        init_tracing(&config, self.log_level(&config));

        match self.command {
            Commands::Start { name } => start::cmd_start(config, name).await,
            Commands::Behaviors => start::cmd_behaviors(&config),
            Commands::Poll => remote::cmd_poll(config).await,
            Commands::Send { text } => remote::cmd_send(config, &text).await,
            Commands::Inspect { text, keywords } => {
                inspect::cmd_inspect(&config, &text, &keywords);
                Ok(())
            }
            Commands::Config { json } => cmd_config(&config, json),
        }
    }

    /// --verbose > --quiet > --log-level > logging.level
    fn log_level<'a>(&'a self, config: &'a BladeConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        }
    }
}

fn init_tracing(config: &BladeConfig, log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn cmd_config(config: &BladeConfig, json: bool) -> blade_core::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!(
            "{}",
            toml::to_string_pretty(config).map_err(|e| BladeError::Config(e.to_string()))?
        );
    }
    Ok(())
}
