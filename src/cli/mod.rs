pub mod commands;

use clap::{Parser, Subcommand};
use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "news-sweep")]
#[command(about = "Sweep RSS/Atom news feeds into a deduplicated article store")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NEWS_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Ingest the newest entries of every configured feed
    Update,

    /// Delete the oldest articles, up to the retention bound
    Cleanup,

    /// Show the most recent articles
    Recent {
        /// Number of articles to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// One line per article
        #[arg(long)]
        compact: bool,
    },

    /// Show store status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Commands::Completions { shell } = self.command {
            commands::generate_completions(shell);
            return Ok(());
        }

        if let Commands::Init { force } = self.command {
            commands::init_logging(&Default::default(), self.debug, self.verbose)?;
            return commands::init(self.config, force);
        }

        let config = Config::resolve(self.config.as_deref())?;
        commands::init_logging(&config.logging, self.debug, self.verbose)?;

        match self.command {
            Commands::Update => commands::update(&config).await,
            Commands::Cleanup => commands::cleanup(&config).await,
            Commands::Recent { limit, compact } => commands::recent(&config, limit, compact).await,
            Commands::Status => commands::status(&config).await,
            Commands::Init { .. } | Commands::Completions { .. } => Ok(()),
        }
    }
}
