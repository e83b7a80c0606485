//! CLI argument parsing using clap derive

use super::Config;
use crate::types::MirrorError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mirror versioned library folders locally and catalog their artifacts
#[derive(Parser, Debug)]
#[command(name = "pbmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file; flags below override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Origin root holding one folder per version
    #[arg(long, global = true)]
    pub origin: Option<PathBuf>,

    /// Local mirror root
    #[arg(long, global = true)]
    pub mirror: Option<PathBuf>,

    /// Version tags to process, in order (comma separated or repeated)
    #[arg(short, long = "group", global = true, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Artifact extension to catalog
    #[arg(short, long, global = true)]
    pub extension: Option<String>,

    /// Versions synchronized concurrently
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Append warnings and errors to this file as JSON lines
    #[arg(long, global = true)]
    pub failure_log: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bring the mirror up to date with the origin
    Sync,

    /// Sync, then catalog the artifacts of every synced version
    Scan {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Catalog the artifacts already in the mirror, without syncing
    Index {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

impl TryFrom<&Cli> for Config {
    type Error = MirrorError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let mut config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(origin) = &cli.origin {
            config.origin_root = origin.clone();
        }
        if let Some(mirror) = &cli.mirror {
            config.mirror_root = mirror.clone();
        }
        if !cli.groups.is_empty() {
            config.group_tags = cli.groups.clone();
        }
        if let Some(extension) = &cli.extension {
            config.extension = extension.clone();
        }
        if let Some(threads) = cli.threads {
            config.threads = threads.max(1);
        }
        if let Some(path) = &cli.failure_log {
            config.failure_log = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
