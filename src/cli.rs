//! Command-line interface for matomo-config.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect, validate and maintain Matomo `*.ini.php` configuration files.
#[derive(Parser, Debug)]
#[command(name = "matomo-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace).
    ///
    /// Without this flag `RUST_LOG` is honoured, defaulting to `info`.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate a configuration file.
    Check {
        /// Base configuration, e.g. `config/global.ini.php`.
        file: PathBuf,

        /// Local settings merged over the base file.
        #[arg(long = "override", value_name = "PATH")]
        overlay: Option<PathBuf>,

        /// Fail on warnings too.
        #[arg(long)]
        strict: bool,
    },

    /// Print the (merged) configuration.
    Dump {
        file: PathBuf,

        #[arg(long = "override", value_name = "PATH")]
        overlay: Option<PathBuf>,

        /// Print JSON instead of INI text.
        #[arg(long)]
        json: bool,
    },

    /// Print a single setting. List items are printed one per line.
    Get {
        file: PathBuf,
        section: String,
        key: String,

        #[arg(long = "override", value_name = "PATH")]
        overlay: Option<PathBuf>,
    },

    /// Drop plugins whose folder is missing and register core plugins.
    #[command(name = "prune-plugins")]
    PrunePlugins {
        /// Configuration file to rewrite in place.
        file: PathBuf,

        /// Directory holding one folder per plugin.
        plugins_dir: PathBuf,

        /// Report the changes without writing the file.
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}
