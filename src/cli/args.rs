//! CLI argument definitions using clap
//!
//! Commands:
//! - vellum init --config <path>
//! - vellum serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vellum - permission-gated versioned document store
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./vellum.json")]
        config: PathBuf,
    },

    /// Serve JSON requests from stdin, one per line
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./vellum.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
