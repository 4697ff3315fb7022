//! CLI module for vellum
//!
//! Provides command-line interface for:
//! - init: Create the data directory layout
//! - serve: Boot the services and answer JSON requests on stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, init, run, run_command, serve, CacheConfig, Config, ExportConfig};
pub use errors::{CliError, CliResult};
