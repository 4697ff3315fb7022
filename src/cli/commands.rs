//! CLI command implementations
//!
//! `init` lays out the data directory. `serve` boots the services over it
//! and answers one JSON request per stdin line until EOF, then drains the
//! export queue before exiting.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiHandler, ExportRuntime, ServiceOptions, Services};
use crate::documents::RenderSpec;
use crate::events::EventLog;
use crate::file_caching::DEFAULT_MAX_ARTIFACT_BYTES;
use crate::file_storage::LocalBackend;
use crate::observability::{Event, Logger, Severity};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_json, write_response};

const OBJECTS_DIR: &str = "objects";
const JOURNAL_DIR: &str = "journal";
const JOURNAL_FILE: &str = "events.log";
const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Persist the event log to a journal (optional, default true)
    #[serde(default = "default_event_journal")]
    pub event_journal: bool,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub render: RenderSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Largest artifact a generator may produce
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_artifact_bytes: default_max_artifact_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Download file lifetime; absent means files never expire
    #[serde(default)]
    pub download_expiry_secs: Option<u64>,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_event_journal() -> bool {
    true
}
fn default_max_artifact_bytes() -> u64 {
    DEFAULT_MAX_ARTIFACT_BYTES
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let invalid = |reason: String| CliError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        config.validate().map_err(invalid)?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.data_dir.trim().is_empty() {
            return Err("data_dir must not be empty".into());
        }

        self.severity()?;

        if self.cache.max_artifact_bytes == 0 {
            return Err("cache.max_artifact_bytes must be > 0".into());
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err("render.width and render.height must be > 0".into());
        }

        if self.export.download_expiry_secs == Some(0) {
            return Err("export.download_expiry_secs must be > 0 when set".into());
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn severity(&self) -> Result<Severity, String> {
        self.log_level
            .parse()
            .map_err(|e: String| format!("Invalid log_level: {}", e))
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_path().join(JOURNAL_DIR).join(JOURNAL_FILE)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            render: self.render,
            max_artifact_bytes: self.cache.max_artifact_bytes,
            download_expiry_secs: self.export.download_expiry_secs,
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
    }
}

/// Initialize a new data directory
///
/// Creates the object store and journal directories. Writes no events.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::AlreadyInitialized {
            data_dir: data_dir.to_path_buf(),
        });
    }

    for dir in [data_dir.join(OBJECTS_DIR), data_dir.join(JOURNAL_DIR)] {
        fs::create_dir_all(&dir).map_err(|source| CliError::Layout { path: dir.clone(), source })?;
    }

    write_response(json!({"initialized": true}))?;

    Ok(())
}

/// Boot the services and answer requests from stdin
///
/// Log lines go to stderr while serving so stdout carries only responses.
/// Documents, grants and download files live in memory for the session;
/// only the event journal outlives it (see [`boot`]).
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    if !is_initialized(config.data_path()) {
        return Err(CliError::NotInitialized {
            data_dir: config.data_path().to_path_buf(),
        });
    }

    let severity = config.severity().map_err(|reason| CliError::InvalidConfig {
        path: config_path.to_path_buf(),
        reason,
    })?;
    Logger::set_stderr_only(true);
    Logger::set_min_severity(severity);
    Logger::info(Event::BootStart.as_str(), &[]);
    Logger::info(Event::ConfigLoaded.as_str(), &[("data_dir", &config.data_dir)]);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let (services, export_runtime) = boot(&config)?;
    let services = Arc::new(services);
    let ExportRuntime { worker, monitor } = export_runtime;
    // Outcomes are already logged by the worker
    drop(monitor);

    let worker_task = runtime.spawn(worker.run());
    let downloads = Arc::clone(&services.downloads);
    let sweeper = runtime.spawn(async move {
        let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = downloads.purge_expired(Utc::now()) {
                Logger::warn(
                    Event::DownloadFilesExpired.as_str(),
                    &[("error", &e.to_string())],
                );
            }
        }
    });

    let handler = ApiHandler::new(services);
    Logger::info(Event::Serving.as_str(), &[]);

    let mut result = Ok(());
    for request in read_requests() {
        match request {
            Ok(line) => {
                let response = handler.handle_json(&line);
                write_json(&response.to_json())?;
            }
            Err(e) => {
                // Unreadable stdin ends the session
                write_error(e.code(), &e.to_string())?;
                result = Err(e);
                break;
            }
        }
    }

    // Closing the queue lets the worker finish what was committed
    drop(handler);
    if let Err(e) = runtime.block_on(worker_task) {
        Logger::error(Event::ExportFailed.as_str(), &[("error", &e.to_string())]);
    }
    sweeper.abort();
    Logger::info(Event::ShutdownComplete.as_str(), &[]);

    result
}

/// Wire the services over an initialized data directory
///
/// The registries start empty on every boot while the journal replays the
/// history of earlier sessions. Replayed records therefore name documents,
/// versions and download files this process does not hold; they stay
/// queryable as history, and a lookup of the ids they mention is a 404.
/// A non-empty replay is logged at WARN so operators see the split.
pub fn boot(config: &Config) -> CliResult<(Services, ExportRuntime)> {
    let data_dir = config.data_path();
    let backend = Arc::new(LocalBackend::new(data_dir.join(OBJECTS_DIR)));

    let events = if config.event_journal {
        let path = config.journal_path();
        EventLog::open(&path).map_err(|source| CliError::Journal { path, source })?
    } else {
        EventLog::in_memory()
    };

    let replayed = events.len();
    if replayed > 0 {
        Logger::warn(
            Event::EventHistoryDetached.as_str(),
            &[
                ("records", &replayed.to_string()),
                ("journal", &config.journal_path().display().to_string()),
            ],
        );
    }

    Ok(Services::build(backend, events, config.service_options()))
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(OBJECTS_DIR).exists() && data_dir.join(JOURNAL_DIR).exists()
}
