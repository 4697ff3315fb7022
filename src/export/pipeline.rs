//! # Export Pipeline
//!
//! Two phases:
//! 1. `ExportPipeline::export` runs inside the request. It checks
//!    permission and registers an `ExportTask` on the request's
//!    transaction. Nothing is created or recorded.
//! 2. When the transaction commits, the task travels over a channel to the
//!    `ExportWorker`, which packages the version, stores a `DownloadFile`
//!    and records `DownloadFileCreated` followed by
//!    `DocumentVersionExported` as one chain. If the chain cannot be
//!    recorded the file is discarded.
//!
//! A rolled-back transaction never reaches the worker. Worker failures
//! are published as `ExportOutcome::Failed` and never retried.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::access::{AccessGuard, Permission, Principal};
use crate::core::{ObjectRef, Transaction};
use crate::documents::VersionRegistry;
use crate::events::{EventLink, EventLog, Verb};
use crate::observability::{Event, Logger, MetricsRegistry};

use super::download::{DownloadFile, DownloadFileStore, NewDownloadFile};
use super::errors::{ExportError, ExportResult};
use super::packer::{archive_filename, package, ExportManifest};

/// Longest representable expiry
const MAX_EXPIRY_SECS: u64 = i64::MAX as u64 / 1000;

/// Work item carried from the request to the worker
///
/// Holds identifiers only; the worker reloads everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTask {
    pub task_id: Uuid,
    pub version_id: Uuid,
    pub requested_by: Option<Uuid>,
}

/// Result of one task, published for monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    Completed { task_id: Uuid, download_file: Uuid },
    Failed { task_id: Uuid, reason: String },
}

impl ExportOutcome {
    pub fn task_id(&self) -> Uuid {
        match self {
            ExportOutcome::Completed { task_id, .. } | ExportOutcome::Failed { task_id, .. } => *task_id,
        }
    }
}

/// Request-side half of the pipeline
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    guard: Arc<AccessGuard>,
    registry: Arc<VersionRegistry>,
    metrics: Arc<MetricsRegistry>,
    sender: mpsc::UnboundedSender<ExportTask>,
}

impl ExportPipeline {
    /// Create the pipeline and the queue its worker consumes
    pub fn new(
        guard: Arc<AccessGuard>,
        registry: Arc<VersionRegistry>,
        metrics: Arc<MetricsRegistry>,
    ) -> (Self, mpsc::UnboundedReceiver<ExportTask>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                guard,
                registry,
                metrics,
                sender,
            },
            receiver,
        )
    }

    /// Schedule an export of `version_id` for after `transaction` commits
    pub fn export(
        &self,
        version_id: Uuid,
        principal: &Principal,
        transaction: &mut Transaction,
    ) -> ExportResult<ExportTask> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionExport)?;
        self.registry.fetch_version(version_id)?;

        if self.sender.is_closed() {
            return Err(ExportError::WorkerUnavailable);
        }

        let task = ExportTask {
            task_id: Uuid::new_v4(),
            version_id,
            requested_by: principal.user_id,
        };

        let sender = self.sender.clone();
        let metrics = Arc::clone(&self.metrics);
        let queued = task.clone();
        transaction.on_commit(move || {
            let task_id = queued.task_id.to_string();
            if sender.send(queued).is_ok() {
                metrics.increment_exports_scheduled();
                Logger::info(Event::ExportScheduled.as_str(), &[("task", &task_id)]);
            } else {
                metrics.increment_exports_failed();
                Logger::error(
                    Event::ExportFailed.as_str(),
                    &[("task", &task_id), ("error", "export worker unavailable")],
                );
            }
        });

        Ok(task)
    }
}

/// Background half of the pipeline
#[derive(Debug)]
pub struct ExportWorker {
    registry: Arc<VersionRegistry>,
    downloads: Arc<DownloadFileStore>,
    events: EventLog,
    metrics: Arc<MetricsRegistry>,
    expiry: Option<Duration>,
    receiver: mpsc::UnboundedReceiver<ExportTask>,
    outcomes: mpsc::UnboundedSender<ExportOutcome>,
}

impl ExportWorker {
    /// Create a worker and the channel its outcomes are published on
    pub fn new(
        registry: Arc<VersionRegistry>,
        downloads: Arc<DownloadFileStore>,
        events: EventLog,
        metrics: Arc<MetricsRegistry>,
        receiver: mpsc::UnboundedReceiver<ExportTask>,
    ) -> (Self, mpsc::UnboundedReceiver<ExportOutcome>) {
        let (outcomes, monitor) = mpsc::unbounded_channel();
        (
            Self {
                registry,
                downloads,
                events,
                metrics,
                expiry: None,
                receiver,
                outcomes,
            },
            monitor,
        )
    }

    /// Expire download files `seconds` after creation
    pub fn with_expiry_secs(mut self, seconds: Option<u64>) -> Self {
        self.expiry = seconds.map(|s| Duration::seconds(s.min(MAX_EXPIRY_SECS) as i64));
        self
    }

    /// Process tasks until every pipeline handle is dropped
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            let outcome = self.process(&task);
            // Nobody monitoring is fine
            let _ = self.outcomes.send(outcome);
        }
    }

    /// Run one task to completion and report it
    pub fn process(&self, task: &ExportTask) -> ExportOutcome {
        match self.run_task(task) {
            Ok(file) => {
                self.metrics.increment_exports_completed();
                Logger::info(
                    Event::ExportCompleted.as_str(),
                    &[
                        ("task", &task.task_id.to_string()),
                        ("version", &task.version_id.to_string()),
                        ("download_file", &file.id.to_string()),
                    ],
                );
                ExportOutcome::Completed {
                    task_id: task.task_id,
                    download_file: file.id,
                }
            }
            Err(e) => {
                self.metrics.increment_exports_failed();
                Logger::error(
                    Event::ExportFailed.as_str(),
                    &[
                        ("task", &task.task_id.to_string()),
                        ("version", &task.version_id.to_string()),
                        ("error", &e.to_string()),
                    ],
                );
                ExportOutcome::Failed {
                    task_id: task.task_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn run_task(&self, task: &ExportTask) -> ExportResult<DownloadFile> {
        let version = self.registry.fetch_version(task.version_id)?;
        let document = self.registry.fetch_document(version.document_id)?;
        let content = self.registry.read_content(&version)?;

        let now = Utc::now();
        let manifest = ExportManifest::new(&document, &version, now);
        let archive = package(&manifest, &content)?;

        let file = self.downloads.create(NewDownloadFile {
            filename: archive_filename(&document.label, version.sequence),
            label: document.label.clone(),
            data: &archive,
            created_by: task.requested_by,
            expires_at: self.expiry.and_then(|d| now.checked_add_signed(d)),
        })?;

        let chain = [
            EventLink {
                actor: file.object(),
                action_object: version.object(),
                target: file.object(),
                verb: Verb::DownloadFileCreated,
            },
            EventLink {
                actor: version.object(),
                action_object: file.object(),
                target: version.object(),
                verb: Verb::DocumentVersionExported,
            },
        ];
        if let Err(e) = self.events.record_chain(&chain) {
            self.downloads.discard(file.id);
            return Err(e.into());
        }

        Ok(file)
    }
}
