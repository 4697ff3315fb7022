//! Service wiring
//!
//! Builds every subsystem over one storage backend and one event log, and
//! hands back the export worker for the caller to run.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::access::{AccessGuard, AclStore, MemoryAcl};
use crate::documents::{PageRenderer, RenderSpec, StubRenderer, VersionRegistry};
use crate::events::EventLog;
use crate::export::{DownloadFileStore, ExportOutcome, ExportPipeline, ExportWorker};
use crate::file_caching::{CachePartitionStore, DEFAULT_MAX_ARTIFACT_BYTES};
use crate::file_storage::{MemoryBackend, StorageBackend};
use crate::observability::MetricsRegistry;

/// Tunables applied while wiring
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub render: RenderSpec,
    pub max_artifact_bytes: u64,
    pub download_expiry_secs: Option<u64>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            render: RenderSpec::default(),
            max_artifact_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
            download_expiry_secs: None,
        }
    }
}

/// Everything a request handler needs
#[derive(Debug)]
pub struct Services {
    pub metrics: Arc<MetricsRegistry>,
    pub guard: Arc<AccessGuard>,
    pub events: EventLog,
    pub cache: Arc<CachePartitionStore>,
    pub registry: Arc<VersionRegistry>,
    pub downloads: Arc<DownloadFileStore>,
    pub exports: ExportPipeline,
}

/// Background half returned by `Services::build`
#[derive(Debug)]
pub struct ExportRuntime {
    pub worker: ExportWorker,
    pub monitor: mpsc::UnboundedReceiver<ExportOutcome>,
}

impl Services {
    /// Wire the subsystems with the stub renderer and an in-memory ACL
    pub fn build(
        backend: Arc<dyn StorageBackend>,
        events: EventLog,
        options: ServiceOptions,
    ) -> (Self, ExportRuntime) {
        Self::build_with(
            backend,
            Arc::new(MemoryAcl::new()),
            Arc::new(StubRenderer::new()),
            events,
            options,
        )
    }

    /// Wire the subsystems around external collaborators
    pub fn build_with(
        backend: Arc<dyn StorageBackend>,
        acl: Arc<dyn AclStore>,
        renderer: Arc<dyn PageRenderer>,
        events: EventLog,
        options: ServiceOptions,
    ) -> (Self, ExportRuntime) {
        let metrics = Arc::new(MetricsRegistry::new());
        let events = events.with_metrics(Arc::clone(&metrics));
        let guard = Arc::new(AccessGuard::new(acl, Arc::clone(&metrics)));

        let cache = Arc::new(
            CachePartitionStore::new(Arc::clone(&backend), Arc::clone(&guard), Arc::clone(&metrics))
                .with_max_artifact_bytes(options.max_artifact_bytes),
        );
        let registry = Arc::new(
            VersionRegistry::new(
                Arc::clone(&backend),
                Arc::clone(&guard),
                events.clone(),
                Arc::clone(&cache),
                renderer,
            )
            .with_render_spec(options.render),
        );
        let downloads = Arc::new(DownloadFileStore::new(backend, Arc::clone(&guard)));

        let (exports, queue) =
            ExportPipeline::new(Arc::clone(&guard), Arc::clone(&registry), Arc::clone(&metrics));
        let (worker, monitor) = ExportWorker::new(
            Arc::clone(&registry),
            Arc::clone(&downloads),
            events.clone(),
            Arc::clone(&metrics),
            queue,
        );
        let worker = worker.with_expiry_secs(options.download_expiry_secs);

        (
            Self {
                metrics,
                guard,
                events,
                cache,
                registry,
                downloads,
                exports,
            },
            ExportRuntime { worker, monitor },
        )
    }

    /// Fully in-memory wiring
    pub fn in_memory() -> (Self, ExportRuntime) {
        Self::build(
            Arc::new(MemoryBackend::new()),
            EventLog::in_memory(),
            ServiceOptions::default(),
        )
    }
}
