//! Observable log events
//!
//! Every log line names one of these events. They describe what the
//! process did and are unrelated to the causal `events::EventRecord`s
//! that the document core records.

use std::fmt;

/// Observable events in vellum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Transactions
    TransactionCommitted,
    TransactionRolledBack,

    // Access
    AccessDenied,
    GrantChanged,

    // Documents
    DocumentCreated,
    VersionCreated,
    VersionActivated,
    VersionEdited,

    // Cache
    CacheHit,
    CacheGenerated,
    CacheGenerationFailed,
    CachePurged,

    // Event log
    EventJournalReplayed,
    EventJournalFailed,
    EventHistoryDetached,

    // Export
    ExportScheduled,
    ExportCompleted,
    ExportFailed,
    DownloadFilesExpired,

    // Requests
    RequestRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "VELLUM_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "VELLUM_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::TransactionCommitted => "TRANSACTION_COMMITTED",
            Event::TransactionRolledBack => "TRANSACTION_ROLLED_BACK",

            Event::AccessDenied => "ACCESS_DENIED",
            Event::GrantChanged => "ACL_GRANT_CHANGED",

            Event::DocumentCreated => "DOCUMENT_CREATED",
            Event::VersionCreated => "VERSION_CREATED",
            Event::VersionActivated => "VERSION_ACTIVATED",
            Event::VersionEdited => "VERSION_EDITED",

            Event::CacheHit => "CACHE_HIT",
            Event::CacheGenerated => "CACHE_GENERATED",
            Event::CacheGenerationFailed => "CACHE_GENERATION_FAILED",
            Event::CachePurged => "CACHE_PURGED",

            Event::EventJournalReplayed => "EVENT_JOURNAL_REPLAYED",
            Event::EventJournalFailed => "EVENT_JOURNAL_FAILED",
            Event::EventHistoryDetached => "EVENT_HISTORY_DETACHED",

            Event::ExportScheduled => "EXPORT_SCHEDULED",
            Event::ExportCompleted => "EXPORT_COMPLETE",
            Event::ExportFailed => "EXPORT_FAILED",
            Event::DownloadFilesExpired => "DOWNLOAD_FILES_EXPIRED",

            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
