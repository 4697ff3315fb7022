//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Typed log events
//!
//! # Usage
//!
//! ```ignore
//! use vellum::observability::{Event, Logger};
//!
//! Logger::info(Event::ExportCompleted.as_str(), &[("download_file", "...")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a typed event with fields at INFO
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::info(event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event(Event::BootStart, &[]);
        log_event(Event::ConfigLoaded, &[("data_dir", "/tmp/vellum")]);
    }
}
