//! # Event Log
//!
//! Append-only store of `EventRecord`s.
//!
//! Sequence numbers are assigned while the append lock is held, so the
//! order in which records become visible to readers is their sequence
//! order. Queries are lazy and can be iterated any number of times.

use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::core::ObjectRef;
use crate::observability::{Event, Logger, MetricsRegistry};

use super::errors::{EventError, EventResult};
use super::journal::Journal;
use super::record::{EventRecord, Verb};

/// One record of a chain passed to `EventLog::record_chain`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLink {
    pub actor: ObjectRef,
    pub action_object: ObjectRef,
    pub target: ObjectRef,
    pub verb: Verb,
}

#[derive(Debug, Default)]
struct LogState {
    /// `records[i].sequence == i + 1`
    records: Vec<EventRecord>,
    journal: Option<Journal>,
}

/// Shared handle to the event log
#[derive(Debug, Clone)]
pub struct EventLog {
    state: Arc<RwLock<LogState>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl EventLog {
    /// Volatile log, lost on exit
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(LogState::default())),
            metrics: None,
        }
    }

    /// Durable log backed by a journal file, replayed on open
    pub fn open(path: impl AsRef<Path>) -> EventResult<Self> {
        let path = path.as_ref();
        let (journal, records) = Journal::open(path).map_err(|e| {
            Logger::error(
                Event::EventJournalFailed.as_str(),
                &[("path", &path.display().to_string()), ("error", &e.to_string())],
            );
            e
        })?;

        Logger::info(
            Event::EventJournalReplayed.as_str(),
            &[
                ("path", &path.display().to_string()),
                ("records", &records.len().to_string()),
            ],
        );

        Ok(Self {
            state: Arc::new(RwLock::new(LogState {
                records,
                journal: Some(journal),
            })),
            metrics: None,
        })
    }

    /// Durable log whose journal rejects every write
    #[cfg(test)]
    pub(crate) fn with_unwritable_journal(path: impl AsRef<Path>) -> EventResult<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(path.as_ref())
            .map_err(|e| EventError::StorageUnavailable(e.to_string()))?;
        drop(file);
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| EventError::StorageUnavailable(e.to_string()))?;
        Ok(Self {
            state: Arc::new(RwLock::new(LogState {
                records: Vec::new(),
                journal: Some(Journal::from_file(file)?),
            })),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Append one record
    ///
    /// Fails only when the log cannot accept writes. A failed append leaves
    /// no trace in memory or in the journal's logical sequence.
    pub fn record(
        &self,
        actor: ObjectRef,
        action_object: ObjectRef,
        target: ObjectRef,
        verb: Verb,
    ) -> EventResult<EventRecord> {
        let mut recorded = self.record_chain(&[EventLink {
            actor,
            action_object,
            target,
            verb,
        }])?;
        recorded
            .pop()
            .ok_or_else(|| EventError::StorageUnavailable("empty append".into()))
    }

    /// Append a causal chain as one unit
    ///
    /// The links get consecutive sequences in slice order. Either all of
    /// them become visible or none does.
    pub fn record_chain(&self, links: &[EventLink]) -> EventResult<Vec<EventRecord>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| EventError::StorageUnavailable("event log lock poisoned".into()))?;

        let first = state.records.len() as u64 + 1;
        let timestamp = Utc::now();
        let records: Vec<EventRecord> = links
            .iter()
            .zip(first..)
            .map(|(link, sequence)| EventRecord {
                sequence,
                actor: link.actor,
                action_object: link.action_object,
                target: link.target,
                verb: link.verb,
                timestamp,
            })
            .collect();

        if let Some(journal) = state.journal.as_mut() {
            journal.append(&records)?;
        }
        state.records.extend(records.iter().cloned());
        drop(state);

        if let Some(metrics) = &self.metrics {
            for _ in &records {
                metrics.increment_events_recorded();
            }
        }
        Ok(records)
    }

    /// Records in which `object` fills any slot, ascending by sequence
    pub fn query(&self, object: ObjectRef) -> EventQuery {
        EventQuery {
            state: Arc::clone(&self.state),
            object,
        }
    }

    /// Records with a sequence greater than `sequence`
    pub fn events_since(&self, sequence: u64) -> Vec<EventRecord> {
        self.state
            .read()
            .map(|state| {
                let start = (sequence as usize).min(state.records.len());
                state.records[start..].to_vec()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sequence of the newest record, 0 when empty
    pub fn last_sequence(&self) -> u64 {
        self.len() as u64
    }
}

/// Restartable query over the log
#[derive(Debug, Clone)]
pub struct EventQuery {
    state: Arc<RwLock<LogState>>,
    object: ObjectRef,
}

impl EventQuery {
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// Walk from the first record
    ///
    /// The walk ends at the record that was newest when `iter` was called.
    pub fn iter(&self) -> EventIter {
        let end = self.state.read().map(|s| s.records.len()).unwrap_or(0);
        EventIter {
            state: Arc::clone(&self.state),
            object: self.object,
            position: 0,
            end,
        }
    }

    /// Collect every matching record
    pub fn to_vec(&self) -> Vec<EventRecord> {
        self.iter().collect()
    }
}

impl IntoIterator for &EventQuery {
    type Item = EventRecord;
    type IntoIter = EventIter;

    fn into_iter(self) -> EventIter {
        self.iter()
    }
}

/// Lazy cursor produced by `EventQuery::iter`
#[derive(Debug)]
pub struct EventIter {
    state: Arc<RwLock<LogState>>,
    object: ObjectRef,
    position: usize,
    end: usize,
}

impl Iterator for EventIter {
    type Item = EventRecord;

    fn next(&mut self) -> Option<EventRecord> {
        let state = self.state.read().ok()?;
        while self.position < self.end {
            let record = &state.records[self.position];
            self.position += 1;
            if record.involves(&self.object) {
                return Some(record.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn objects() -> (ObjectRef, ObjectRef, ObjectRef) {
        (
            ObjectRef::user(Uuid::new_v4()),
            ObjectRef::document(Uuid::new_v4()),
            ObjectRef::version(Uuid::new_v4()),
        )
    }

    #[test]
    fn test_sequences_start_at_one_and_increase() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();

        let first = log.record(user, document, document, Verb::DocumentCreated).unwrap();
        let second = log
            .record(user, document, version, Verb::DocumentVersionCreated)
            .unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(log.last_sequence(), 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_query_matches_any_slot() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();
        let other = ObjectRef::version(Uuid::new_v4());

        log.record(user, version, document, Verb::DocumentViewed).unwrap();
        log.record(other, document, other, Verb::DocumentVersionEdited).unwrap();
        log.record(version, document, version, Verb::DocumentVersionEdited).unwrap();

        let sequences: Vec<u64> = log.query(version).iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 3]);
        assert_eq!(log.query(document).to_vec().len(), 3);
        assert!(log.query(ObjectRef::user(Uuid::new_v4())).to_vec().is_empty());
    }

    #[test]
    fn test_query_is_restartable() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();
        log.record(user, version, document, Verb::DocumentViewed).unwrap();

        let query = log.query(document);
        assert_eq!(query.iter().count(), 1);
        assert_eq!(query.iter().count(), 1);

        // A fresh walk sees later records
        log.record(user, version, document, Verb::DocumentViewed).unwrap();
        assert_eq!(query.iter().count(), 2);
    }

    #[test]
    fn test_iter_is_bounded_at_creation() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();
        log.record(user, version, document, Verb::DocumentViewed).unwrap();

        let mut iter = log.query(document).iter();
        log.record(user, version, document, Verb::DocumentViewed).unwrap();

        assert_eq!(iter.next().map(|r| r.sequence), Some(1));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_events_since() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();
        for _ in 0..3 {
            log.record(user, version, document, Verb::DocumentViewed).unwrap();
        }

        assert_eq!(log.events_since(0).len(), 3);
        assert_eq!(log.events_since(2)[0].sequence, 3);
        assert!(log.events_since(10).is_empty());
    }

    #[test]
    fn test_concurrent_appends_keep_sequences_dense() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        log.record(user, version, document, Verb::DocumentViewed).unwrap();
                    }
                });
            }
        });

        let sequences: Vec<u64> = log.query(document).iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, (1..=200).collect::<Vec<u64>>());
    }

    #[test]
    fn test_journal_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let (user, document, version) = objects();

        {
            let log = EventLog::open(&path).unwrap();
            log.record(user, document, version, Verb::DocumentVersionCreated).unwrap();
            log.record(version, document, version, Verb::DocumentVersionEdited).unwrap();
        }

        let log = EventLog::open(&path).unwrap();
        assert_eq!(log.last_sequence(), 2);
        let next = log.record(user, version, document, Verb::DocumentViewed).unwrap();
        assert_eq!(next.sequence, 3);
        assert_eq!(log.query(version).iter().count(), 3);
    }

    #[test]
    fn test_metrics_count_appends() {
        let metrics = Arc::new(MetricsRegistry::new());
        let log = EventLog::in_memory().with_metrics(Arc::clone(&metrics));
        let (user, document, version) = objects();
        log.record(user, version, document, Verb::DocumentViewed).unwrap();

        assert_eq!(metrics.snapshot().events_recorded, 1);
    }

    #[test]
    fn test_chain_gets_consecutive_sequences() {
        let log = EventLog::in_memory();
        let (user, document, version) = objects();
        log.record(user, document, document, Verb::DocumentCreated).unwrap();

        let chain = log
            .record_chain(&[
                EventLink {
                    actor: user,
                    action_object: document,
                    target: version,
                    verb: Verb::DocumentVersionCreated,
                },
                EventLink {
                    actor: version,
                    action_object: document,
                    target: version,
                    verb: Verb::DocumentVersionEdited,
                },
            ])
            .unwrap();

        assert_eq!(chain.iter().map(|r| r.sequence).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(log.events_since(1), chain);
    }

    #[test]
    fn test_failed_chain_leaves_nothing_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let log = EventLog::with_unwritable_journal(&path).unwrap();
        let (user, document, version) = objects();

        let link = EventLink {
            actor: user,
            action_object: version,
            target: document,
            verb: Verb::DocumentViewed,
        };
        let err = log.record_chain(&[link, link]).unwrap_err();
        assert!(matches!(err, EventError::StorageUnavailable(_)));
        assert!(log.is_empty());
        assert!(log.record(user, version, document, Verb::DocumentViewed).is_err());
        assert!(log.is_empty());

        drop(log);
        assert!(EventLog::open(&path).unwrap().is_empty());
    }
}
