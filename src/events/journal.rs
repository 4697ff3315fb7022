//! # Event Journal
//!
//! Append-only JSON-lines file backing a durable `EventLog`.
//!
//! Line format: `<crc32 as 8 hex digits> <record json>\n`. The checksum
//! covers the JSON bytes. Replay requires sequences 1, 2, 3, ... in file
//! order; anything else is corruption.
//!
//! A batch is written with one `write_all` and one `sync_data`. When either
//! fails the file is truncated back to its length before the batch; if the
//! truncation fails too the journal refuses every later append.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crc32fast::Hasher;

use super::errors::{EventError, EventResult};
use super::record::EventRecord;

/// Open journal file
#[derive(Debug)]
pub struct Journal {
    file: File,
    /// Length of the file after the last successful batch
    len: u64,
    /// Set when a failed batch could not be rolled back
    broken: bool,
}

impl Journal {
    /// Open or create the journal and replay its records
    pub fn open(path: impl AsRef<Path>) -> EventResult<(Self, Vec<EventRecord>)> {
        let path = path.as_ref();
        let records = if path.exists() {
            Self::replay(path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| EventError::StorageUnavailable(format!("{}: {}", path.display(), e)))?;

        Ok((Self::from_file(file)?, records))
    }

    /// Wrap an already opened journal file positioned for appending
    pub(crate) fn from_file(file: File) -> EventResult<Self> {
        let len = file
            .metadata()
            .map_err(|e| EventError::StorageUnavailable(e.to_string()))?
            .len();
        Ok(Self {
            file,
            len,
            broken: false,
        })
    }

    /// Append records as one batch and sync them to disk
    ///
    /// Either every line of the batch is durable or none is.
    pub fn append(&mut self, records: &[EventRecord]) -> EventResult<()> {
        if self.broken {
            return Err(EventError::StorageUnavailable(
                "journal disabled after an unrecoverable write failure".into(),
            ));
        }

        let mut batch = String::new();
        for record in records {
            batch.push_str(&encode_line(record)?);
        }

        let written = self
            .file
            .write_all(batch.as_bytes())
            .and_then(|_| self.file.sync_data());
        match written {
            Ok(()) => {
                self.len += batch.len() as u64;
                Ok(())
            }
            Err(e) => {
                if self
                    .file
                    .set_len(self.len)
                    .and_then(|_| self.file.sync_data())
                    .is_err()
                {
                    self.broken = true;
                }
                Err(EventError::StorageUnavailable(e.to_string()))
            }
        }
    }

    fn replay(path: &Path) -> EventResult<Vec<EventRecord>> {
        let file = File::open(path)
            .map_err(|e| EventError::StorageUnavailable(format!("{}: {}", path.display(), e)))?;

        let mut records: Vec<EventRecord> = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| EventError::StorageUnavailable(e.to_string()))?;
            if line.is_empty() {
                continue;
            }

            let record = decode_line(&line, line_no)?;
            let expected = records.last().map(|r| r.sequence + 1).unwrap_or(1);
            if record.sequence != expected {
                return Err(EventError::Corrupted {
                    line: line_no,
                    reason: format!("sequence {} where {} was expected", record.sequence, expected),
                });
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn encode_line(record: &EventRecord) -> EventResult<String> {
    let json = serde_json::to_string(record)
        .map_err(|e| EventError::StorageUnavailable(format!("encode: {}", e)))?;
    Ok(format!("{:08x} {}\n", checksum(json.as_bytes()), json))
}

fn decode_line(line: &str, line_no: usize) -> EventResult<EventRecord> {
    let corrupted = |reason: &str| EventError::Corrupted {
        line: line_no,
        reason: reason.to_string(),
    };

    let (crc_hex, json) = line.split_once(' ').ok_or_else(|| corrupted("missing checksum"))?;
    let expected = u32::from_str_radix(crc_hex, 16).map_err(|_| corrupted("bad checksum field"))?;
    if checksum(json.as_bytes()) != expected {
        return Err(corrupted("checksum mismatch"));
    }
    serde_json::from_str(json).map_err(|e| corrupted(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObjectRef;
    use crate::events::record::Verb;
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn record(sequence: u64) -> EventRecord {
        let version = ObjectRef::version(Uuid::new_v4());
        EventRecord {
            sequence,
            actor: version,
            action_object: ObjectRef::document(Uuid::new_v4()),
            target: version,
            verb: Verb::DocumentVersionEdited,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_append_then_replay() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");

        let (mut journal, replayed) = Journal::open(&path).unwrap();
        assert!(replayed.is_empty());
        let first = record(1);
        let second = record(2);
        journal.append(std::slice::from_ref(&first)).unwrap();
        journal.append(std::slice::from_ref(&second)).unwrap();
        drop(journal);

        let (_, replayed) = Journal::open(&path).unwrap();
        assert_eq!(replayed, vec![first, second]);
    }

    #[test]
    fn test_flipped_byte_is_detected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&[record(1)]).unwrap();
        drop(journal);

        let content = std::fs::read_to_string(&path).unwrap();
        let tampered = content.replace("document_version_edited", "document_version_edite_");
        std::fs::write(&path, tampered).unwrap();

        let err = Journal::open(&path).unwrap_err();
        assert!(matches!(err, EventError::Corrupted { line: 1, .. }));
    }

    #[test]
    fn test_sequence_gap_is_detected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&[record(1)]).unwrap();
        journal.append(&[record(3)]).unwrap();
        drop(journal);

        assert!(matches!(
            Journal::open(&path),
            Err(EventError::Corrupted { line: 2, .. })
        ));
    }

    #[test]
    fn test_failed_batch_leaves_no_partial_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&[record(1)]).unwrap();
        drop(journal);

        // A read-only handle fails every write and every truncation
        let mut journal = Journal::from_file(File::open(&path).unwrap()).unwrap();
        assert!(journal.append(&[record(2), record(3)]).is_err());
        assert!(journal.broken);
        assert!(matches!(
            journal.append(&[record(2)]),
            Err(EventError::StorageUnavailable(_))
        ));
        drop(journal);

        let (_, replayed) = Journal::open(&path).unwrap();
        assert_eq!(replayed.len(), 1);
    }

    #[test]
    fn test_batch_is_one_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.log");
        let (mut journal, _) = Journal::open(&path).unwrap();
        journal.append(&[record(1), record(2)]).unwrap();
        let len = journal.len;
        drop(journal);

        assert_eq!(std::fs::metadata(&path).unwrap().len(), len);
        let (_, replayed) = Journal::open(&path).unwrap();
        assert_eq!(replayed.iter().map(|r| r.sequence).collect::<Vec<_>>(), vec![1, 2]);
    }
}
