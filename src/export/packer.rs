//! Export packaging
//!
//! An export is an uncompressed tar archive built in memory:
//! - `manifest.json`: identity and checksum of the exported version
//! - `content`: the version's bytes, unmodified
//!
//! Entry order and headers are fixed so equal inputs give equal archives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tar::{Builder, Header};
use uuid::Uuid;

use crate::documents::{Document, DocumentVersion};

use super::errors::{ExportError, ExportResult};

pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const CONTENT_ENTRY: &str = "content";

/// Describes the exported version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub document_id: Uuid,
    pub document_label: String,
    pub version_id: Uuid,
    pub sequence: u32,
    pub comment: String,
    pub checksum: String,
    pub size: u64,
    pub page_count: u32,
    pub exported_at: DateTime<Utc>,
}

impl ExportManifest {
    pub fn new(document: &Document, version: &DocumentVersion, exported_at: DateTime<Utc>) -> Self {
        Self {
            document_id: document.id,
            document_label: document.label.clone(),
            version_id: version.id,
            sequence: version.sequence,
            comment: version.comment.clone(),
            checksum: version.content.checksum.clone(),
            size: version.content.size,
            page_count: version.content.page_count,
            exported_at,
        }
    }
}

/// Build the export archive
pub fn package(manifest: &ExportManifest, content: &[u8]) -> ExportResult<Vec<u8>> {
    let manifest_json = serde_json::to_vec_pretty(manifest)
        .map_err(|e| ExportError::Packaging(format!("manifest: {}", e)))?;
    let mtime = manifest.exported_at.timestamp().max(0) as u64;

    let mut builder = Builder::new(Vec::new());
    append(&mut builder, MANIFEST_ENTRY, &manifest_json, mtime)?;
    append(&mut builder, CONTENT_ENTRY, content, mtime)?;
    Ok(builder.into_inner()?)
}

fn append(builder: &mut Builder<Vec<u8>>, path: &str, data: &[u8], mtime: u64) -> ExportResult<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    header.set_cksum();
    builder.append_data(&mut header, path, data)?;
    Ok(())
}

/// Download filename derived from the document label
pub fn archive_filename(label: &str, sequence: u32) -> String {
    let stem: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "document".to_string() } else { stem };
    format!("{}-v{}.tar", stem, sequence)
}
