//! # Version Registry
//!
//! Owns documents and their versions and runs every version operation:
//! permission check first, then the state change, then the event.
//!
//! Each document sits behind its own mutex. Activation, edits and version
//! creation for one document are serialized on it, and the event for a
//! change is appended while the mutex is held, so the last activation
//! event of a document always names its active version.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::access::{AccessGuard, Permission, Principal};
use crate::core::ObjectRef;
use crate::events::{EventLog, Verb};
use crate::file_caching::{page_key, CachePartitionFile, CachePartitionStore};
use crate::file_storage::{sha256_hex, StorageBackend, StorageError};
use crate::observability::{Event, Logger};

use super::document::{ContentRef, Document, DocumentVersion, VersionEdit};
use super::errors::{DocumentError, DocumentResult};
use super::renderer::{PageRenderer, RenderSpec};

/// Cache partition holding rendered pages of a version
pub const PAGES_PARTITION: &str = "pages";

/// A page image served through the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: u32,
    pub file: CachePartitionFile,
    pub data: Vec<u8>,
}

#[derive(Debug)]
struct DocumentEntry {
    document: Document,
    /// Ordered by sequence
    versions: Vec<DocumentVersion>,
}

/// Document version lifecycle
#[derive(Debug)]
pub struct VersionRegistry {
    backend: Arc<dyn StorageBackend>,
    guard: Arc<AccessGuard>,
    events: EventLog,
    cache: Arc<CachePartitionStore>,
    renderer: Arc<dyn PageRenderer>,
    render_spec: RenderSpec,
    documents: RwLock<HashMap<Uuid, Arc<Mutex<DocumentEntry>>>>,
    /// Version id -> document id
    versions: RwLock<HashMap<Uuid, Uuid>>,
}

impl VersionRegistry {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        guard: Arc<AccessGuard>,
        events: EventLog,
        cache: Arc<CachePartitionStore>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            backend,
            guard,
            events,
            cache,
            renderer,
            render_spec: RenderSpec::default(),
            documents: RwLock::new(HashMap::new()),
            versions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_render_spec(mut self, spec: RenderSpec) -> Self {
        self.render_spec = spec;
        self
    }

    pub fn render_spec(&self) -> RenderSpec {
        self.render_spec
    }

    // ==================== Documents ====================

    /// Create an empty document
    ///
    /// Needs `DocumentCreate` on the caller's own user object.
    pub fn create_document(&self, label: &str, principal: &Principal) -> DocumentResult<Document> {
        let actor = principal
            .as_object()
            .ok_or_else(|| DocumentError::InvalidRequest("principal has no user identity".into()))?;
        self.guard.require(principal, &actor, Permission::DocumentCreate)?;

        let label = label.trim();
        if label.is_empty() {
            return Err(DocumentError::InvalidRequest("label must not be empty".into()));
        }

        let document = Document::new(label);
        let mut documents = self.documents.write().map_err(|_| DocumentError::LockPoisoned)?;
        self.events
            .record(actor, document.object(), document.object(), Verb::DocumentCreated)?;
        documents.insert(
            document.id,
            Arc::new(Mutex::new(DocumentEntry {
                document: document.clone(),
                versions: Vec::new(),
            })),
        );
        drop(documents);

        Logger::info(
            Event::DocumentCreated.as_str(),
            &[("document", &document.id.to_string())],
        );
        Ok(document)
    }

    /// Store `content` as the next version of a document
    ///
    /// The first version of a document becomes its active version.
    pub fn create_version(
        &self,
        document_id: Uuid,
        content: &[u8],
        comment: &str,
        principal: &Principal,
    ) -> DocumentResult<DocumentVersion> {
        let document = ObjectRef::document(document_id);
        self.guard
            .require(principal, &document, Permission::DocumentVersionCreate)?;
        let actor = Self::actor(principal)?;
        let entry = self.entry(document_id)?;

        let page_count = self.renderer.page_count(content)?;
        let version_id = Uuid::new_v4();
        let path = DocumentVersion::content_path(version_id);
        self.backend.write(&path, content)?;

        let mut entry = Self::lock(&entry)?;
        let version = DocumentVersion {
            id: version_id,
            document_id,
            sequence: entry.versions.len() as u32 + 1,
            active: entry.versions.is_empty(),
            comment: comment.to_string(),
            content: ContentRef {
                path: path.clone(),
                checksum: sha256_hex(content),
                size: content.len() as u64,
                page_count,
            },
            created_at: Utc::now(),
        };

        if let Err(e) = self
            .events
            .record(actor, document, version.object(), Verb::DocumentVersionCreated)
        {
            let _ = self.backend.delete(&path);
            return Err(e.into());
        }
        entry.versions.push(version.clone());
        drop(entry);

        self.versions
            .write()
            .map_err(|_| DocumentError::LockPoisoned)?
            .insert(version_id, document_id);
        self.guard.register_parent(version.object(), document);

        Logger::info(
            Event::VersionCreated.as_str(),
            &[
                ("document", &document_id.to_string()),
                ("version", &version_id.to_string()),
                ("sequence", &version.sequence.to_string()),
            ],
        );
        Ok(version)
    }

    // ==================== Versions ====================

    /// Versions of a document ordered by sequence. Records no event.
    pub fn list_versions(
        &self,
        document_id: Uuid,
        principal: &Principal,
    ) -> DocumentResult<Vec<DocumentVersion>> {
        let document = ObjectRef::document(document_id);
        self.guard
            .require(principal, &document, Permission::DocumentVersionView)?;
        let entry = self.entry(document_id)?;
        let entry = Self::lock(&entry)?;
        Ok(entry.versions.clone())
    }

    /// Version metadata. Records no event.
    pub fn get_version(&self, version_id: Uuid, principal: &Principal) -> DocumentResult<DocumentVersion> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionView)?;
        self.fetch_version(version_id)
    }

    /// Make `version_id` the only active version of its document
    ///
    /// The event names the version as its own actor. Activating the
    /// already-active version succeeds and is recorded again.
    pub fn activate(&self, version_id: Uuid, principal: &Principal) -> DocumentResult<DocumentVersion> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionEdit)?;
        let entry = self.locate(version_id)?;

        let mut entry = Self::lock(&entry)?;
        let index = Self::position(&entry, version_id)?;
        let document = entry.document.object();

        self.events
            .record(object, document, object, Verb::DocumentVersionEdited)?;
        for version in entry.versions.iter_mut() {
            version.active = version.id == version_id;
        }
        let version = entry.versions[index].clone();
        drop(entry);

        Logger::info(
            Event::VersionActivated.as_str(),
            &[
                ("document", &version.document_id.to_string()),
                ("version", &version_id.to_string()),
            ],
        );
        Ok(version)
    }

    /// Update the editable metadata of a version
    pub fn edit(
        &self,
        version_id: Uuid,
        edit: &VersionEdit,
        principal: &Principal,
    ) -> DocumentResult<DocumentVersion> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionEdit)?;
        let actor = Self::actor(principal)?;
        let entry = self.locate(version_id)?;

        let mut entry = Self::lock(&entry)?;
        let index = Self::position(&entry, version_id)?;
        let document = entry.document.object();

        self.events
            .record(actor, document, object, Verb::DocumentVersionEdited)?;
        let version = &mut entry.versions[index];
        if let Some(comment) = &edit.comment {
            version.comment = comment.clone();
        }
        let version = version.clone();
        drop(entry);

        Logger::info(
            Event::VersionEdited.as_str(),
            &[("version", &version_id.to_string())],
        );
        Ok(version)
    }

    /// Open a version for viewing
    pub fn view(&self, version_id: Uuid, principal: &Principal) -> DocumentResult<DocumentVersion> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionView)?;
        let actor = Self::actor(principal)?;
        let version = self.fetch_version(version_id)?;

        self.events
            .record(actor, object, version.document_object(), Verb::DocumentViewed)?;
        Ok(version)
    }

    /// Render one page through the cache and record the view
    pub fn preview(&self, version_id: Uuid, page: u32, principal: &Principal) -> DocumentResult<RenderedPage> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionView)?;
        let actor = Self::actor(principal)?;
        let version = self.fetch_version(version_id)?;

        if page == 0 || page > version.content.page_count {
            return Err(DocumentError::InvalidRequest(format!(
                "page {} out of range 1..={}",
                page, version.content.page_count
            )));
        }

        let rendered = self.render_cached(&version, page)?;
        self.events
            .record(actor, object, version.document_object(), Verb::DocumentViewed)?;
        Ok(rendered)
    }

    /// Render every page for printing. Records no event.
    pub fn print(&self, version_id: Uuid, principal: &Principal) -> DocumentResult<Vec<RenderedPage>> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::DocumentVersionPrint)?;
        let version = self.fetch_version(version_id)?;

        (1..=version.content.page_count)
            .map(|page| self.render_cached(&version, page))
            .collect()
    }

    /// Drop every cached artifact of a version
    pub fn purge_cache(&self, version_id: Uuid, principal: &Principal) -> DocumentResult<usize> {
        let object = ObjectRef::version(version_id);
        self.guard
            .require(principal, &object, Permission::CachePartitionPurge)?;
        self.locate(version_id)?;

        let partitions = self.cache.partitions_for(&object)?;
        Ok(self.cache.purge(&partitions, principal)?)
    }

    // ==================== Unchecked access ====================

    /// Load a version without a permission check
    ///
    /// For background work that already passed its check at request time.
    pub fn fetch_version(&self, version_id: Uuid) -> DocumentResult<DocumentVersion> {
        let entry = self.locate(version_id)?;
        let entry = Self::lock(&entry)?;
        let index = Self::position(&entry, version_id)?;
        Ok(entry.versions[index].clone())
    }

    /// Load a document without a permission check
    pub fn fetch_document(&self, document_id: Uuid) -> DocumentResult<Document> {
        let entry = self.entry(document_id)?;
        let entry = Self::lock(&entry)?;
        Ok(entry.document.clone())
    }

    /// Read and verify the content of a version
    pub fn read_content(&self, version: &DocumentVersion) -> DocumentResult<Vec<u8>> {
        let data = self.backend.read(&version.content.path)?;
        if sha256_hex(&data) != version.content.checksum {
            return Err(StorageError::ChecksumMismatch(version.content.path.clone()).into());
        }
        Ok(data)
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    // ==================== Helpers ====================

    fn render_cached(&self, version: &DocumentVersion, page: u32) -> DocumentResult<RenderedPage> {
        let partition = self.cache.partition(version.object(), PAGES_PARTITION)?;
        let key = page_key(page, self.render_spec.width, self.render_spec.height);

        let artifact = self
            .cache
            .get_or_generate(&partition, &key, &version.content.checksum, || {
                let content = self.read_content(version).map_err(|e| e.to_string())?;
                self.renderer
                    .render_page(&content, page, &self.render_spec)
                    .map_err(|e| e.to_string())
            })?;
        Ok(RenderedPage {
            page,
            file: artifact.file,
            data: artifact.data,
        })
    }

    fn actor(principal: &Principal) -> DocumentResult<ObjectRef> {
        principal
            .as_object()
            .ok_or_else(|| DocumentError::InvalidRequest("principal has no user identity".into()))
    }

    fn entry(&self, document_id: Uuid) -> DocumentResult<Arc<Mutex<DocumentEntry>>> {
        let documents = self.documents.read().map_err(|_| DocumentError::LockPoisoned)?;
        documents
            .get(&document_id)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound(ObjectRef::document(document_id).to_string()))
    }

    fn locate(&self, version_id: Uuid) -> DocumentResult<Arc<Mutex<DocumentEntry>>> {
        let not_found = || DocumentError::NotFound(ObjectRef::version(version_id).to_string());
        let document_id = self
            .versions
            .read()
            .map_err(|_| DocumentError::LockPoisoned)?
            .get(&version_id)
            .copied()
            .ok_or_else(not_found)?;
        self.entry(document_id).map_err(|_| not_found())
    }

    fn lock(entry: &Mutex<DocumentEntry>) -> DocumentResult<MutexGuard<'_, DocumentEntry>> {
        entry.lock().map_err(|_| DocumentError::LockPoisoned)
    }

    fn position(entry: &DocumentEntry, version_id: Uuid) -> DocumentResult<usize> {
        entry
            .versions
            .iter()
            .position(|v| v.id == version_id)
            .ok_or_else(|| DocumentError::NotFound(ObjectRef::version(version_id).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryAcl;
    use crate::documents::renderer::StubRenderer;
    use crate::file_storage::{MemoryBackend, StorageResult};
    use crate::observability::MetricsRegistry;

    struct Fixture {
        registry: Arc<VersionRegistry>,
        guard: Arc<AccessGuard>,
        events: EventLog,
        root: Principal,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryBackend::new()))
    }

    fn fixture_with(backend: Arc<dyn StorageBackend>) -> Fixture {
        let metrics = Arc::new(MetricsRegistry::new());
        let guard = Arc::new(AccessGuard::new(Arc::new(MemoryAcl::new()), Arc::clone(&metrics)));
        let events = EventLog::in_memory();
        let cache = Arc::new(CachePartitionStore::new(
            Arc::clone(&backend),
            Arc::clone(&guard),
            metrics,
        ));
        let registry = Arc::new(VersionRegistry::new(
            backend,
            Arc::clone(&guard),
            events.clone(),
            cache,
            Arc::new(StubRenderer::new()),
        ));
        Fixture {
            registry,
            guard,
            events,
            root: Principal::superuser(Uuid::new_v4()),
        }
    }

    fn document_with_versions(f: &Fixture, count: usize) -> (Document, Vec<DocumentVersion>) {
        let document = f.registry.create_document("Contract", &f.root).unwrap();
        let versions = (0..count)
            .map(|i| {
                let content = format!("revision {}\x0cappendix", i);
                f.registry
                    .create_version(document.id, content.as_bytes(), "", &f.root)
                    .unwrap()
            })
            .collect();
        (document, versions)
    }

    fn active_count(f: &Fixture, document: &Document) -> usize {
        f.registry
            .list_versions(document.id, &f.root)
            .unwrap()
            .iter()
            .filter(|v| v.active)
            .count()
    }

    #[test]
    fn test_first_version_is_active() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 2);

        assert!(versions[0].active);
        assert!(!versions[1].active);
        assert_eq!(versions[1].sequence, 2);
        assert_eq!(versions[0].content.page_count, 2);
        assert_eq!(active_count(&f, &document), 1);
    }

    #[test]
    fn test_activate_switches_and_records_version_as_actor() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 2);
        let before = f.events.last_sequence();

        let activated = f.registry.activate(versions[1].id, &f.root).unwrap();
        assert!(activated.active);
        assert_eq!(active_count(&f, &document), 1);

        let recorded = f.events.events_since(before);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].verb, Verb::DocumentVersionEdited);
        assert_eq!(recorded[0].actor, versions[1].object());
        assert_eq!(recorded[0].target, versions[1].object());
        assert_eq!(recorded[0].action_object, document.object());
    }

    #[test]
    fn test_reactivating_active_version_still_records() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 1);
        let before = f.events.last_sequence();

        f.registry.activate(versions[0].id, &f.root).unwrap();
        assert_eq!(f.events.last_sequence(), before + 1);
    }

    #[test]
    fn test_edit_updates_comment() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 1);
        let edit = VersionEdit {
            comment: Some("signed copy".into()),
        };

        let edited = f.registry.edit(versions[0].id, &edit, &f.root).unwrap();
        assert_eq!(edited.comment, "signed copy");

        let last = f.events.events_since(f.events.last_sequence() - 1).remove(0);
        assert_eq!(last.actor, f.root.as_object().unwrap());
        assert_eq!(last.target, versions[0].object());
        assert_eq!(last.action_object, document.object());
    }

    #[test]
    fn test_denied_operations_record_nothing() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 2);
        let stranger = Principal::user(Uuid::new_v4());
        let before = f.events.last_sequence();
        let version = versions[1].id;

        let missing = DocumentError::NotFound(ObjectRef::version(version).to_string()).to_string();
        let errors = [
            f.registry.activate(version, &stranger).unwrap_err(),
            f.registry.edit(version, &VersionEdit::default(), &stranger).unwrap_err(),
            f.registry.view(version, &stranger).unwrap_err(),
            f.registry.preview(version, 1, &stranger).unwrap_err(),
            f.registry.purge_cache(version, &stranger).unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.status_code(), 404);
            assert_eq!(err.to_string(), missing);
        }
        assert!(f.registry.print(version, &stranger).is_err());
        assert!(f.registry.list_versions(document.id, &stranger).is_err());

        assert_eq!(f.events.last_sequence(), before);
        assert_eq!(active_count(&f, &document), 1);
        assert!(f.registry.fetch_version(versions[0].id).unwrap().active);
    }

    #[test]
    fn test_unknown_version_matches_denied_version() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 1);
        let stranger = Principal::user(Uuid::new_v4());

        let denied = f.registry.activate(versions[0].id, &stranger).unwrap_err();
        let unknown_id = Uuid::new_v4();
        let unknown = f.registry.activate(unknown_id, &f.root).unwrap_err();

        assert_eq!(denied.status_code(), unknown.status_code());
        assert_eq!(
            unknown.to_string(),
            format!("Not found: {}", ObjectRef::version(unknown_id))
        );
    }

    #[test]
    fn test_document_grant_reaches_versions() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 1);
        let user = Uuid::new_v4();
        f.guard
            .acl()
            .grant(user, document.object(), Permission::DocumentVersionView);

        let principal = Principal::user(user);
        assert_eq!(f.registry.list_versions(document.id, &principal).unwrap().len(), 1);
        assert!(f.registry.view(versions[0].id, &principal).is_ok());
    }

    #[test]
    fn test_preview_records_view_and_hits_cache() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 1);
        let before = f.events.last_sequence();

        let first = f.registry.preview(versions[0].id, 2, &f.root).unwrap();
        let second = f.registry.preview(versions[0].id, 2, &f.root).unwrap();
        assert_eq!(first.file.id, second.file.id);
        assert!(first.data.ends_with(b"appendix"));

        let recorded = f.events.events_since(before);
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|r| r.verb == Verb::DocumentViewed
            && r.target == document.object()
            && r.action_object == versions[0].object()));
    }

    #[test]
    fn test_preview_page_out_of_range() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 1);
        let before = f.events.last_sequence();

        let err = f.registry.preview(versions[0].id, 9, &f.root).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(f.events.last_sequence(), before);
    }

    #[test]
    fn test_print_renders_all_pages_without_event() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 1);
        let before = f.events.last_sequence();

        let pages = f.registry.print(versions[0].id, &f.root).unwrap();
        assert_eq!(pages.iter().map(|p| p.page).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(f.events.last_sequence(), before);
    }

    #[test]
    fn test_purge_cache_leaves_sibling_version() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 2);
        f.registry.print(versions[0].id, &f.root).unwrap();
        f.registry.print(versions[1].id, &f.root).unwrap();

        assert_eq!(f.registry.purge_cache(versions[0].id, &f.root).unwrap(), 2);
        assert_eq!(f.registry.purge_cache(versions[0].id, &f.root).unwrap(), 0);
        assert_eq!(f.registry.purge_cache(versions[1].id, &f.root).unwrap(), 2);
    }

    #[test]
    fn test_concurrent_activation_keeps_one_active() {
        let f = fixture();
        let (document, versions) = document_with_versions(&f, 4);

        std::thread::scope(|scope| {
            for version in &versions {
                let registry = Arc::clone(&f.registry);
                let root = f.root.clone();
                scope.spawn(move || {
                    for _ in 0..20 {
                        registry.activate(version.id, &root).unwrap();
                    }
                });
            }
        });

        let listed = f.registry.list_versions(document.id, &f.root).unwrap();
        let active: Vec<&DocumentVersion> = listed.iter().filter(|v| v.active).collect();
        assert_eq!(active.len(), 1);

        // Last writer wins
        let last = f
            .events
            .query(document.object())
            .iter()
            .filter(|r| r.verb == Verb::DocumentVersionEdited)
            .last()
            .unwrap();
        assert_eq!(last.actor, active[0].object());
    }

    #[test]
    fn test_create_document_requires_grant() {
        let f = fixture();
        let user = Uuid::new_v4();
        let principal = Principal::user(user);

        assert!(f.registry.create_document("Memo", &principal).is_err());
        f.guard
            .acl()
            .grant(user, ObjectRef::user(user), Permission::DocumentCreate);
        assert!(f.registry.create_document("Memo", &principal).is_ok());
        assert_eq!(f.registry.document_count(), 1);
    }

    #[test]
    fn test_read_content_verifies_checksum() {
        let f = fixture();
        let (_, versions) = document_with_versions(&f, 1);
        let mut tampered = versions[0].clone();
        tampered.content.checksum = "0".repeat(64);

        let err = f.registry.read_content(&tampered).unwrap_err();
        assert!(matches!(err, DocumentError::Storage(StorageError::ChecksumMismatch(_))));
    }

    /// Memory backend whose cache reads stall long enough for a purge to land
    #[derive(Debug, Default)]
    struct SlowCacheReads {
        inner: MemoryBackend,
    }

    impl StorageBackend for SlowCacheReads {
        fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
            self.inner.write(path, data)
        }

        fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
            if path.starts_with("cache/") {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            self.inner.read(path)
        }

        fn delete(&self, path: &str) -> StorageResult<()> {
            self.inner.delete(path)
        }
    }

    #[test]
    fn test_preview_survives_concurrent_purge() {
        let f = fixture_with(Arc::new(SlowCacheReads::default()));
        let (_, versions) = document_with_versions(&f, 1);
        let version_id = versions[0].id;
        let expected = f.registry.preview(version_id, 1, &f.root).unwrap().data;

        let (preview, purged) = std::thread::scope(|scope| {
            let preview = scope.spawn(|| f.registry.preview(version_id, 1, &f.root));
            let purge = scope.spawn(|| {
                std::thread::sleep(std::time::Duration::from_millis(30));
                f.registry.purge_cache(version_id, &f.root)
            });
            (preview.join().unwrap(), purge.join().unwrap())
        });

        assert_eq!(purged.unwrap(), 1);
        let page = preview.unwrap();
        assert_eq!(page.data, expected);
    }
}
