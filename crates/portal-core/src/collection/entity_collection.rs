//! Entity collection store
//!
//! Every mutating operation updates the in-memory collection first and then
//! writes the whole collection to the backing store. A failed write is logged
//! and remembered in [`EntityCollection::last_write_error`]; the in-memory
//! change is never rolled back, so the current session keeps seeing it even
//! though it will not survive a reload.

use chrono::Utc;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use portal_shared::constants::VERSION_KEY_SUFFIX;
use portal_shared::{new_id, timestamp_after, EntityId};

use super::{Entity, Observers, SubscriptionId};
use crate::error::StorageError;
use crate::repositories::{BackingStore, BackingStoreExt};

/// Where the in-memory collection came from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Persisted records with a matching schema version.
    Restored,
    /// Nothing persisted under the key; seeded.
    Absent,
    /// Persisted records carry another schema version (or none); wiped and seeded.
    VersionMismatch { found: Option<String> },
    /// Persisted records did not parse; seeded.
    Corrupt(String),
    /// The backing store could not be read; seeded.
    ReadFailed(String),
}

impl LoadSource {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadSource::Restored)
    }
}

pub struct EntityCollection<T: Entity, S: BackingStore> {
    store: Arc<S>,
    key: String,
    version_key: String,
    schema_version: String,
    items: Vec<T>,
    load_source: LoadSource,
    last_write_error: Option<StorageError>,
    observers: Observers<[T]>,
}

impl<T: Entity, S: BackingStore> EntityCollection<T, S> {
    pub fn initialize(store: Arc<S>, key: &str, schema_version: &str, seed: Vec<T>) -> Self {
        Self::initialize_with(store, key, schema_version, move || seed)
    }

    /// Like [`initialize`](Self::initialize), but only builds the seed data
    /// when nothing compatible is persisted.
    pub fn initialize_with<F>(store: Arc<S>, key: &str, schema_version: &str, seed: F) -> Self
    where
        F: FnOnce() -> Vec<T>,
    {
        let version_key = format!("{}{}", key, VERSION_KEY_SUFFIX);
        let (items, load_source) = match load(&*store, key, &version_key, schema_version) {
            Ok(items) => {
                info!(key, count = items.len(), "Restored collection from backing store");
                (items, LoadSource::Restored)
            }
            Err(reason) => {
                match &reason {
                    LoadSource::Absent => info!(key, "No stored collection, seeding defaults"),
                    LoadSource::VersionMismatch { found } => warn!(
                        key,
                        expected = schema_version,
                        found = found.as_deref().unwrap_or("<none>"),
                        "Schema version mismatch, discarding stored collection"
                    ),
                    LoadSource::Corrupt(e) => warn!(key, error = %e, "Stored collection is corrupt, reseeding"),
                    LoadSource::ReadFailed(e) => warn!(key, error = %e, "Failed to read stored collection, reseeding"),
                    LoadSource::Restored => {}
                }
                (seed(), reason)
            }
        };

        let mut collection = Self {
            store,
            key: key.to_string(),
            version_key,
            schema_version: schema_version.to_string(),
            items,
            load_source,
            last_write_error: None,
            observers: Observers::default(),
        };
        if !collection.load_source.is_restored() {
            collection.persist();
        }
        collection
    }

    /// Current snapshot in insertion order.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Matching records in their original order.
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).cloned().collect()
    }

    pub fn add(&mut self, draft: T::Draft) -> T {
        let item = T::create(self.fresh_id(), Utc::now(), draft);
        self.items.push(item.clone());
        debug!(key = %self.key, id = item.id(), "Added record");
        self.commit();
        item
    }

    /// `None` without any write when `id` is unknown.
    pub fn update(&mut self, id: &str, patch: T::Patch) -> Option<T> {
        self.modify(id, |item| item.apply(patch))
    }

    pub fn modify<F>(&mut self, id: &str, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let result: Result<Option<T>, Infallible> = self.try_modify(id, |item| {
            change(item);
            Ok(())
        });
        match result {
            Ok(updated) => updated,
            Err(never) => match never {},
        }
    }

    /// Applies `change` to a copy of the record and commits it only if the
    /// closure succeeds, so a rejected change leaves no partial write.
    pub fn try_modify<E, F>(&mut self, id: &str, change: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let current = &self.items[index];
        let previous_updated_at = current.updated_at();
        let mut next = current.clone();
        change(&mut next)?;
        next.touch(timestamp_after(previous_updated_at));
        self.items[index] = next.clone();
        debug!(key = %self.key, id, "Updated record");
        self.commit();
        Ok(Some(next))
    }

    /// Whether a record was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.items.remove(index);
        debug!(key = %self.key, id, "Removed record");
        self.commit();
        true
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    /// Error of the most recent write, cleared by the next successful one.
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.last_write_error.as_ref()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn fresh_id(&self) -> EntityId {
        loop {
            let id = new_id(T::ID_PREFIX);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.observers.notify(&self.items);
    }

    fn persist(&mut self) {
        let result = self
            .store
            .write_json(&self.key, &self.items)
            .and_then(|_| self.store.write(&self.version_key, &self.schema_version));
        match result {
            Ok(()) => self.last_write_error = None,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to persist collection, in-memory change kept");
                self.last_write_error = Some(e);
            }
        }
    }
}

fn load<T: Entity, S: BackingStore + ?Sized>(
    store: &S,
    key: &str,
    version_key: &str,
    schema_version: &str,
) -> Result<Vec<T>, LoadSource> {
    let stored_version = store
        .read(version_key)
        .map_err(|e| LoadSource::ReadFailed(e.to_string()))?;
    let raw = store
        .read(key)
        .map_err(|e| LoadSource::ReadFailed(e.to_string()))?
        .ok_or(LoadSource::Absent)?;
    if stored_version.as_deref() != Some(schema_version) {
        return Err(LoadSource::VersionMismatch { found: stored_version });
    }
    serde_json::from_str(&raw).map_err(|e| LoadSource::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MemoryBackingStore, MockBackingStore};
    use portal_shared::Timestamp;
    use serde::{Deserialize, Serialize};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: String,
        title: String,
        category: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    }

    struct NoteDraft {
        title: String,
        category: String,
    }

    #[derive(Default)]
    struct NotePatch {
        title: Option<String>,
    }

    impl Entity for Note {
        type Draft = NoteDraft;
        type Patch = NotePatch;
        const ID_PREFIX: &'static str = "note";

        fn id(&self) -> &str {
            &self.id
        }
        fn updated_at(&self) -> Timestamp {
            self.updated_at
        }
        fn create(id: EntityId, now: Timestamp, draft: NoteDraft) -> Self {
            Note { id, title: draft.title, category: draft.category, created_at: now, updated_at: now }
        }
        fn apply(&mut self, patch: NotePatch) {
            if let Some(title) = patch.title {
                self.title = title;
            }
        }
        fn touch(&mut self, now: Timestamp) {
            self.updated_at = now;
        }
    }

    fn draft(title: &str, category: &str) -> NoteDraft {
        NoteDraft { title: title.to_string(), category: category.to_string() }
    }

    fn seed_note(id: &str, category: &str) -> Note {
        let now = Utc::now();
        Note { id: id.to_string(), title: format!("seed {id}"), category: category.to_string(), created_at: now, updated_at: now }
    }

    fn open(store: &Arc<MemoryBackingStore>, seed: Vec<Note>) -> EntityCollection<Note, MemoryBackingStore> {
        EntityCollection::initialize(store.clone(), "notes", "1", seed)
    }

    #[test]
    fn test_seeds_and_persists_when_absent() {
        let store = Arc::new(MemoryBackingStore::new());
        let notes = open(&store, vec![seed_note("1", "IT")]);

        assert_eq!(notes.load_source(), &LoadSource::Absent);
        assert_eq!(notes.len(), 1);
        assert_eq!(store.read("notes_version").unwrap(), Some("1".to_string()));
        assert!(store.read("notes").unwrap().unwrap().contains("seed 1"));
    }

    #[test]
    fn test_restart_restores_records_with_dates() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![]);
        let added = notes.add(draft("persisted", "IT"));

        let seed_called = AtomicUsize::new(0);
        let reopened: EntityCollection<Note, _> =
            EntityCollection::initialize_with(store.clone(), "notes", "1", || {
                seed_called.fetch_add(1, Ordering::SeqCst);
                vec![]
            });

        assert!(reopened.load_source().is_restored());
        assert_eq!(seed_called.load(Ordering::SeqCst), 0);
        assert_eq!(reopened.get_by_id(&added.id), Some(&added));
    }

    #[test]
    fn test_version_mismatch_reseeds_and_retags() {
        let store = Arc::new(MemoryBackingStore::new());
        {
            let mut old = EntityCollection::<Note, _>::initialize(store.clone(), "notes", "0", vec![]);
            old.add(draft("old shape", "IT"));
        }

        let seed = vec![seed_note("s1", "IT"), seed_note("s2", "Design")];
        let notes = EntityCollection::initialize(store.clone(), "notes", "1", seed.clone());

        assert_eq!(notes.load_source(), &LoadSource::VersionMismatch { found: Some("0".to_string()) });
        assert_eq!(notes.list(), seed.as_slice());
        assert_eq!(store.read("notes_version").unwrap(), Some("1".to_string()));
        let persisted: Vec<Note> = store.read_json("notes").unwrap().unwrap();
        assert_eq!(persisted, seed);
    }

    #[test]
    fn test_unversioned_data_counts_as_mismatch() {
        let store = Arc::new(MemoryBackingStore::new());
        store.write("notes", "[]").unwrap();
        let notes = open(&store, vec![seed_note("1", "IT")]);
        assert_eq!(notes.load_source(), &LoadSource::VersionMismatch { found: None });
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_corrupt_payload_reseeds() {
        let store = Arc::new(MemoryBackingStore::new());
        store.write("notes", "[{\"id\": 3").unwrap();
        store.write("notes_version", "1").unwrap();

        let notes = open(&store, vec![seed_note("1", "IT")]);
        assert!(matches!(notes.load_source(), LoadSource::Corrupt(_)));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_add_assigns_distinct_ids() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![]);
        let ids: HashSet<String> = (0..200).map(|i| notes.add(draft(&format!("n{i}"), "IT")).id).collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| id.starts_with("note_")));
    }

    #[test]
    fn test_add_sets_equal_timestamps_and_appends() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![seed_note("1", "IT")]);
        let added = notes.add(draft("second", "IT"));
        assert_eq!(added.created_at, added.updated_at);
        assert_eq!(notes.list().last(), Some(&added));
    }

    #[test]
    fn test_update_preserves_identity_and_bumps_updated_at() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![]);
        let before = notes.add(draft("before", "IT"));

        let after = notes
            .update(&before.id, NotePatch { title: Some("after".to_string()) })
            .unwrap();

        assert_eq!(after.title, "after");
        assert_eq!(after.id, before.id);
        assert_eq!(after.category, before.category);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(notes.get_by_id(&before.id), Some(&after));
    }

    #[test]
    fn test_update_unknown_id_does_not_write() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![seed_note("1", "IT")]);
        let raw_before = store.read("notes").unwrap();

        assert!(notes.update("missing", NotePatch::default()).is_none());
        assert_eq!(store.read("notes").unwrap(), raw_before);
    }

    #[test]
    fn test_try_modify_rejection_leaves_record_untouched() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![seed_note("1", "IT")]);
        let original = notes.get_by_id("1").cloned();

        let result: Result<Option<Note>, &str> = notes.try_modify("1", |note| {
            note.title = "half-done".to_string();
            Err("rejected")
        });

        assert_eq!(result.unwrap_err(), "rejected");
        assert_eq!(notes.get_by_id("1").cloned(), original);
    }

    #[test]
    fn test_remove_reports_whether_removed() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![seed_note("1", "IT"), seed_note("2", "IT")]);
        assert!(notes.remove("1"));
        assert!(!notes.remove("1"));
        let persisted: Vec<Note> = store.read_json("notes").unwrap().unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn test_filter_keeps_relative_order() {
        let store = Arc::new(MemoryBackingStore::new());
        let notes = open(
            &store,
            vec![seed_note("1", "IT"), seed_note("2", "Design"), seed_note("3", "IT")],
        );
        let it: Vec<String> = notes.filter(|n| n.category == "IT").into_iter().map(|n| n.id).collect();
        assert_eq!(it, vec!["1", "3"]);
        assert!(notes.filter(|n| n.category == "Arts").is_empty());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let mut store = MockBackingStore::new();
        store.expect_read().returning(|_| Ok(None));
        store.expect_write().returning(|key, value| {
            Err(StorageError::QuotaExceeded { key: key.to_string(), needed: value.len() as u64, limit: 0 })
        });

        let mut notes: EntityCollection<Note, _> =
            EntityCollection::initialize(Arc::new(store), "notes", "1", vec![]);
        assert!(notes.last_write_error().is_some());

        let added = notes.add(draft("unsaved", "IT"));
        assert_eq!(notes.get_by_id(&added.id), Some(&added));
        assert!(matches!(notes.last_write_error(), Some(StorageError::QuotaExceeded { .. })));
    }

    #[test]
    fn test_write_error_clears_after_successful_write() {
        let store = Arc::new(MemoryBackingStore::with_quota(400));
        let mut notes = open(&store, vec![]);
        assert!(notes.last_write_error().is_none());

        let big = notes.add(draft(&"x".repeat(500), "IT"));
        assert!(notes.last_write_error().is_some());
        assert!(notes.contains(&big.id));

        assert!(notes.remove(&big.id));
        assert!(notes.last_write_error().is_none());
    }

    #[test]
    fn test_read_failure_falls_back_to_seed() {
        let mut store = MockBackingStore::new();
        store
            .expect_read()
            .returning(|_| Err(StorageError::Unavailable("disk gone".to_string())));
        store.expect_write().returning(|_, _| Ok(()));

        let notes: EntityCollection<Note, _> =
            EntityCollection::initialize(Arc::new(store), "notes", "1", vec![seed_note("1", "IT")]);
        assert!(matches!(notes.load_source(), LoadSource::ReadFailed(_)));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_observers_see_each_mutation() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut notes = open(&store, vec![]);
        let sizes = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = sizes.clone();
        let sub = notes.subscribe(move |items: &[Note]| sink.lock().push(items.len()));

        let a = notes.add(draft("a", "IT"));
        notes.add(draft("b", "IT"));
        notes.update(&a.id, NotePatch { title: Some("a2".to_string()) });
        notes.remove(&a.id);
        notes.update("missing", NotePatch::default());

        assert_eq!(*sizes.lock(), vec![1, 2, 2, 1]);
        assert!(notes.unsubscribe(sub));
        notes.add(draft("c", "IT"));
        assert_eq!(sizes.lock().len(), 4);
    }
}
