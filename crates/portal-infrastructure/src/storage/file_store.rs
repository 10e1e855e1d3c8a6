// ============================================================================
// Portal Infrastructure - File Backing Store
// File: crates/portal-infrastructure/src/storage/file_store.rs
// Description: One JSON document per key inside a data directory
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use portal_core::{BackingStore, StorageError};
use portal_shared::config::StorageSettings;

const EXTENSION: &str = "json";

/// Durable [`BackingStore`]: `{dir}/{key}.json`, replaced atomically through
/// a temp file and rename.
///
/// Usage is accounted like the in-memory store (key bytes + value bytes) so
/// a quota behaves the same in both.
#[derive(Debug)]
pub struct FileBackingStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
    /// Key -> accounted bytes, guarded for the whole write so quota checks
    /// and file replacement happen together.
    usage: Mutex<HashMap<String, u64>>,
}

impl FileBackingStore {
    /// Creates the directory if needed and accounts for what is already there.
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: Option<u64>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| dir_error(&dir, e))?;

        let mut usage = HashMap::new();
        for entry in fs::read_dir(&dir).map_err(|e| dir_error(&dir, e))? {
            let entry = entry.map_err(|e| dir_error(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_key(key).is_err() {
                continue;
            }
            let len = entry.metadata().map_err(|e| dir_error(&dir, e))?.len();
            usage.insert(key.to_string(), key.len() as u64 + len);
        }

        debug!(dir = %dir.display(), keys = usage.len(), "Opened file backing store");
        Ok(Self { dir, quota_bytes, usage: Mutex::new(usage) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn used_bytes(&self) -> u64 {
        self.usage.lock().values().sum()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, EXTENSION))
    }
}

impl BackingStore for FileBackingStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut usage = self.usage.lock();

        let size = (key.len() + value.len()) as u64;
        if let Some(limit) = self.quota_bytes {
            let others: u64 = usage.iter().filter(|(k, _)| k.as_str() != key).map(|(_, v)| v).sum();
            let needed = others + size;
            if needed > limit {
                return Err(StorageError::QuotaExceeded { key: key.to_string(), needed, limit });
            }
        }

        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{}.{}.tmp", key, EXTENSION));
        fs::write(&temp, value).map_err(|e| io_error(key, e))?;
        if let Err(e) = fs::rename(&temp, &target) {
            let _ = fs::remove_file(&temp);
            return Err(io_error(key, e));
        }

        usage.insert(key.to_string(), size);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut usage = self.usage.lock();
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(key, e)),
        }
        usage.remove(key);
        Ok(())
    }
}

/// Opens the configured data directory.
pub fn open_store(settings: &StorageSettings) -> Result<Arc<FileBackingStore>, StorageError> {
    let store = FileBackingStore::open(&settings.dir, settings.quota())?;
    info!(
        dir = %store.dir().display(),
        quota_bytes = settings.quota_bytes,
        used_bytes = store.used_bytes(),
        "Backing store ready"
    );
    Ok(Arc::new(store))
}

/// Keys become file names: ASCII letters, digits, `_` and `-` only.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn io_error(key: &str, e: std::io::Error) -> StorageError {
    StorageError::Io { key: key.to_string(), message: e.to_string() }
}

fn dir_error(dir: &Path, e: std::io::Error) -> StorageError {
    StorageError::Unavailable(format!("{}: {}", dir.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{BackingStoreExt, ProjectStore};
    use tempfile::tempdir;

    #[test]
    fn test_write_read_remove() {
        let dir = tempdir().unwrap();
        let store = FileBackingStore::open(dir.path(), None).unwrap();

        assert_eq!(store.read("users").unwrap(), None);
        store.write("users", "[]").unwrap();
        assert_eq!(store.read("users").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("users.json").exists());

        store.remove("users").unwrap();
        store.remove("users").unwrap();
        assert_eq!(store.read("users").unwrap(), None);
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileBackingStore::open(dir.path(), None).unwrap();
        for key in ["", "../etc", "a/b", "with space", "dot.ted"] {
            assert!(matches!(store.write(key, "x"), Err(StorageError::InvalidKey(_))), "{key}");
        }
        assert!(store.read("projects_version").is_ok());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileBackingStore::open(dir.path(), None).unwrap();
            store.write_json("subscribedCategories", &vec!["IT", "Design"]).unwrap();
        }
        let store = FileBackingStore::open(dir.path(), None).unwrap();
        let categories: Option<Vec<String>> = store.read_json("subscribedCategories").unwrap();
        assert_eq!(categories, Some(vec!["IT".to_string(), "Design".to_string()]));
        assert_eq!(store.used_bytes(), ("subscribedCategories".len() + r#"["IT","Design"]"#.len()) as u64);
    }

    #[test]
    fn test_quota_counts_existing_files() {
        let dir = tempdir().unwrap();
        {
            let store = FileBackingStore::open(dir.path(), None).unwrap();
            store.write("a", "12345").unwrap();
        }
        let store = FileBackingStore::open(dir.path(), Some(10)).unwrap();
        let err = store.write("b", "12345").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 12, limit: 10, .. }));
        assert_eq!(store.read("b").unwrap(), None);

        // Replacing a key only counts its new size.
        store.write("a", "123456789").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("123456789"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = FileBackingStore::open(dir.path(), None).unwrap();
        store.write("projects", "[]").unwrap();
        store.write("projects", "[1]").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["projects.json"]);
    }

    #[test]
    fn test_open_store_from_settings() {
        let dir = tempdir().unwrap();
        let settings = StorageSettings { dir: dir.path().join("nested/data"), quota_bytes: 0 };
        let store = open_store(&settings).unwrap();
        assert!(settings.dir.is_dir());
        store.write("teamRequests", "[]").unwrap();
    }

    #[test]
    fn test_store_restores_collection_from_disk() {
        let dir = tempdir().unwrap();
        let id = {
            let store = Arc::new(FileBackingStore::open(dir.path(), None).unwrap());
            let mut projects = ProjectStore::new(store, Vec::new());
            projects
                .add(portal_core::ProjectDraft { title: "On disk".to_string(), ..Default::default() })
                .unwrap()
                .id
        };

        let store = Arc::new(FileBackingStore::open(dir.path(), None).unwrap());
        let projects = ProjectStore::new(store, Vec::new());
        assert!(projects.load_source().is_restored());
        assert_eq!(projects.get_by_id(&id).map(|p| p.title.as_str()), Some("On disk"));

        let raw = fs::read_to_string(dir.path().join("projects.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["title"], "On disk");
        assert!(parsed[0]["createdAt"].is_string());
    }
}
