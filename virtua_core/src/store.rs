//! String key-value store abstraction and implementations.
//!
//! All persisted app state lives behind the [`KvStore`] trait: numeric
//! counters stored as decimal text, collections as serialized JSON. The
//! file-backed implementation keeps the whole store in one JSON object file
//! with proper file locking, written atomically via temp-file rename.

use crate::Result;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Canonical key names for everything the app persists.
///
/// Every read/write goes through [`crate::ledger::ProgressLedger`], which
/// uses these constants; no other module spells the key strings out.
pub mod keys {
    pub const POINTS: &str = "virtuaPoints";
    pub const WORKOUTS_DONE: &str = "workoutsDone";
    pub const TOTAL_MINUTES: &str = "totalMinutes";
    pub const CALORIES_LOST: &str = "caloriesLost";
    pub const CURRENT_STREAK: &str = "currentStreak";
    pub const BEST_STREAK: &str = "personalBestStreak";
    pub const WORKOUT_HISTORY: &str = "workoutHistory";
    pub const WEIGHT_DATA: &str = "weightData";
    pub const QUOTA_PROGRESS: &str = "quotaProgress";
    pub const USER_NAME: &str = "userName";

    /// Every key the app owns, in reset order
    pub const ALL: [&str; 10] = [
        POINTS,
        WORKOUTS_DONE,
        TOTAL_MINUTES,
        CALORIES_LOST,
        CURRENT_STREAK,
        BEST_STREAK,
        WORKOUT_HISTORY,
        WEIGHT_DATA,
        QUOTA_PROGRESS,
        USER_NAME,
    ];
}

/// Opaque string key-value persistence capability.
///
/// Each key is read and written independently; there is no transactional
/// guarantee across keys. Callers tolerate a crash between individual writes.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// HashMap-backed store for tests and ephemeral sessions
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// JSON-file-backed store with file locking.
///
/// The whole store is a single JSON object of string keys to string values.
/// Reads take a shared lock; a missing, unreadable, or corrupted file reads
/// as empty with a logged warning, never an error. Writes land atomically:
/// serialize to a temp file in the same directory, sync, rename over the
/// original.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside the standard data directory
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full key map with shared locking.
    ///
    /// Any failure degrades to an empty map: persistence read failure is
    /// "value absent" throughout the app.
    fn load_map(&self) -> HashMap<String, String> {
        if !self.path.exists() {
            return HashMap::new();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open store file {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                return HashMap::new();
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock store file {:?}: {}. Treating as empty.",
                self.path,
                e
            );
            return HashMap::new();
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        let _ = file.unlock();

        if let Err(e) = read_result {
            tracing::warn!(
                "Failed to read store file {:?}: {}. Treating as empty.",
                self.path,
                e
            );
            return HashMap::new();
        }

        match serde_json::from_str::<HashMap<String, String>>(&contents) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse store file {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                HashMap::new()
            }
        }
    }

    /// Save the full key map with exclusive locking and atomic rename
    fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(map)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| crate::Error::Io(e.error))?;

        tracing::debug!("Saved store to {:?}", self.path);
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map();
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut map = self.load_map();
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(keys::POINTS).unwrap(), None);

        store.set(keys::POINTS, "42").unwrap();
        assert_eq!(store.get(keys::POINTS).unwrap(), Some("42".into()));

        store.remove(keys::POINTS).unwrap();
        assert_eq!(store.get(keys::POINTS).unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::in_data_dir(temp_dir.path());

        store.set(keys::POINTS, "15").unwrap();
        store.set(keys::USER_NAME, "You").unwrap();

        let reopened = FileStore::in_data_dir(temp_dir.path());
        assert_eq!(reopened.get(keys::POINTS).unwrap(), Some("15".into()));
        assert_eq!(reopened.get(keys::USER_NAME).unwrap(), Some("You".into()));
    }

    #[test]
    fn test_missing_file_reads_as_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_data_dir(temp_dir.path());
        assert_eq!(store.get(keys::POINTS).unwrap(), None);
    }

    #[test]
    fn test_corrupted_file_reads_as_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get(keys::POINTS).unwrap(), None);
    }

    #[test]
    fn test_corrupted_file_recovers_on_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut store = FileStore::new(&path);
        store.set(keys::POINTS, "7").unwrap();
        assert_eq!(store.get(keys::POINTS).unwrap(), Some("7".into()));
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::in_data_dir(temp_dir.path());
        store.remove(keys::POINTS).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::in_data_dir(temp_dir.path());
        store.set(keys::POINTS, "1").unwrap();
        store.set(keys::POINTS, "2").unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "store.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only store.json, found extras: {:?}",
            extras
        );
    }
}
