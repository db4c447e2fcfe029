//! Durable store backed by one file per key.
//!
//! Each key maps to a single file under the store's root directory, so
//! entries survive process restarts and are independently valid: a
//! partially-written or corrupted file only affects its own key, and
//! callers treat an unreadable value as a miss.
//!
//! Keys are sanitized into file names; the allowed key alphabet is
//! ASCII alphanumerics plus `.`, `_` and `-`, which covers every key the
//! catalog and stats layers produce.

use std::path::{Path, PathBuf};

use super::traits::{BoxFuture, KeyValueStore, StoreError};

/// File extension for stored values.
const ENTRY_EXTENSION: &str = "json";

/// Result of clearing a disk store.
#[derive(Debug, Clone, Default)]
pub struct ClearResult {
    /// Number of entry files deleted.
    pub files_deleted: u64,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

/// Durable key-value store rooted at a directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a disk store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{ENTRY_EXTENSION}")))
    }
}

impl KeyValueStore for DiskStore {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let path = path?;
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(&path, &value).await?;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let path = path?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let path = path?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let path = path?;
            match tokio::fs::metadata(&path).await {
                Ok(meta) => Ok(meta.is_file()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// Count entries and total bytes of a disk store directory.
///
/// Returns `(0, 0)` if the directory does not exist yet.
pub fn disk_store_stats(root: &Path) -> Result<(u64, u64), StoreError> {
    let mut files = 0;
    let mut bytes = 0;

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() {
            files += 1;
            bytes += meta.len();
        }
    }

    Ok((files, bytes))
}

/// Delete every entry file of a disk store directory.
pub fn clear_disk_store(root: &Path) -> Result<ClearResult, StoreError> {
    let mut result = ClearResult::default();

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(result),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() {
            std::fs::remove_file(entry.path())?;
            result.files_deleted += 1;
            result.bytes_freed += meta.len();
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        store.set("stats-pikachu", vec![1, 2, 3]).await.unwrap();

        let value = store.get("stats-pikachu").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        assert!(store.get("catalog").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contains() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        assert!(!store.contains("catalog").await.unwrap());
        store.set("catalog", vec![0]).await.unwrap();
        assert!(store.contains("catalog").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        store.set("stats-ditto", vec![9]).await.unwrap();
        assert!(store.delete("stats-ditto").await.unwrap());
        assert!(!store.delete("stats-ditto").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let err = store.set("../escape", vec![1]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));

        let err = store.get("").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = DiskStore::new(dir.path());
            store.set("stats-snorlax", vec![4, 5]).await.unwrap();
        }

        let reopened = DiskStore::new(dir.path());
        assert_eq!(
            reopened.get("stats-snorlax").await.unwrap(),
            Some(vec![4, 5])
        );
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        store.set("a", vec![0u8; 10]).await.unwrap();
        store.set("b", vec![0u8; 20]).await.unwrap();

        let (files, bytes) = disk_store_stats(dir.path()).unwrap();
        assert_eq!(files, 2);
        assert_eq!(bytes, 30);

        let cleared = clear_disk_store(dir.path()).unwrap();
        assert_eq!(cleared.files_deleted, 2);
        assert_eq!(cleared.bytes_freed, 30);

        let (files, bytes) = disk_store_stats(dir.path()).unwrap();
        assert_eq!((files, bytes), (0, 0));
    }

    #[test]
    fn test_stats_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert_eq!(disk_store_stats(&missing).unwrap(), (0, 0));
        assert_eq!(clear_disk_store(&missing).unwrap().files_deleted, 0);
    }
}
