//! Network persistence.
//!
//! Stores keep the flat member records of each scenario under a string key.
//! What a store does with them is its own business; the session only needs
//! `load` and `save`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bigtree_network::{records_digest, MemberRecord};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Error types for network stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Records could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What a save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// Stored content already matched
    Unchanged,
}

/// Trait for loading and saving a scenario's network.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// Records saved under `key`, `None` if nothing was saved yet.
    async fn load(&self, key: &str) -> Result<Option<Vec<MemberRecord>>, StoreError>;

    /// Replace whatever is saved under `key`.
    async fn save(&self, key: &str, records: &[MemberRecord]) -> Result<SaveOutcome, StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    networks: RwLock<HashMap<String, Vec<MemberRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NetworkStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<MemberRecord>>, StoreError> {
        Ok(self.networks.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, records: &[MemberRecord]) -> Result<SaveOutcome, StoreError> {
        let mut networks = self.networks.write().await;
        if networks.get(key).map(Vec::as_slice) == Some(records) {
            return Ok(SaveOutcome::Unchanged);
        }
        networks.insert(key.to_string(), records.to_vec());
        debug!(key = %key, members = records.len(), "Saved network in memory");
        Ok(SaveOutcome::Written)
    }
}

/// One JSON file per key. The previous file is kept as `<key>.json.old`.
///
/// New content is written to `<key>.json.tmp` and renamed over the live file,
/// so a failed write leaves the live file in place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store in `root_dir`, creating the directory if needed.
    pub async fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self, StoreError> {
        let root_dir = root_dir.as_ref().to_path_buf();
        fs::create_dir_all(&root_dir).await?;

        info!(path = %root_dir.display(), "Initialized network store");
        Ok(Self { root_dir })
    }

    /// Live file for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", key))
    }

    /// Previous contents of the live file.
    pub fn backup_path_for(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json.old", key))
    }

    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json.tmp", key))
    }

    async fn stored_digest(&self, path: &Path) -> Option<String> {
        let bytes = fs::read(path).await.ok()?;
        match serde_json::from_slice::<Vec<MemberRecord>>(&bytes) {
            Ok(records) => Some(records_digest(&records)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Existing network file is unreadable");
                None
            }
        }
    }
}

#[async_trait]
impl NetworkStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<MemberRecord>>, StoreError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<MemberRecord> = serde_json::from_slice(&bytes)?;
        debug!(key = %key, members = records.len(), "Loaded network file");
        Ok(Some(records))
    }

    async fn save(&self, key: &str, records: &[MemberRecord]) -> Result<SaveOutcome, StoreError> {
        let path = self.path_for(key);
        let digest = records_digest(records);

        if self.stored_digest(&path).await.as_deref() == Some(digest.as_str()) {
            debug!(key = %key, digest = %digest, "Network unchanged, skipping write");
            return Ok(SaveOutcome::Unchanged);
        }

        let json = serde_json::to_vec_pretty(records)?;
        let staging = self.staging_path_for(key);
        fs::write(&staging, json).await?;
        if fs::metadata(&path).await.is_ok() {
            fs::copy(&path, self.backup_path_for(key)).await?;
        }
        fs::rename(&staging, &path).await?;

        info!(key = %key, members = records.len(), digest = %digest, "Saved network file");
        Ok(SaveOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(personal: f64) -> Vec<MemberRecord> {
        vec![
            MemberRecord {
                class: 0,
                stamp: 1,
                name: "You".into(),
                personal_volume: personal,
                sponsor_stamp: 0,
            },
            MemberRecord {
                class: 2,
                stamp: 2,
                name: "Customer".into(),
                personal_volume: 20.0,
                sponsor_stamp: 1,
            },
        ]
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.load("NETWORK").await.unwrap(), None);

        assert_eq!(store.save("NETWORK", &records(20.0)).await.unwrap(), SaveOutcome::Written);
        assert_eq!(store.save("NETWORK", &records(20.0)).await.unwrap(), SaveOutcome::Unchanged);
        assert_eq!(store.load("NETWORK").await.unwrap(), Some(records(20.0)));
        assert_eq!(store.load("PLANNING").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();
        assert_eq!(store.load("PLANNING").await.unwrap(), None);

        assert_eq!(store.save("PLANNING", &records(20.0)).await.unwrap(), SaveOutcome::Written);
        assert!(!store.backup_path_for("PLANNING").exists());

        assert_eq!(store.save("PLANNING", &records(20.0)).await.unwrap(), SaveOutcome::Unchanged);

        assert_eq!(store.save("PLANNING", &records(35.0)).await.unwrap(), SaveOutcome::Written);
        assert!(store.backup_path_for("PLANNING").exists());
        assert_eq!(store.load("PLANNING").await.unwrap(), Some(records(35.0)));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_live_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();
        store.save("PLANNING", &records(20.0)).await.unwrap();

        // a directory in the staging spot makes the write fail
        std::fs::create_dir(store.staging_path_for("PLANNING")).unwrap();
        assert!(matches!(
            store.save("PLANNING", &records(35.0)).await,
            Err(StoreError::Io(_))
        ));

        assert_eq!(store.load("PLANNING").await.unwrap(), Some(records(20.0)));
        assert!(!store.backup_path_for("PLANNING").exists());
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).await.unwrap();
        std::fs::write(store.path_for("NETWORK"), b"not json").unwrap();

        assert!(matches!(
            store.load("NETWORK").await,
            Err(StoreError::Serialization(_))
        ));
        // an unreadable file is overwritten, not compared
        assert_eq!(store.save("NETWORK", &records(20.0)).await.unwrap(), SaveOutcome::Written);
    }
}
