use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use super::error::TrackerError;
use super::snapshot::Snapshot;

/// Fixed key the tracker snapshot is stored under.
pub const STORAGE_KEY: &str = "job-tracker-jobs";

/// Storage collaborator receiving snapshots after each mutation and
/// supplying the last one at startup.
pub trait SnapshotPersistence: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError>;
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("stored snapshot '{key}' is unusable: {source}")]
    Decode {
        key: String,
        #[source]
        source: TrackerError,
    },
}

/// Keeps one `<key>.json` file per storage key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotPersistence for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        let snapshot = Snapshot::from_json(&raw).map_err(|source| PersistenceError::Decode {
            key: key.to_string(),
            source,
        })?;
        debug!(path = %path.display(), applications = snapshot.len(), "loaded snapshot");
        Ok(Some(snapshot))
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let contents = snapshot.to_json().map_err(PersistenceError::Encode)?;
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, contents).map_err(|source| PersistenceError::Io {
            path: staging.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(PersistenceError::Io { path, source });
        }
        debug!(path = %path.display(), applications = snapshot.len(), "saved snapshot");
        Ok(())
    }
}
