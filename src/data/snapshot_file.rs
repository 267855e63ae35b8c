/// Flat JSON snapshot of the history on disk
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::data::HistoryStore;
use crate::error::{Result, TrackerError};

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SnapshotFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw snapshot contents, or `None` if nothing has been saved yet
    pub async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the snapshot. Writes a sibling temp file and renames it
    /// over the target so readers never see a half-written file.
    pub async fn save(&self, contents: &str) -> Result<()> {
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            TrackerError::PersistenceFailure(format!("Write {}: {}", tmp.display(), e))
        })?;

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            TrackerError::PersistenceFailure(format!("Rename to {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    /// Rehydrate the history. Missing, unreadable or corrupt snapshots all
    /// yield an empty history.
    pub async fn load_history(&self) -> HistoryStore {
        match self.load().await {
            Ok(None) => {
                info!("No history snapshot at {}, starting empty", self.path.display());
                HistoryStore::new()
            }
            Ok(Some(content)) => match HistoryStore::try_load(&content) {
                Ok(store) => {
                    info!("Loaded {} results from {}", store.len(), self.path.display());
                    store
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        code = e.error_code(),
                        "Ignoring corrupt history snapshot: {}", e
                    );
                    HistoryStore::new()
                }
            },
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    code = e.error_code(),
                    "Failed to read history snapshot: {}", e
                );
                HistoryStore::new()
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}
