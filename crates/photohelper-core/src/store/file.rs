use std::path::{Path, PathBuf};

use tracing::debug;

use super::{SessionStore, StoreError, SESSION_KEY};

/// Session record kept as a JSON file in the app data directory.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", SESSION_KEY))
    }

    fn ensure_parent(path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn save(&self, record: &str) -> Result<(), StoreError> {
        let path = self.path();
        Self::ensure_parent(&path)?;
        std::fs::write(&path, record)?;
        debug!(?path, "Session record written");
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(contents))
    }

    fn delete(&self) -> Result<(), StoreError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!(?path, "Session record removed");
        }
        Ok(())
    }
}
