//! JSON file storage.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Storage, decode, encode};
use crate::error::PersistenceResult;
use crate::event::Event;

/// Keeps the snapshot in `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path, name: &str) -> Self {
        FileStorage {
            path: dir.join(format!("{name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> PersistenceResult<Vec<Event>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot on disk");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        decode(&content)
    }

    fn save(&self, events: &[Event]) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = encode(events)?;
        let temp = self.temp_path();

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), count = events.len(), "saved snapshot");
        Ok(())
    }

    fn remove(&self) -> PersistenceResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
