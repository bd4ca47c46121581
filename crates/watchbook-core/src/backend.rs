use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use watchbook_config::PathManager;

/// Durable string key/value medium behind the [`PersistentStore`](crate::PersistentStore).
///
/// Reads never fail from the caller's point of view: anything that cannot be
/// read is reported as absent. Writes are synchronous and propagate errors.
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process backend. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(StoreError::Backend(format!(
                "store location is not a directory: {}",
                dir.display()
            )));
        }
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn from_paths(path_manager: &PathManager) -> Result<Self> {
        Self::new(path_manager.store_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!("Store miss: {} (file does not exist)", key);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Failed to read store file for {}: {}", key, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        let written =
            std::fs::write(&temp_path, value).and_then(|()| std::fs::rename(&temp_path, &path));
        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&temp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        debug!("Store saved: {} ({} bytes)", key, value.len());
        Ok(())
    }
}
