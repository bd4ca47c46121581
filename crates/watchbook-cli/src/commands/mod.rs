pub mod config;
pub mod name;
pub mod open;
pub mod recent;
pub mod share;
pub mod watched;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use watchbook_config::{Config, PathManager};
use watchbook_core::{FileBackend, PersistentStore};

/// Open the file-backed store, honouring `storage.store_dir` from the config
pub fn open_store(paths: &PathManager, config: &Config) -> Result<PersistentStore<FileBackend>> {
    let backend = match &config.storage.store_dir {
        Some(dir) => FileBackend::new(dir.clone()),
        None => FileBackend::from_paths(paths),
    }
    .map_err(|e| eyre!("Failed to open store: {}", e))?;

    tracing::debug!("Using store at {}", backend.dir().display());
    Ok(PersistentStore::open(backend))
}
