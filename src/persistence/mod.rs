//! Durable key/value storage for small records
//!
//! Backends:
//! - `FileStore`: one JSON file per key, written via tmp file + rename
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//! - `MemoryStore`: in-process, for hosts without storage and for tests

use std::collections::HashMap;

use crate::error::Result;

/// Raw string storage used by the leaderboard
pub trait ScoreStore {
    /// Read the value under `key`, `Ok(None)` if nothing was stored yet
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key` in a single write
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key (e.g. to simulate an earlier run)
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::path::{Path, PathBuf};

    use super::ScoreStore;
    use crate::error::Result;

    /// Stores each key as `<dir>/<key>.json`
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl ScoreStore for FileStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            let path = self.path_for(key);
            match std::fs::read_to_string(&path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> Result<()> {
            std::fs::create_dir_all(&self.dir)?;

            // Rename is atomic on the same filesystem, so readers never see a
            // half-written record.
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            std::fs::write(&tmp, value)?;
            std::fs::rename(&tmp, &path)?;
            log::debug!("Wrote {} bytes to {:?}", value.len(), path);
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::ScoreStore;
    use crate::error::{CoreError, Result};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| CoreError::Storage("LocalStorage unavailable".to_string()))
        }
    }

    impl ScoreStore for LocalStorageStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Self::storage()?
                .get_item(key)
                .map_err(|_| CoreError::Storage(format!("failed to read {key}")))
        }

        fn write(&mut self, key: &str, value: &str) -> Result<()> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|_| CoreError::Storage(format!("failed to write {key}")))
        }
    }
}
