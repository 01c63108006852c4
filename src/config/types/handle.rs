//! Shared config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so
//! the reference server can pick up edits to `pismo.toml` between requests.
//! Each request takes one snapshot and keeps it until the response is sent.

use crate::config::{ConfigError, PismoConfig};
use arc_swap::ArcSwap;
use rustc_hash::FxHasher;
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Compute 64-bit hash of the config file content.
#[inline]
fn content_hash(content: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(content.as_bytes());
    hasher.finish()
}

/// Reloadable config bound to a file.
pub struct ConfigHandle {
    current: ArcSwap<PismoConfig>,
    path: PathBuf,
    /// Hash of the file content the current config was parsed from
    /// (0 when running on defaults).
    hash: AtomicU64,
}

impl ConfigHandle {
    /// Handle with a fixed config that is never reloaded from disk.
    pub fn new(config: PismoConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            path: path.into(),
            hash: AtomicU64::new(0),
        }
    }

    /// Load `path` (defaults when the file does not exist).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let handle = Self::new(PismoConfig::default(), &path);
        handle.reload()?;
        Ok(handle)
    }

    #[inline]
    pub fn get(&self) -> Arc<PismoConfig> {
        self.current.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the config without touching the file hash.
    pub fn store(&self, config: PismoConfig) {
        self.current.store(Arc::new(config));
    }

    /// Reload config from disk if content changed.
    ///
    /// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
    /// On error the previous config stays active.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        if !self.path.exists() {
            return Ok(false);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|err| ConfigError::Io(self.path.clone(), err))?;
        let new_hash = content_hash(&content);
        if new_hash == self.hash.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let config = PismoConfig::parse_file(&content, &self.path)?;
        self.current.store(Arc::new(config));
        self.hash.store(new_hash, Ordering::Relaxed);
        Ok(true)
    }
}
