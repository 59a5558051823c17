//! Cache backend abstraction
//!
//! The blob store behind both tiers is opaque: content goes in under a
//! string key and comes back out onto the same paths.

use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Content-addressable restore/save service keyed by a string
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Whether caching can be used in this environment at all
    fn is_available(&self) -> bool;

    /// Place content saved under `key` onto `paths`, returning whether it existed
    async fn restore(&self, paths: &[PathBuf], key: &str) -> SetupResult<bool>;

    /// Store the contents of `paths` under `key`
    async fn save(&self, paths: &[PathBuf], key: &str) -> SetupResult<()>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Directory-backed cache store
///
/// Each key maps to `<root>/<sha256(key) hex>/<path index>/...`. Saves are
/// staged in a sibling directory and renamed into place, so the last writer
/// for a key wins.
pub struct LocalCacheBackend {
    root: Option<PathBuf>,
}

impl LocalCacheBackend {
    /// Create a backend rooted at `root`; `None` makes it unavailable
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn entry_dir(root: &Path, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        root.join(hex::encode(digest))
    }

    fn root(&self, key: &str) -> SetupResult<&Path> {
        self.root
            .as_deref()
            .ok_or_else(|| SetupError::cache(key, "cache backend is not configured"))
    }
}

#[async_trait]
impl CacheBackend for LocalCacheBackend {
    fn is_available(&self) -> bool {
        self.root.is_some()
    }

    async fn restore(&self, paths: &[PathBuf], key: &str) -> SetupResult<bool> {
        let entry = Self::entry_dir(self.root(key)?, key);
        if !entry.is_dir() {
            debug!("No cache entry at {}", entry.display());
            return Ok(false);
        }

        let paths = paths.to_vec();
        let owned_key = key.to_string();
        tokio::task::spawn_blocking(move || -> SetupResult<()> {
            for (index, target) in paths.iter().enumerate() {
                let source = entry.join(index.to_string());
                if source.is_dir() {
                    copy_tree(&source, target).map_err(|e| {
                        SetupError::cache(&owned_key, format!("restoring {}: {}", target.display(), e))
                    })?;
                }
            }
            Ok(())
        })
        .await
        .map_err(|e| SetupError::Internal(format!("cache restore task failed: {}", e)))??;

        Ok(true)
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> SetupResult<()> {
        let root = self.root(key)?.to_path_buf();
        if !paths.iter().any(|p| p.exists()) {
            return Err(SetupError::cache(key, "none of the cache paths exist"));
        }

        let entry = Self::entry_dir(&root, key);
        let staging = root.join(format!(".staging-{}", uuid::Uuid::new_v4()));
        let paths = paths.to_vec();
        let owned_key = key.to_string();

        tokio::task::spawn_blocking(move || -> SetupResult<()> {
            let result = stage_and_publish(&paths, &staging, &entry);
            if staging.exists() {
                let _ = fs::remove_dir_all(&staging);
            }
            result.map_err(|e| SetupError::cache(&owned_key, e.to_string()))
        })
        .await
        .map_err(|e| SetupError::Internal(format!("cache save task failed: {}", e)))?
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

fn stage_and_publish(paths: &[PathBuf], staging: &Path, entry: &Path) -> io::Result<()> {
    fs::create_dir_all(staging)?;
    for (index, source) in paths.iter().enumerate() {
        if source.exists() {
            copy_tree(source, &staging.join(index.to_string()))?;
        }
    }

    if entry.exists() {
        fs::remove_dir_all(entry)?;
    }
    fs::rename(staging, entry)
}

/// Recursively copy `src` into `dst`, keeping symlinks as symlinks on unix
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let destination = fs::read_link(link)?;
    if target.symlink_metadata().is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(destination, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    fs::copy(link, target).map(|_| ())
}
