//! Artifact cache with digest verification and size-bounded eviction
//!
//! Artifacts live flat inside the cache directory next to a `.index` ledger.
//! A hit is only trusted if the artifact's SHA-256 digest still matches the
//! recorded one; eviction is a full flush of every indexed artifact once the
//! directory exceeds the configured limit.

use super::index::{CacheIndex, IndexEntry};
use crate::config::{Config, ConfigManager};
use crate::error::{DevkitError, DevkitResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Name of the index file inside the cache directory
const INDEX_FILE: &str = ".index";

/// Outcome of an eviction sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Whether the directory was over the limit (sweep ran)
    pub swept: bool,
    /// Artifacts removed together with their index lines
    pub removed: usize,
    /// Artifacts whose deletion failed; their index lines are kept
    pub failed: usize,
}

/// Handle to the on-disk artifact cache
///
/// Stateless between calls: every operation reloads the index, so the handle
/// can be shared by value. Single-process access is assumed; there is no
/// locking.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
    limit_bytes: u64,
    verify: bool,
}

impl ArtifactCache {
    /// Create a cache handle from configuration, ensuring the directory exists
    pub async fn open(config: &Config) -> DevkitResult<Self> {
        let dir = ConfigManager::cache_dir(config);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DevkitError::io(format!("creating cache dir {}", dir.display()), e))?;
        Ok(Self {
            dir,
            limit_bytes: config.cache.limit_bytes,
            verify: config.cache.verify_checksums,
        })
    }

    /// Create a handle over an explicit directory (tests)
    pub fn at(dir: PathBuf, limit_bytes: u64, verify: bool) -> Self {
        Self {
            dir,
            limit_bytes,
            verify,
        }
    }

    /// Cache directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up an artifact by exact key match
    ///
    /// A stale entry (artifact gone) or a digest mismatch prunes the record
    /// and reports a miss.
    pub async fn get(&self, key: &str) -> DevkitResult<Option<PathBuf>> {
        let mut index = self.load_index().await?;

        let Some(entry) = index.get(key).cloned() else {
            return Ok(None);
        };

        let path = self.dir.join(&entry.filename);
        if !path.exists() {
            debug!("Pruning stale cache entry for {}", key);
            index.remove(key);
            self.save_index(&index).await?;
            return Ok(None);
        }

        if self.verify {
            let actual = digest_file(&path).await?;
            if actual != entry.digest {
                warn!("Cache digest mismatch for {}, discarding artifact", key);
                if let Err(e) = fs::remove_file(&path).await {
                    warn!("Failed to remove corrupt artifact {}: {}", path.display(), e);
                }
                index.remove(key);
                self.save_index(&index).await?;
                return Ok(None);
            }
        }

        debug!("Cache hit for {}", key);
        Ok(Some(path))
    }

    /// Store an artifact under a key, replacing any previous artifact
    pub async fn put(&self, key: &str, filename: &str, bytes: &[u8]) -> DevkitResult<PathBuf> {
        let mut index = self.load_index().await?;

        let path = self.dir.join(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| DevkitError::io(format!("writing cache artifact {}", path.display()), e))?;

        let replaced = index.upsert(IndexEntry {
            key: key.to_string(),
            filename: filename.to_string(),
            digest: digest_bytes(bytes),
        });
        self.save_index(&index).await?;

        // A key maps to at most one live artifact
        if let Some(old) = replaced {
            let old_path = self.dir.join(old);
            if let Err(e) = fs::remove_file(&old_path).await {
                warn!(
                    "Failed to remove replaced artifact {}: {}",
                    old_path.display(),
                    e
                );
            }
        }

        debug!("Cached {} as {}", key, path.display());
        Ok(path)
    }

    /// Run the eviction sweep if the directory exceeds the size limit
    ///
    /// Deletes every indexed artifact (full flush) and removes each
    /// corresponding index line; a failed deletion is logged and the sweep
    /// continues. Files not referenced by the index are untouched.
    pub async fn evict_if_over_limit(&self) -> DevkitResult<EvictionReport> {
        let total = self.total_size().await?;
        if total <= self.limit_bytes {
            return Ok(EvictionReport::default());
        }

        debug!(
            "Cache size {} exceeds limit {}, flushing",
            total, self.limit_bytes
        );
        self.flush().await
    }

    /// Unconditionally remove every indexed artifact
    pub async fn flush(&self) -> DevkitResult<EvictionReport> {
        let mut index = self.load_index().await?;
        let mut report = EvictionReport {
            swept: true,
            ..Default::default()
        };

        let mut kept = Vec::new();
        for entry in index.entries().to_vec() {
            let path = self.dir.join(&entry.filename);
            match fs::remove_file(&path).await {
                Ok(()) => report.removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => report.removed += 1,
                Err(e) => {
                    warn!("Failed to evict {}: {}", path.display(), e);
                    report.failed += 1;
                    kept.push(entry);
                }
            }
        }

        let mut pruned = CacheIndex::default();
        for entry in kept {
            pruned.upsert(entry);
        }
        index = pruned;
        self.save_index(&index).await?;

        Ok(report)
    }

    /// Total size in bytes of all regular files in the cache directory
    pub async fn total_size(&self) -> DevkitResult<u64> {
        let mut total = 0u64;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| DevkitError::io(format!("reading cache dir {}", self.dir.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DevkitError::io("reading cache dir entry", e))?
        {
            let meta = entry
                .metadata()
                .await
                .map_err(|e| DevkitError::io("reading cache entry metadata", e))?;
            if meta.is_file() {
                total += meta.len();
            }
        }

        Ok(total)
    }

    /// Number of live index records
    pub async fn entry_count(&self) -> DevkitResult<usize> {
        Ok(self.load_index().await?.len())
    }

    async fn load_index(&self) -> DevkitResult<CacheIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(CacheIndex::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| DevkitError::CacheIndexRead { path, source: e })?;
        CacheIndex::parse(&content)
    }

    async fn save_index(&self, index: &CacheIndex) -> DevkitResult<()> {
        let path = self.index_path();
        fs::write(&path, index.to_contents())
            .await
            .map_err(|e| DevkitError::io(format!("writing cache index {}", path.display()), e))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }
}

/// SHA-256 of a byte slice, lowercase hex
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

async fn digest_file(path: &Path) -> DevkitResult<String> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| DevkitError::io(format!("hashing {}", path.display()), e))?;
    Ok(digest_bytes(&bytes))
}
