//! Artifact downloads
//!
//! Blocking `ureq` transfers run under `spawn_blocking`; cacheable artifacts
//! (keyrings, install scripts) go through the artifact cache, and every
//! transfer is wrapped in the retry policy.

use crate::cache::ArtifactCache;
use crate::error::{DevkitError, DevkitResult};
use crate::logbook::InstallLog;
use crate::retry::{with_retry, RetryPolicy};
use std::path::PathBuf;
use tracing::{debug, info};

/// Fetch a URL into memory
pub async fn fetch_bytes(url: &str) -> DevkitResult<Vec<u8>> {
    let url = url.to_string();
    tokio::task::spawn_blocking(move || fetch_blocking(&url))
        .await
        .map_err(|e| DevkitError::Internal(format!("download task failed: {}", e)))?
}

fn fetch_blocking(url: &str) -> DevkitResult<Vec<u8>> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| DevkitError::download(url, e.to_string()))?;

    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| DevkitError::download(url, e.to_string()))
}

/// Fetch a cacheable artifact, preferring the cache
///
/// On a miss the transfer is retried per policy, the eviction sweep runs if
/// the cache has grown past its limit, and the new artifact is recorded in
/// the index.
pub async fn download_cached(
    cache: &ArtifactCache,
    policy: &RetryPolicy,
    log: &InstallLog,
    key: &str,
    url: &str,
    filename: &str,
) -> DevkitResult<PathBuf> {
    if let Some(path) = cache.get(key).await? {
        info!("Using cached artifact for {}", key);
        log.log(&format!("Cache hit for {}", key)).await;
        return Ok(path);
    }

    log.log(&format!("Downloading {} from {}", key, url)).await;
    let bytes = with_retry(policy, log, &format!("download {}", url), || {
        fetch_bytes(url)
    })
    .await?;

    let report = cache.evict_if_over_limit().await?;
    if report.swept {
        debug!(
            "Cache eviction: {} removed, {} failed",
            report.removed, report.failed
        );
        log.log(&format!(
            "Cache over limit, evicted {} artifact(s) ({} failed)",
            report.removed, report.failed
        ))
        .await;
    }

    let path = cache.put(key, filename, &bytes).await?;
    log.log(&format!("Cached {} ({} bytes)", key, bytes.len()))
        .await;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixtures(dir: &TempDir) -> (ArtifactCache, InstallLog) {
        (
            ArtifactCache::at(dir.path().join("cache"), u64::MAX, true),
            InstallLog::at(dir.path().join("install.log")),
        )
    }

    #[tokio::test]
    async fn cache_hit_skips_download() {
        let dir = TempDir::new().unwrap();
        let (cache, log) = fixtures(&dir);
        tokio::fs::create_dir_all(cache.dir()).await.unwrap();
        cache
            .put("starship:install.sh", "install.sh", b"#!/bin/sh")
            .await
            .unwrap();

        // An unreachable URL proves the hit never touches the network
        let path = download_cached(
            &cache,
            &RetryPolicy::immediate(1),
            &log,
            "starship:install.sh",
            "http://invalid.localdomain/install.sh",
            "install.sh",
        )
        .await
        .unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"#!/bin/sh");
        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.contains("Cache hit for starship:install.sh"));
    }

    #[tokio::test]
    async fn miss_with_unreachable_url_reports_download_error() {
        let dir = TempDir::new().unwrap();
        let (cache, log) = fixtures(&dir);
        tokio::fs::create_dir_all(cache.dir()).await.unwrap();

        let result = download_cached(
            &cache,
            &RetryPolicy::immediate(2),
            &log,
            "k:f",
            "not-a-url",
            "f.bin",
        )
        .await;

        assert!(matches!(result, Err(DevkitError::Download { .. })));
        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.contains("(attempt 2/2)"));
    }
}
