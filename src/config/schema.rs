//! Configuration schema for devkit
//!
//! Configuration is stored at `~/.config/devkit/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cache size limit before eviction: 1 GiB
pub const DEFAULT_CACHE_LIMIT_BYTES: u64 = 1024 * 1024 * 1024;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,

    /// Retry policy for network-dependent steps
    pub retry: RetryConfig,

    /// Installation log settings
    pub log: LogConfig,

    /// Google Cloud CLI installer settings
    pub gcloud: GcloudConfig,

    /// Neovim source-build settings
    pub neovim: NeovimConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Artifact cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory (default: ~/.install_cache)
    pub dir: Option<PathBuf>,

    /// Total size limit in bytes before a full eviction sweep
    pub limit_bytes: u64,

    /// Verify artifact digests on cache hits
    pub verify_checksums: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            limit_bytes: DEFAULT_CACHE_LIMIT_BYTES,
            verify_checksums: true,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts per network operation
    pub attempts: u32,

    /// Fixed delay between attempts in seconds
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_secs: 5,
        }
    }
}

/// Installation log configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path (default: ~/installation_log.txt)
    pub file: Option<PathBuf>,
}

/// Google Cloud CLI settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GcloudConfig {
    /// Service account credentials file; the GOOGLE_APPLICATION_CREDENTIALS
    /// environment variable takes precedence
    pub credentials_file: Option<PathBuf>,
}

/// Neovim source-build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeovimConfig {
    /// Git branch or tag to build
    pub branch: String,

    /// Build directory (default: ~/.cache/devkit/neovim-build)
    pub build_dir: Option<PathBuf>,
}

impl Default for NeovimConfig {
    fn default() -> Self {
        Self {
            branch: "stable".to_string(),
            build_dir: None,
        }
    }
}
