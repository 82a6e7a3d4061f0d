//! Shared context threaded through every installer routine
//!
//! One object owns the configuration, cache, log, retry policy, runner and
//! system paths; no routine re-derives them locally.

use crate::cache::ArtifactCache;
use crate::config::{Config, ConfigManager};
use crate::error::DevkitResult;
use crate::logbook::InstallLog;
use crate::retry::RetryPolicy;
use crate::ui::UiContext;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::runner::{HostRunner, SystemRunner};

/// Everything an installer routine needs
pub struct InstallContext {
    pub config: Config,
    pub ui: UiContext,
    pub cache: ArtifactCache,
    pub log: InstallLog,
    pub retry: RetryPolicy,
    pub runner: Arc<dyn SystemRunner>,
    /// apt configuration root, normally `/etc/apt`
    pub apt_root: PathBuf,
    /// os-release path, normally `/etc/os-release`
    pub os_release: PathBuf,
    preflight_done: AtomicBool,
}

impl InstallContext {
    /// Build a context against the real host
    pub async fn new(config: Config, ui: UiContext) -> DevkitResult<Self> {
        let cache = ArtifactCache::open(&config).await?;
        let log = InstallLog::new(&config);
        let retry = RetryPolicy::from_config(&config);

        Ok(Self {
            config,
            ui,
            cache,
            log,
            retry,
            runner: Arc::new(HostRunner),
            apt_root: PathBuf::from("/etc/apt"),
            os_release: PathBuf::from("/etc/os-release"),
            preflight_done: AtomicBool::new(false),
        })
    }

    /// Whether the pre-flight step still needs to run; flips the guard so it
    /// runs at most once per process.
    pub fn take_preflight(&self) -> bool {
        !self.preflight_done.swap(true, Ordering::SeqCst)
    }

    /// apt sources directory (`sources.list.d`)
    pub fn sources_dir(&self) -> PathBuf {
        self.apt_root.join("sources.list.d")
    }

    /// apt keyrings directory
    pub fn keyrings_dir(&self) -> PathBuf {
        self.apt_root.join("keyrings")
    }
}
