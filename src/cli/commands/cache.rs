//! Download cache inspection and cleanup

use crate::cache::ArtifactCache;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::{Config, ConfigManager};
use crate::error::DevkitResult;
use crate::ui::{self, UiContext};

pub async fn execute_cache(config: Config, args: CacheArgs) -> DevkitResult<()> {
    let ui = UiContext::detect();
    let cache = ArtifactCache::open(&config).await?;

    match args.action {
        CacheAction::Info => info(&config, &cache, &ui).await,
        CacheAction::Evict => evict(&cache, &ui).await,
        CacheAction::Clear { yes } => clear(&cache, &ui, yes).await,
    }
}

async fn info(config: &Config, cache: &ArtifactCache, ui: &UiContext) -> DevkitResult<()> {
    ui::section(ui, "Download cache");
    ui::key_value(
        ui,
        "Location",
        &ConfigManager::cache_dir(config).display().to_string(),
    );
    ui::key_value(ui, "Entries", &cache.entry_count().await?.to_string());
    ui::key_value(ui, "Size", &format_bytes(cache.total_size().await?));
    ui::key_value(ui, "Limit", &format_bytes(config.cache.limit_bytes));
    Ok(())
}

async fn evict(cache: &ArtifactCache, ui: &UiContext) -> DevkitResult<()> {
    let report = cache.evict_if_over_limit().await?;
    if report.swept {
        ui::step_ok_detail(
            ui,
            "Cache evicted",
            &format!("{} removed, {} failed", report.removed, report.failed),
        );
    } else {
        ui::step_info(ui, "Cache is within its size limit");
    }
    Ok(())
}

async fn clear(cache: &ArtifactCache, ui: &UiContext, yes: bool) -> DevkitResult<()> {
    let confirmed = yes || ui::confirm(ui, "Remove every cached artifact?", false).await?;
    if !confirmed {
        ui::remark(ui, "Cancelled");
        return Ok(());
    }

    let report = cache.flush().await?;
    ui::step_ok_detail(
        ui,
        "Cache cleared",
        &format!("{} removed, {} failed", report.removed, report.failed),
    );
    Ok(())
}

/// Human-readable byte count with a binary unit
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
