//! apt plumbing: update/install calls, repository setup, idempotency guard
//!
//! Repository setup is guarded by a marker scan over the apt source lists;
//! a second run detects the marker and writes nothing.

use crate::error::{DevkitError, DevkitResult};
use crate::fetch::download_cached;
use crate::retry::with_retry;
use crate::ui::TaskSpinner;
use tokio::fs;
use tracing::debug;

use super::context::InstallContext;

/// Everything needed to configure one signed apt repository
pub struct RepoSpec {
    /// Cache key component, e.g. "node"
    pub component: &'static str,
    /// Marker string whose presence in the source lists means "already set up"
    pub marker: &'static str,
    /// Signing key URL
    pub key_url: &'static str,
    /// Keyring filename under the apt keyrings directory
    pub keyring_file: &'static str,
    /// Source list filename under `sources.list.d`
    pub list_file: &'static str,
    /// The `deb ...` source entry line
    pub entry: String,
}

/// Run `apt-get update`, retry-wrapped
pub async fn apt_update(ctx: &InstallContext) -> DevkitResult<()> {
    with_retry(&ctx.retry, &ctx.log, "apt-get update", || async {
        if ctx.runner.run_visible_sudo("apt-get", &["update"]).await {
            Ok(())
        } else {
            Err(DevkitError::command_exec("apt-get update", "non-zero exit"))
        }
    })
    .await
}

/// Install packages with `apt-get install -y`, retry-wrapped
pub async fn apt_install(ctx: &InstallContext, packages: &[&str]) -> DevkitResult<()> {
    let mut args = vec!["install", "-y"];
    args.extend_from_slice(packages);
    let what = format!("apt-get install {}", packages.join(" "));

    with_retry(&ctx.retry, &ctx.log, &what, || {
        let args = args.clone();
        let what = what.clone();
        async move {
            if ctx.runner.run_visible_sudo("apt-get", &args).await {
                Ok(())
            } else {
                Err(DevkitError::command_exec(what, "non-zero exit"))
            }
        }
    })
    .await
}

/// Idempotency guard: does any apt source list contain the marker?
pub async fn repo_entry_exists(ctx: &InstallContext, marker: &str) -> DevkitResult<bool> {
    let main_list = ctx.apt_root.join("sources.list");
    if let Ok(content) = fs::read_to_string(&main_list).await {
        if content.contains(marker) {
            return Ok(true);
        }
    }

    let sources_dir = ctx.sources_dir();
    let mut entries = match fs::read_dir(&sources_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(DevkitError::io(
                format!("reading {}", sources_dir.display()),
                e,
            ))
        }
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DevkitError::io("reading apt sources dir", e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "list") {
            if let Ok(content) = fs::read_to_string(&path).await {
                if content.contains(marker) {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}

/// Configure a signed apt repository unless its marker is already present
///
/// The signing key goes through the artifact cache; the keyring and source
/// entry are written through the runner. Returns whether anything was added.
pub async fn ensure_repo(ctx: &InstallContext, spec: &RepoSpec) -> DevkitResult<bool> {
    if repo_entry_exists(ctx, spec.marker).await? {
        debug!("{} repository already configured", spec.component);
        ctx.log
            .log(&format!("{} repository already configured", spec.component))
            .await;
        return Ok(false);
    }

    let cache_key = format!("{}:{}", spec.component, spec.keyring_file);
    let mut spinner = TaskSpinner::new(&ctx.ui);
    spinner.start(&format!("Fetching {} signing key", spec.component));
    let cached_key = match download_cached(
        &ctx.cache,
        &ctx.retry,
        &ctx.log,
        &cache_key,
        spec.key_url,
        spec.keyring_file,
    )
    .await
    {
        Ok(path) => {
            spinner.stop(&format!("{} signing key ready", spec.component));
            path
        }
        Err(e) => {
            spinner.stop_error(&format!("{} signing key download failed", spec.component));
            return Err(e);
        }
    };

    let key_bytes = fs::read(&cached_key)
        .await
        .map_err(|e| DevkitError::io(format!("reading {}", cached_key.display()), e))?;

    ctx.runner
        .write_file(&ctx.keyrings_dir().join(spec.keyring_file), &key_bytes)
        .await?;

    let mut entry = spec.entry.clone();
    entry.push('\n');
    ctx.runner
        .write_file(&ctx.sources_dir().join(spec.list_file), entry.as_bytes())
        .await?;

    ctx.log
        .log(&format!("Configured {} repository", spec.component))
        .await;
    Ok(true)
}

/// Distribution codename from the os-release file
pub async fn detect_codename(ctx: &InstallContext) -> DevkitResult<String> {
    let content = fs::read_to_string(&ctx.os_release)
        .await
        .map_err(|_| DevkitError::UnknownCodename)?;
    parse_codename(&content).ok_or(DevkitError::UnknownCodename)
}

/// Extract `VERSION_CODENAME` (falling back to `UBUNTU_CODENAME`)
fn parse_codename(os_release: &str) -> Option<String> {
    let mut fallback = None;
    for line in os_release.lines() {
        if let Some(value) = line.strip_prefix("VERSION_CODENAME=") {
            return Some(value.trim_matches('"').to_string());
        }
        if let Some(value) = line.strip_prefix("UBUNTU_CODENAME=") {
            fallback = Some(value.trim_matches('"').to_string());
        }
    }
    fallback.filter(|s| !s.is_empty())
}
