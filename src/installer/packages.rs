//! Per-package install routines
//!
//! Each routine covers repo setup (idempotent), the package-manager call,
//! and any post-install verification. Prompting and outcome mapping live in
//! the dispatcher; routines report plain `DevkitResult<()>`.

use crate::error::{DevkitError, DevkitResult};
use crate::fetch::download_cached;
use crate::retry::with_retry;
use crate::ui;
use std::path::PathBuf;
use tracing::info;

use super::apt::{self, RepoSpec};
use super::context::InstallContext;

/// Base packages installed by the pre-flight step
const BASE_PACKAGES: &[&str] = &["curl", "git", "gnupg", "ca-certificates", "build-essential"];

/// One-time system update and base package installation
pub async fn preflight(ctx: &InstallContext) -> DevkitResult<()> {
    if !ctx.take_preflight() {
        return Ok(());
    }

    ui::section(&ctx.ui, "Pre-flight: system update and base packages");
    ctx.log.log("Running pre-flight system update").await;

    apt::apt_update(ctx).await?;
    apt::apt_install(ctx, BASE_PACKAGES).await?;

    ctx.log.log("Pre-flight complete").await;
    Ok(())
}

pub(super) async fn install_node(ctx: &InstallContext) -> DevkitResult<()> {
    let spec = RepoSpec {
        component: "node",
        marker: "deb.nodesource.com",
        key_url: "https://deb.nodesource.com/gpgkey/nodesource-repo.gpg.key",
        keyring_file: "nodesource.gpg",
        list_file: "nodesource.list",
        entry: "deb [signed-by=/etc/apt/keyrings/nodesource.gpg] https://deb.nodesource.com/node_20.x nodistro main".to_string(),
    };

    if apt::ensure_repo(ctx, &spec).await? {
        apt::apt_update(ctx).await?;
    }
    apt::apt_install(ctx, &["nodejs"]).await
}

pub(super) async fn install_openvpn(ctx: &InstallContext) -> DevkitResult<()> {
    apt::apt_install(ctx, &["openvpn"]).await
}

pub(super) async fn install_gcloud(ctx: &InstallContext) -> DevkitResult<()> {
    let spec = RepoSpec {
        component: "gcloud",
        marker: "cloud-sdk",
        key_url: "https://packages.cloud.google.com/apt/doc/apt-key.gpg",
        keyring_file: "cloud.google.gpg",
        list_file: "google-cloud-sdk.list",
        entry: "deb [signed-by=/etc/apt/keyrings/cloud.google.gpg] https://packages.cloud.google.com/apt cloud-sdk main".to_string(),
    };

    if apt::ensure_repo(ctx, &spec).await? {
        apt::apt_update(ctx).await?;
    }
    apt::apt_install(ctx, &["google-cloud-cli"]).await?;

    check_gcloud_credentials(ctx).await;
    Ok(())
}

/// Surface the configured service-account credentials, if any.
/// `GOOGLE_APPLICATION_CREDENTIALS` overrides the config value.
async fn check_gcloud_credentials(ctx: &InstallContext) {
    let path: Option<PathBuf> = std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS")
        .map(PathBuf::from)
        .or_else(|| ctx.config.gcloud.credentials_file.clone());

    let Some(path) = path else {
        ui::remark(
            &ctx.ui,
            "No service-account credentials configured; run: gcloud auth login",
        );
        return;
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(doc) => {
                let account = doc
                    .get("client_email")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown account");
                ui::step_ok_detail(&ctx.ui, "Service-account credentials found", account);
                ctx.log
                    .log(&format!("gcloud credentials at {}", path.display()))
                    .await;
            }
            Err(e) => {
                ui::step_warn_hint(
                    &ctx.ui,
                    "Credentials file is not valid JSON",
                    &e.to_string(),
                );
            }
        },
        Err(_) => {
            ui::step_warn_hint(
                &ctx.ui,
                "Configured credentials file is not readable",
                &path.display().to_string(),
            );
        }
    }
}

pub(super) async fn install_starship(ctx: &InstallContext) -> DevkitResult<()> {
    let mut spinner = ui::TaskSpinner::new(&ctx.ui);
    spinner.start("Fetching Starship install script");
    let script = match download_cached(
        &ctx.cache,
        &ctx.retry,
        &ctx.log,
        "starship:install.sh",
        "https://starship.rs/install.sh",
        "starship-install.sh",
    )
    .await
    {
        Ok(path) => {
            spinner.stop("Install script ready");
            path
        }
        Err(e) => {
            spinner.stop_error("Install script download failed");
            return Err(e);
        }
    };

    let script = script.display().to_string();
    if ctx
        .runner
        .run_visible_sudo("sh", &[&script, "--yes"])
        .await
    {
        Ok(())
    } else {
        Err(DevkitError::InstallFailed {
            package: "starship".to_string(),
            reason: "install script exited non-zero".to_string(),
        })
    }
}

pub(super) async fn install_redis(ctx: &InstallContext) -> DevkitResult<()> {
    apt::apt_install(ctx, &["redis-server"]).await?;

    // Best-effort service start before the functional check
    if !ctx
        .runner
        .run_visible_sudo("systemctl", &["start", "redis-server"])
        .await
    {
        ui::remark(&ctx.ui, "Could not start redis-server via systemctl");
    }

    verify_redis(ctx).await;
    Ok(())
}

/// Post-install check: ping the running service. Failure is logged but
/// non-fatal.
async fn verify_redis(ctx: &InstallContext) {
    match ctx.runner.run_capture("redis-cli", &["ping"]).await {
        Ok(output) if output.trim() == "PONG" => {
            ui::step_ok(&ctx.ui, "Redis responded to ping");
            ctx.log.log("Redis verification: PONG").await;
        }
        Ok(output) => {
            ui::step_warn_hint(&ctx.ui, "Unexpected redis-cli reply", output.trim());
            ctx.log
                .log(&format!("Redis verification failed: {}", output.trim()))
                .await;
        }
        Err(e) => {
            ui::step_warn_hint(&ctx.ui, "Redis ping failed", &e.to_string());
            ctx.log
                .log(&format!("Redis verification failed: {}", e))
                .await;
        }
    }
}

pub(super) async fn install_terraform(ctx: &InstallContext) -> DevkitResult<()> {
    let codename = apt::detect_codename(ctx).await?;
    let spec = RepoSpec {
        component: "terraform",
        marker: "apt.releases.hashicorp.com",
        key_url: "https://apt.releases.hashicorp.com/gpg",
        keyring_file: "hashicorp.gpg",
        list_file: "hashicorp.list",
        entry: format!(
            "deb [signed-by=/etc/apt/keyrings/hashicorp.gpg] https://apt.releases.hashicorp.com {} main",
            codename
        ),
    };

    if apt::ensure_repo(ctx, &spec).await? {
        apt::apt_update(ctx).await?;
    }
    apt::apt_install(ctx, &["terraform"]).await
}

pub(super) async fn install_ansible(ctx: &InstallContext) -> DevkitResult<()> {
    if !apt::repo_entry_exists(ctx, "ansible").await? {
        if !ctx.runner.which("add-apt-repository").await {
            return Err(DevkitError::DependencyMissing {
                name: "add-apt-repository".to_string(),
                hint: "Install software-properties-common first".to_string(),
            });
        }

        with_retry(&ctx.retry, &ctx.log, "add ansible PPA", || async {
            if ctx
                .runner
                .run_visible_sudo("add-apt-repository", &["--yes", "ppa:ansible/ansible"])
                .await
            {
                Ok(())
            } else {
                Err(DevkitError::RepoSetup {
                    package: "ansible".to_string(),
                    reason: "add-apt-repository exited non-zero".to_string(),
                })
            }
        })
        .await?;

        apt::apt_update(ctx).await?;
    } else {
        info!("ansible repository already configured");
        ctx.log.log("ansible repository already configured").await;
    }

    apt::apt_install(ctx, &["ansible"]).await
}

pub(super) async fn install_neovim(ctx: &InstallContext) -> DevkitResult<()> {
    for tool in ["git", "make", "cmake"] {
        if !ctx.runner.which(tool).await {
            return Err(DevkitError::DependencyMissing {
                name: tool.to_string(),
                hint: "Required to build Neovim from source".to_string(),
            });
        }
    }

    let build_dir = crate::config::ConfigManager::neovim_build_dir(&ctx.config);
    let build_dir_str = build_dir.display().to_string();
    let branch = ctx.config.neovim.branch.clone();

    if build_dir.join(".git").exists() {
        ui::remark(&ctx.ui, "Updating existing Neovim checkout");
        with_retry(&ctx.retry, &ctx.log, "git pull neovim", || {
            let build_dir_str = build_dir_str.clone();
            async move {
                if ctx
                    .runner
                    .run_visible("git", &["-C", &build_dir_str, "pull", "--ff-only"])
                    .await
                {
                    Ok(())
                } else {
                    Err(DevkitError::command_exec("git pull", "non-zero exit"))
                }
            }
        })
        .await?;
    } else {
        with_retry(&ctx.retry, &ctx.log, "git clone neovim", || {
            let build_dir_str = build_dir_str.clone();
            let branch = branch.clone();
            async move {
                if ctx
                    .runner
                    .run_visible(
                        "git",
                        &[
                            "clone",
                            "--depth",
                            "1",
                            "--branch",
                            &branch,
                            "https://github.com/neovim/neovim",
                            &build_dir_str,
                        ],
                    )
                    .await
                {
                    Ok(())
                } else {
                    Err(DevkitError::command_exec("git clone neovim", "non-zero exit"))
                }
            }
        })
        .await?;
    }

    let built = ctx
        .runner
        .run_visible(
            "make",
            &["-C", &build_dir_str, "CMAKE_BUILD_TYPE=RelWithDebInfo"],
        )
        .await;
    if !built {
        return Err(DevkitError::InstallFailed {
            package: "neovim".to_string(),
            reason: "make build failed".to_string(),
        });
    }

    if ctx
        .runner
        .run_visible_sudo("make", &["-C", &build_dir_str, "install"])
        .await
    {
        Ok(())
    } else {
        Err(DevkitError::InstallFailed {
            package: "neovim".to_string(),
            reason: "make install failed".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::context::testing::test_context;
    use tempfile::TempDir;

    #[tokio::test]
    async fn openvpn_invokes_apt_only() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);

        install_openvpn(&ctx).await.unwrap();
        assert_eq!(
            runner.recorded(),
            vec!["sudo apt-get install -y openvpn".to_string()]
        );
    }

    #[tokio::test]
    async fn node_skips_repo_setup_when_marker_present() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        tokio::fs::write(
            ctx.sources_dir().join("nodesource.list"),
            "deb https://deb.nodesource.com/node_20.x nodistro main\n",
        )
        .await
        .unwrap();

        install_node(&ctx).await.unwrap();

        // No apt-get update, no keyring write: only the install call
        assert_eq!(
            runner.recorded(),
            vec!["sudo apt-get install -y nodejs".to_string()]
        );
    }

    #[tokio::test]
    async fn redis_verification_failure_is_non_fatal() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        runner.set_capture_output("redis-cli", "ERR not ready");

        install_redis(&ctx).await.unwrap();

        let log = tokio::fs::read_to_string(ctx.log.path()).await.unwrap();
        assert!(log.contains("Redis verification failed"));
    }

    #[tokio::test]
    async fn redis_verification_pong() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        runner.set_capture_output("redis-cli", "PONG\n");

        install_redis(&ctx).await.unwrap();

        let log = tokio::fs::read_to_string(ctx.log.path()).await.unwrap();
        assert!(log.contains("Redis verification: PONG"));
    }

    #[tokio::test]
    async fn neovim_missing_toolchain_aborts_early() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        runner.mark_missing("cmake");

        let err = install_neovim(&ctx).await.unwrap_err();
        assert!(matches!(err, DevkitError::DependencyMissing { .. }));
        assert!(runner.recorded().is_empty());
    }

    #[tokio::test]
    async fn terraform_requires_codename() {
        let dir = TempDir::new().unwrap();
        let (ctx, _) = test_context(&dir);
        // No os-release file in the test context

        let err = install_terraform(&ctx).await.unwrap_err();
        assert!(matches!(err, DevkitError::UnknownCodename));
    }

    #[tokio::test]
    async fn terraform_entry_uses_codename() {
        let dir = TempDir::new().unwrap();
        let (ctx, _runner) = test_context(&dir);
        tokio::fs::write(&ctx.os_release, "VERSION_CODENAME=noble\n")
            .await
            .unwrap();
        ctx.cache
            .put("terraform:hashicorp.gpg", "hashicorp.gpg", b"key")
            .await
            .unwrap();

        install_terraform(&ctx).await.unwrap();

        let entry = tokio::fs::read_to_string(ctx.sources_dir().join("hashicorp.list"))
            .await
            .unwrap();
        assert!(entry.contains("https://apt.releases.hashicorp.com noble main"));
    }

    #[tokio::test]
    async fn ansible_missing_ppa_tool_reports_dependency() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        runner.mark_missing("add-apt-repository");

        let err = install_ansible(&ctx).await.unwrap_err();
        assert!(matches!(err, DevkitError::DependencyMissing { .. }));
    }

    #[tokio::test]
    async fn ansible_skips_ppa_when_configured() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        tokio::fs::write(
            ctx.sources_dir().join("ansible.list"),
            "deb https://ppa.launchpadcontent.net/ansible/ansible/ubuntu noble main\n",
        )
        .await
        .unwrap();

        install_ansible(&ctx).await.unwrap();
        assert_eq!(
            runner.recorded(),
            vec!["sudo apt-get install -y ansible".to_string()]
        );
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn gcloud_reports_credentials_from_env() {
        let dir = TempDir::new().unwrap();
        let (ctx, _runner) = test_context(&dir);
        ctx.cache
            .put("gcloud:cloud.google.gpg", "cloud.google.gpg", b"key")
            .await
            .unwrap();

        let creds = dir.path().join("sa.json");
        tokio::fs::write(&creds, r#"{"client_email": "ci@example.iam.gserviceaccount.com"}"#)
            .await
            .unwrap();
        std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", &creds);

        let result = install_gcloud(&ctx).await;
        std::env::remove_var("GOOGLE_APPLICATION_CREDENTIALS");
        result.unwrap();

        let log = tokio::fs::read_to_string(ctx.log.path()).await.unwrap();
        assert!(log.contains("gcloud credentials at"));
    }

    #[tokio::test]
    async fn starship_runs_cached_script() {
        let dir = TempDir::new().unwrap();
        let (ctx, runner) = test_context(&dir);
        ctx.cache
            .put("starship:install.sh", "starship-install.sh", b"#!/bin/sh")
            .await
            .unwrap();

        install_starship(&ctx).await.unwrap();

        let calls = runner.recorded();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("sudo sh "));
        assert!(calls[0].ends_with("--yes"));
    }
}
