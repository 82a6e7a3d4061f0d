//! Package installation engine
//!
//! The dispatcher owns the prompt, the one-time pre-flight, and outcome
//! mapping. A routine error marks that package as failed and is absorbed
//! here; callers decide whether a failed package ends the session.

pub mod apt;
pub mod context;
pub mod packages;
pub mod runner;

use std::fmt;
use std::str::FromStr;

use crate::error::DevkitResult;
use crate::ui;
use tracing::{info, warn};

pub use context::InstallContext;
pub use runner::{HostRunner, SystemRunner};

/// Everything the installer knows how to set up, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Package {
    Node,
    Openvpn,
    Gcloud,
    Starship,
    Redis,
    Terraform,
    Ansible,
    Neovim,
}

/// Menu order. Index + 1 is the menu digit.
pub const ALL: [Package; 8] = [
    Package::Node,
    Package::Openvpn,
    Package::Gcloud,
    Package::Starship,
    Package::Redis,
    Package::Terraform,
    Package::Ansible,
    Package::Neovim,
];

impl Package {
    /// Display name used in menus and the install log.
    pub fn name(&self) -> &'static str {
        match self {
            Package::Node => "Node.js",
            Package::Openvpn => "OpenVPN",
            Package::Gcloud => "Google Cloud CLI",
            Package::Starship => "Starship",
            Package::Redis => "Redis",
            Package::Terraform => "Terraform",
            Package::Ansible => "Ansible",
            Package::Neovim => "Neovim",
        }
    }

    /// Stable lowercase identifier accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Package::Node => "node",
            Package::Openvpn => "openvpn",
            Package::Gcloud => "gcloud",
            Package::Starship => "starship",
            Package::Redis => "redis",
            Package::Terraform => "terraform",
            Package::Ansible => "ansible",
            Package::Neovim => "neovim",
        }
    }

    fn prompt(&self) -> String {
        format!("Install {}?", self.name())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Package {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ALL.iter()
            .find(|p| p.key() == needle)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<&str> = ALL.iter().map(|p| p.key()).collect();
                format!("unknown package '{}' (valid: {})", s, valid.join(", "))
            })
    }
}

/// What happened to one package during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Skipped,
    Installed,
    Failed,
}

/// Prompt for a package and run its routine if confirmed.
///
/// A declined prompt performs no system mutation. A routine error is
/// reported and logged but mapped to `Failed` rather than propagated, so
/// one broken package never aborts the rest of a session.
pub async fn run_package(ctx: &InstallContext, package: Package) -> DevkitResult<InstallOutcome> {
    let prompt = package.prompt();
    let auto_yes = ctx.ui.auto_yes();
    let accepted = tokio::task::spawn_blocking(move || ui::confirm_inline(&prompt, auto_yes))
        .await
        .unwrap_or(false);
    if !accepted {
        info!("skipping {}", package.key());
        ctx.log.log(&format!("Skipping {}", package.name())).await;
        return Ok(InstallOutcome::Skipped);
    }

    ctx.log.log(&format!("Installing {}", package.name())).await;
    ui::section(&ctx.ui, &format!("Installing {}", package.name()));

    if let Err(e) = packages::preflight(ctx).await {
        warn!("pre-flight failed: {}", e);
        ui::step_error_detail(&ctx.ui, "Pre-flight failed", &e.to_string());
        ctx.log
            .log(&format!("Failed {}: {}", package.name(), e))
            .await;
        return Ok(InstallOutcome::Failed);
    }

    let result = match package {
        Package::Node => packages::install_node(ctx).await,
        Package::Openvpn => packages::install_openvpn(ctx).await,
        Package::Gcloud => packages::install_gcloud(ctx).await,
        Package::Starship => packages::install_starship(ctx).await,
        Package::Redis => packages::install_redis(ctx).await,
        Package::Terraform => packages::install_terraform(ctx).await,
        Package::Ansible => packages::install_ansible(ctx).await,
        Package::Neovim => packages::install_neovim(ctx).await,
    };

    match result {
        Ok(()) => {
            ui::step_ok(&ctx.ui, &format!("{} installed", package.name()));
            ctx.log.log(&format!("Installed {}", package.name())).await;
            Ok(InstallOutcome::Installed)
        }
        Err(e) => {
            warn!("{} failed: {}", package.key(), e);
            ui::step_error_detail(
                &ctx.ui,
                &format!("{} failed", package.name()),
                &e.to_string(),
            );
            ctx.log
                .log(&format!("Failed {}: {}", package.name(), e))
                .await;
            Ok(InstallOutcome::Failed)
        }
    }
}
