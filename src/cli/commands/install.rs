//! Non-interactive install command

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::{DevkitError, DevkitResult};
use crate::installer::{run_package, InstallContext, InstallOutcome, Package, ALL};
use crate::ui::{self, UiContext};

pub async fn execute_install(config: Config, args: InstallArgs) -> DevkitResult<()> {
    let packages = resolve_packages(&args)?;

    let mut ui = UiContext::detect();
    if args.yes {
        ui = ui.with_auto_yes(true);
    }
    let ctx = InstallContext::new(config, ui).await?;

    let mut installed = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for package in &packages {
        match run_package(&ctx, *package).await? {
            InstallOutcome::Installed => installed += 1,
            InstallOutcome::Skipped => skipped += 1,
            InstallOutcome::Failed => failed += 1,
        }
    }

    ui::key_value(&ctx.ui, "Installed", &installed.to_string());
    ui::key_value(&ctx.ui, "Skipped", &skipped.to_string());
    ui::key_value(&ctx.ui, "Failed", &failed.to_string());

    if failed > 0 {
        Err(DevkitError::User(format!(
            "{} package(s) failed to install",
            failed
        )))
    } else {
        ui::outro_success(&ctx.ui, "Done");
        Ok(())
    }
}

fn resolve_packages(args: &InstallArgs) -> DevkitResult<Vec<Package>> {
    if args.all {
        return Ok(ALL.to_vec());
    }
    if args.packages.is_empty() {
        return Err(DevkitError::User(
            "No packages given. Name packages to install or pass --all".to_string(),
        ));
    }

    args.packages
        .iter()
        .map(|name| name.parse::<Package>().map_err(DevkitError::User))
        .collect()
}
