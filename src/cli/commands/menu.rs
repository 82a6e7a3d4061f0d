//! Interactive installer menu
//!
//! Reads numeric choices from stdin in a loop. Invalid input redisplays the
//! menu; a failed package install returns to the menu rather than ending the
//! session. Only choice 0 (or EOF) exits.

use crate::cli::args::MenuArgs;
use crate::config::Config;
use crate::error::DevkitResult;
use crate::installer::{run_package, InstallContext, Package, ALL};
use crate::ui::{self, UiContext};
use tracing::debug;

/// One parsed menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Package(Package),
    All,
    Exit,
}

/// Map raw input to a choice. Digits 1 through 8 select a package in menu
/// order, 9 selects everything, 0 exits. Anything else is rejected.
pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "0" => Some(MenuChoice::Exit),
        "9" => Some(MenuChoice::All),
        other => {
            let n: usize = other.parse().ok()?;
            ALL.get(n.checked_sub(1)?).copied().map(MenuChoice::Package)
        }
    }
}

fn render_menu(ctx: &UiContext) {
    ui::section(ctx, "devkit installer");
    for (i, package) in ALL.iter().enumerate() {
        println!("  {})  {}", i + 1, package.name());
    }
    println!("  9)  Install all of the above");
    println!("  0)  Exit");
}

pub async fn execute_menu(config: Config, args: MenuArgs, verbose: bool) -> DevkitResult<()> {
    let mut ui = UiContext::detect();
    if args.yes {
        ui = ui.with_auto_yes(true);
    }
    if verbose {
        ui::remark(&ui, "Verbose logging enabled");
    }

    let ctx = InstallContext::new(config, ui).await?;
    run_menu_loop(&ctx).await
}

async fn run_menu_loop(ctx: &InstallContext) -> DevkitResult<()> {
    loop {
        render_menu(&ctx.ui);

        let line = tokio::task::spawn_blocking(|| ui::read_line_inline("Select an option: "))
            .await
            .unwrap_or(None);

        let Some(line) = line else {
            // EOF on stdin ends the session like an explicit exit
            debug!("stdin closed, leaving menu");
            break;
        };

        match parse_choice(&line) {
            None => {
                ui::step_warn(&ctx.ui, "Please enter a number between 0 and 9");
            }
            Some(MenuChoice::Exit) => break,
            Some(MenuChoice::Package(package)) => {
                run_package(ctx, package).await?;
            }
            Some(MenuChoice::All) => {
                install_all(ctx).await?;
            }
        }
    }

    ui::outro_success(&ctx.ui, "Goodbye");
    Ok(())
}

/// Install every package after a second confirmation. Declining installs
/// nothing and returns to the menu.
async fn install_all(ctx: &InstallContext) -> DevkitResult<()> {
    let auto_yes = ctx.ui.auto_yes();
    let confirmed = tokio::task::spawn_blocking(move || {
        ui::confirm_inline("Install all 8 packages?", auto_yes)
    })
    .await
    .unwrap_or(false);

    if !confirmed {
        ctx.log.log("Install-all cancelled").await;
        ui::remark(&ctx.ui, "Install-all cancelled");
        return Ok(());
    }

    for package in ALL {
        run_package(ctx, package).await?;
    }
    Ok(())
}
