//! devkit - Interactive developer workspace installer
//!
//! CLI entry point that dispatches to subcommands. With no subcommand the
//! interactive menu runs.

use clap::Parser;
use console::style;
use devkit::cli::{commands, Cli, Commands};
use devkit::config::ConfigManager;
use devkit::error::DevkitResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DevkitResult<()> {
    let cli = Cli::parse();

    // 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("devkit=warn"),
        1 => EnvFilter::new("devkit=info"),
        _ => EnvFilter::new("devkit=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    match cli.command {
        None => {
            commands::execute_menu(
                config,
                devkit::cli::args::MenuArgs { yes: false },
                cli.verbose > 0,
            )
            .await
        }
        Some(Commands::Menu(args)) => commands::execute_menu(config, args, cli.verbose > 0).await,
        Some(Commands::Install(args)) => commands::execute_install(config, args).await,
        Some(Commands::Cache(args)) => commands::execute_cache(config, args).await,
        Some(Commands::Config(args)) => {
            commands::execute_config(&config_manager, config, args).await
        }
        Some(Commands::Log(args)) => commands::execute_log(config, args).await,
    }
}
