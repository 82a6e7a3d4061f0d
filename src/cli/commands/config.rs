//! Configuration file management

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{DevkitError, DevkitResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

pub async fn execute_config(
    manager: &ConfigManager,
    config: Config,
    args: ConfigArgs,
) -> DevkitResult<()> {
    let ui = UiContext::detect();

    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => show(&config),
        ConfigAction::Path => {
            println!("{}", manager.path().display());
            Ok(())
        }
        ConfigAction::Init { force } => init(manager, &ui, force).await,
        ConfigAction::Set { key, value } => set(manager, config, &ui, &key, &value).await,
    }
}

fn show(config: &Config) -> DevkitResult<()> {
    let rendered = toml::to_string_pretty(config)?;
    print!("{}", rendered);
    Ok(())
}

async fn init(manager: &ConfigManager, ui: &UiContext, force: bool) -> DevkitResult<()> {
    if manager.path().exists() && !force {
        return Err(DevkitError::User(format!(
            "{} already exists (use --force to overwrite)",
            manager.path().display()
        )));
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(
        ui,
        "Wrote default configuration",
        &manager.path().display().to_string(),
    );
    Ok(())
}

async fn set(
    manager: &ConfigManager,
    mut config: Config,
    ui: &UiContext,
    key: &str,
    value: &str,
) -> DevkitResult<()> {
    match key {
        "general.verbose" => config.general.verbose = parse_bool(key, value)?,
        "general.log_format" => {
            if value != "text" && value != "json" {
                return Err(DevkitError::User(format!(
                    "general.log_format must be 'text' or 'json', got '{}'",
                    value
                )));
            }
            config.general.log_format = value.to_string();
        }
        "cache.dir" => config.cache.dir = Some(PathBuf::from(value)),
        "cache.limit_bytes" => config.cache.limit_bytes = parse_u64(key, value)?,
        "cache.verify_checksums" => config.cache.verify_checksums = parse_bool(key, value)?,
        "retry.attempts" => config.retry.attempts = parse_u64(key, value)? as u32,
        "retry.delay_secs" => config.retry.delay_secs = parse_u64(key, value)?,
        "log.file" => config.log.file = Some(PathBuf::from(value)),
        "gcloud.credentials_file" => {
            config.gcloud.credentials_file = Some(PathBuf::from(value))
        }
        "neovim.branch" => config.neovim.branch = value.to_string(),
        "neovim.build_dir" => config.neovim.build_dir = Some(PathBuf::from(value)),
        other => {
            return Err(DevkitError::User(format!(
                "Unknown configuration key '{}'.\nValid keys: {}",
                other,
                VALID_KEYS.join(", ")
            )));
        }
    }

    manager.save(&config).await?;
    ui::step_ok(ui, &format!("Set {} = {}", key, value));
    Ok(())
}

const VALID_KEYS: [&str; 11] = [
    "general.verbose",
    "general.log_format",
    "cache.dir",
    "cache.limit_bytes",
    "cache.verify_checksums",
    "retry.attempts",
    "retry.delay_secs",
    "log.file",
    "gcloud.credentials_file",
    "neovim.branch",
    "neovim.build_dir",
];

fn parse_bool(key: &str, value: &str) -> DevkitResult<bool> {
    value
        .parse()
        .map_err(|_| DevkitError::User(format!("{} expects true or false, got '{}'", key, value)))
}

fn parse_u64(key: &str, value: &str) -> DevkitResult<u64> {
    value
        .parse()
        .map_err(|_| DevkitError::User(format!("{} expects a number, got '{}'", key, value)))
}
