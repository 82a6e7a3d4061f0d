//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devkit",
    about = "Interactive developer workspace installer for apt-based Linux",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(long, global = true, env = "DEVKIT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive installer menu (default)
    Menu(MenuArgs),
    /// Install one or more packages without the menu
    Install(InstallArgs),
    /// Inspect or clean the download cache
    Cache(CacheArgs),
    /// Manage the configuration file
    Config(ConfigArgs),
    /// Show the installation log
    Log(LogArgs),
}

#[derive(clap::Args)]
pub struct MenuArgs {
    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct InstallArgs {
    /// Packages to install (node, openvpn, gcloud, starship, redis,
    /// terraform, ansible, neovim)
    pub packages: Vec<String>,

    /// Install every supported package
    #[arg(long, conflicts_with = "packages")]
    pub all: bool,

    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show cache location, entry count and total size
    Info,
    /// Remove every cached artifact if the cache exceeds its size limit
    Evict,
    /// Remove every cached artifact unconditionally
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value
    Set { key: String, value: String },
}

#[derive(clap::Args)]
pub struct LogArgs {
    /// Number of trailing lines to show (0 for the whole log)
    #[arg(short = 'n', long, default_value_t = 20)]
    pub lines: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_invocation() {
        let cli = Cli::try_parse_from(["devkit"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_install_with_packages() {
        let cli = Cli::try_parse_from(["devkit", "install", "node", "redis", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Install(args)) => {
                assert_eq!(args.packages, vec!["node", "redis"]);
                assert!(args.yes);
                assert!(!args.all);
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn install_all_conflicts_with_packages() {
        assert!(Cli::try_parse_from(["devkit", "install", "node", "--all"]).is_err());
    }

    #[test]
    fn parses_cache_clear_yes() {
        let cli = Cli::try_parse_from(["devkit", "cache", "clear", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Cache(args)) => {
                assert!(matches!(args.action, CacheAction::Clear { yes: true }));
            }
            _ => panic!("expected cache"),
        }
    }

    #[test]
    fn parses_verbosity_and_config_path() {
        let cli = Cli::try_parse_from(["devkit", "-vv", "--config", "/tmp/c.toml", "menu"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
    }

    #[test]
    fn log_lines_default() {
        let cli = Cli::try_parse_from(["devkit", "log"]).unwrap();
        match cli.command {
            Some(Commands::Log(args)) => assert_eq!(args.lines, 20),
            _ => panic!("expected log"),
        }
    }
}
