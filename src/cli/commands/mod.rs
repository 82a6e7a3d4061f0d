//! Command handlers, one module per subcommand

pub mod cache;
pub mod config;
pub mod install;
pub mod log;
pub mod menu;

pub use cache::execute_cache;
pub use config::execute_config;
pub use install::execute_install;
pub use log::execute_log;
pub use menu::execute_menu;
