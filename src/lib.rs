//! devkit - Interactive developer workspace installer
//!
//! Installs a fixed set of developer tools on apt-based Linux through an
//! interactive menu, with a verified download cache and retry-wrapped
//! network steps.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod installer;
pub mod logbook;
pub mod retry;
pub mod ui;

pub use error::{DevkitError, DevkitResult};
