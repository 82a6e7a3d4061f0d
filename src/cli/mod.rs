//! CLI surface: argument definitions and command handlers

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
