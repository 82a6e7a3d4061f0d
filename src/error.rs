//! Error types for devkit
//!
//! All modules use `DevkitResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devkit operations
pub type DevkitResult<T> = Result<T, DevkitError>;

/// All errors that can occur in devkit
#[derive(Error, Debug)]
pub enum DevkitError {
    // Download errors
    #[error("Download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    // Installer errors
    #[error("Required tool not found: {name}. {hint}")]
    DependencyMissing { name: String, hint: String },

    #[error("Installation of {package} failed: {reason}")]
    InstallFailed { package: String, reason: String },

    #[error("Repository setup for {package} failed: {reason}")]
    RepoSetup { package: String, reason: String },

    #[error("Could not determine distribution codename from /etc/os-release")]
    UnknownCodename,

    // Cache errors
    #[error("Malformed cache index line: {line}")]
    CacheIndexParse { line: String },

    #[error("Failed to read cache index {path}: {source}")]
    CacheIndexRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl DevkitError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Download { .. } => Some("Check your network connection and retry"),
            Self::UnknownCodename => {
                Some("devkit supports Debian and Ubuntu derivatives with /etc/os-release")
            }
            Self::DependencyMissing { .. } => Some("Install the missing tool and retry"),
            _ => None,
        }
    }
}
