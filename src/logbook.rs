//! Installation log
//!
//! Appends timestamped entries to a single file for the lifetime of the
//! process; entries are never mutated or deleted by the tool. Text lines by
//! default, JSON lines when configured.

use crate::config::{Config, ConfigManager};
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Entry layout of the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `timestamp  message` lines
    Text,
    /// One JSON object per line with `ts` and `message` fields
    Json,
}

/// File-based installation logger
///
/// Write failures degrade to a tracing warning; logging never aborts the
/// install workflow.
#[derive(Debug, Clone)]
pub struct InstallLog {
    path: PathBuf,
    format: LogFormat,
}

impl InstallLog {
    /// Create a logger from config
    pub fn new(config: &Config) -> Self {
        let format = match config.general.log_format.as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            path: ConfigManager::log_path(config),
            format,
        }
    }

    /// Create a logger writing text lines to an explicit path
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            format: LogFormat::Text,
        }
    }

    /// Log file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append a timestamped entry
    pub async fn log(&self, message: &str) {
        let timestamp = Utc::now().to_rfc3339();
        let line = match self.format {
            LogFormat::Text => format!("{}  {}\n", timestamp, message),
            LogFormat::Json => format!(
                "{}\n",
                serde_json::json!({ "ts": timestamp, "message": message })
            ),
        };
        if let Err(e) = self.append(&line).await {
            warn!("Failed to write install log: {}", e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_timestamped_line() {
        let dir = TempDir::new().unwrap();
        let log = InstallLog::at(dir.path().join("install.log"));

        log.log("Installing redis").await;

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        let line = content.trim();
        let (timestamp, message) = line.split_once("  ").unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert_eq!(message, "Installing redis");
    }

    #[tokio::test]
    async fn appends_in_order() {
        let dir = TempDir::new().unwrap();
        let log = InstallLog::at(dir.path().join("install.log"));

        log.log("first").await;
        log.log("second").await;

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[tokio::test]
    async fn json_format_emits_one_object_per_line() {
        let dir = TempDir::new().unwrap();
        let mut config = crate::config::Config::default();
        config.general.log_format = "json".to_string();
        config.log.file = Some(dir.path().join("install.log"));
        let log = InstallLog::new(&config);

        log.log("Installing redis").await;

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["message"], "Installing redis");
        assert!(entry["ts"].as_str().is_some());
    }

    #[tokio::test]
    async fn creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let log = InstallLog::at(dir.path().join("nested").join("install.log"));

        log.log("entry").await;

        assert!(log.path().exists());
    }
}
