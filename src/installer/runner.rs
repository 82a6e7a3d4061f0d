//! Process execution seam for installer routines
//!
//! All system mutations (package manager calls, privileged file writes) go
//! through `SystemRunner`, so tests can substitute a recording fake and
//! assert that a declined prompt performs no mutation at all.

use crate::error::{DevkitError, DevkitResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Abstract host-system interface for installer routines
#[async_trait]
pub trait SystemRunner: Send + Sync {
    /// Run a command with inherited stdio, returning whether it succeeded
    async fn run_visible(&self, cmd: &str, args: &[&str]) -> bool;

    /// Run a command under sudo with inherited stdio
    async fn run_visible_sudo(&self, cmd: &str, args: &[&str]) -> bool;

    /// Run a command capturing stdout
    async fn run_capture(&self, cmd: &str, args: &[&str]) -> DevkitResult<String>;

    /// Check whether a command is available on PATH
    async fn which(&self, cmd: &str) -> bool;

    /// Write a file that may require elevated privileges
    async fn write_file(&self, path: &Path, content: &[u8]) -> DevkitResult<()>;
}

/// Runner executing against the real host
pub struct HostRunner;

#[async_trait]
impl SystemRunner for HostRunner {
    async fn run_visible(&self, cmd: &str, args: &[&str]) -> bool {
        Command::new(cmd)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn run_visible_sudo(&self, cmd: &str, args: &[&str]) -> bool {
        Command::new("sudo")
            .arg(cmd)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn run_capture(&self, cmd: &str, args: &[&str]) -> DevkitResult<String> {
        let output = Command::new(cmd)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DevkitError::command_failed(cmd, e))?;

        if !output.status.success() {
            return Err(DevkitError::command_exec(
                format!("{} {}", cmd, args.join(" ")),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn which(&self, cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> DevkitResult<()> {
        match tokio::fs::write(path, content).await {
            Ok(()) => Ok(()),
            // Privileged location: fall back to sudo tee
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                self.write_file_sudo(path, content).await
            }
            Err(e) => Err(DevkitError::io(format!("writing {}", path.display()), e)),
        }
    }
}

impl HostRunner {
    async fn write_file_sudo(&self, path: &Path, content: &[u8]) -> DevkitResult<()> {
        let mut child = Command::new("sudo")
            .arg("tee")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DevkitError::command_failed("sudo tee", e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(content)
                .await
                .map_err(|e| DevkitError::io(format!("piping to sudo tee {}", path.display()), e))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DevkitError::command_failed("sudo tee", e))?;

        if !status.success() {
            return Err(DevkitError::command_exec(
                format!("sudo tee {}", path.display()),
                "non-zero exit",
            ));
        }
        Ok(())
    }
}
