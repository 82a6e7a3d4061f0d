//! Installation log viewer

use crate::cli::args::LogArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{DevkitError, DevkitResult};

pub async fn execute_log(config: Config, args: LogArgs) -> DevkitResult<()> {
    let path = ConfigManager::log_path(&config);

    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No installation log yet.");
            return Ok(());
        }
        Err(e) => {
            return Err(DevkitError::io(
                format!("reading log {}", path.display()),
                e,
            ))
        }
    };

    for line in tail(&contents, args.lines as usize) {
        println!("{}", line);
    }
    Ok(())
}

/// Last `n` non-empty lines, oldest first. `n == 0` means the whole log.
fn tail(contents: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = contents.lines().filter(|l| !l.is_empty()).collect();
    if n == 0 || n >= lines.len() {
        lines
    } else {
        lines[lines.len() - n..].to_vec()
    }
}
