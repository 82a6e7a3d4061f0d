//! Fixed-count, fixed-delay retry wrapper for network-dependent steps
//!
//! No transient/permanent distinction: every failure is retried up to the
//! bound, then the last error is handed back to the caller, which decides
//! whether that is fatal for its own scope.

use crate::config::Config;
use crate::error::DevkitResult;
use crate::logbook::InstallLog;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry bounds for a network operation
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.retry.attempts.max(1),
            delay: Duration::from_secs(config.retry.delay_secs),
        }
    }

    /// Policy for tests: no delay between attempts
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Run `op` up to `policy.attempts` times, sleeping `policy.delay` between
/// attempts. Each failed attempt is logged; the last error is returned once
/// the bound is exhausted.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    log: &InstallLog,
    what: &str,
    mut op: F,
) -> DevkitResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DevkitResult<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("{} failed (attempt {}/{}): {}", what, attempt, policy.attempts, e);
                log.log(&format!(
                    "{} failed (attempt {}/{}): {}",
                    what, attempt, policy.attempts, e
                ))
                .await;

                if attempt >= policy.attempts {
                    return Err(e);
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DevkitError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    fn test_log(dir: &TempDir) -> InstallLog {
        InstallLog::at(dir.path().join("install.log"))
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let dir = TempDir::new().unwrap();
        let calls = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::immediate(3), &test_log(&dir), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DevkitError>(42) }
        })
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn always_failing_op_attempted_exactly_bound_times() {
        let dir = TempDir::new().unwrap();
        let calls = AtomicU32::new(0);

        let result: DevkitResult<()> =
            with_retry(&RetryPolicy::immediate(3), &test_log(&dir), "fetch", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(DevkitError::download("http://x", "refused")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let dir = TempDir::new().unwrap();
        let calls = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::immediate(3), &test_log(&dir), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DevkitError::download("http://x", "reset"))
                } else {
                    Ok("done")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_attempts_are_logged() {
        let dir = TempDir::new().unwrap();
        let log = test_log(&dir);

        let _: DevkitResult<()> = with_retry(&RetryPolicy::immediate(2), &log, "fetch key", || async {
            Err(DevkitError::download("http://x", "refused"))
        })
        .await;

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.contains("fetch key failed (attempt 1/2)"));
        assert!(content.contains("fetch key failed (attempt 2/2)"));
    }

    #[test]
    fn policy_from_config_clamps_zero_attempts() {
        let mut config = Config::default();
        config.retry.attempts = 0;
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.attempts, 1);
    }

    #[test]
    fn default_policy_matches_contract() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
