//! Retry loop for transient request failures.

use log::warn;
use std::future::Future;

use snapfolio_core::errors::Result;

use crate::config::RetryPolicy;

/// Runs `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// Only errors classified as transient (transport failures, HTTP 429 and 5xx)
/// are retried. The last error is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && err.is_transient() => {
                let wait = policy.backoff_for(attempt);
                warn!(
                    "[ReportingApi] {} failed (attempt {}/{}): {}. Retrying in {:?}",
                    label, attempt, max_attempts, err, wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
