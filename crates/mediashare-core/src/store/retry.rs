//! Bounded retry for transient backend failures.

use std::thread;
use std::time::Duration;

use crate::error::Result;

/// Run `op` until it succeeds, fails with a non-transient error, or
/// `retries` extra attempts have been spent.
///
/// `op` receives the zero-based attempt number. Attempt `n` (n >= 1) is
/// preceded by a sleep of `n * backoff`.
pub(crate) fn with_retries<T, F>(
    operation: &'static str,
    retries: u32,
    backoff: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                tracing::debug!(operation, attempt, error = %e, "retrying after backend error");
                if !backoff.is_zero() {
                    thread::sleep(backoff * attempt);
                }
            }
            Err(e) => return Err(e),
        }
    }
}
