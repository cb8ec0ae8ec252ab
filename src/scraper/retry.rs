//! Bounded retry combinator

use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Invokes `op` until it succeeds or `max_attempts` invocations have failed
///
/// Attempt numbers passed to `op` start at 1. Failures short of exhaustion
/// are logged and swallowed; on exhaustion the *last* error is returned.
/// There is no delay between attempts beyond what `op` itself performs.
///
/// # Arguments
///
/// * `max_attempts` - Total invocation budget, at least 1
/// * `op` - The fallible operation, told which attempt it is on
pub async fn with_attempts<T, E, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                warn!("attempt {}/{} failed: {}, retrying", attempt, max_attempts, err);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
