//! Polling wait primitive
//!
//! All "suspension" in this crate is synchronous polling with a deadline:
//! check a condition, sleep a short interval, repeat. There is no event
//! subscription and no cancellation beyond the deadline itself.

use crate::driver::DriverResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Interval between condition checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls `probe` until it reports true or `timeout` elapses
///
/// The probe runs once immediately, so an already-satisfied condition
/// returns without sleeping. Probe errors propagate as-is.
///
/// # Returns
///
/// * `Ok(true)` - The condition held within the timeout
/// * `Ok(false)` - The deadline passed with the condition still false
/// * `Err(DriverError)` - The probe itself failed
pub async fn wait_until<F, Fut>(timeout: Duration, mut probe: F) -> DriverResult<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DriverResult<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if probe().await? {
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }

        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_immediate_success_does_not_sleep() {
        let started = std::time::Instant::now();
        let ready = wait_until(Duration::from_secs(5), || async { Ok(true) })
            .await
            .unwrap();
        assert!(ready);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_times_out() {
        let ready = wait_until(Duration::from_millis(150), || async { Ok(false) })
            .await
            .unwrap();
        assert!(!ready);
    }

    #[tokio::test]
    async fn test_becomes_ready_after_polls() {
        let calls = AtomicU32::new(0);
        let ready = wait_until(Duration::from_secs(5), || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2)
        })
        .await
        .unwrap();
        assert!(ready);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_probe_error_propagates() {
        let result = wait_until(Duration::from_millis(150), || async {
            Err(DriverError::Cdp("gone".to_string()))
        })
        .await;
        assert!(result.is_err());
    }
}
