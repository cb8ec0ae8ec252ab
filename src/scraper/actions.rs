//! Element interaction primitives
//!
//! Clicking on this site is unreliable: controls re-render mid-interaction
//! and go stale. The primitives here wait for presence, click, and retry
//! transient failures locally before letting anything propagate to the
//! whole-URL retry wrapper.

use crate::config::{ScraperConfig, SelectorSet};
use crate::driver::{wait_until, DriverError, DriverResult, Node};
use crate::{Result, ScrapeError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::trace;

enum ClickAttempt {
    Clicked,
    TimedOut,
}

/// One wait-then-click pass; `Stale` covers the element vanishing at any
/// point between the wait and the click landing
async fn attempt_click<N: Node>(ctx: &N, path: &str, timeout: Duration) -> DriverResult<ClickAttempt> {
    let present = wait_until(timeout, || async {
        Ok(!ctx.query(path).await?.is_empty())
    })
    .await?;

    if !present {
        return Ok(ClickAttempt::TimedOut);
    }

    let Some(node) = ctx.query(path).await?.into_iter().next() else {
        return Err(DriverError::Stale);
    };

    node.click().await?;
    Ok(ClickAttempt::Clicked)
}

/// Waits for the element matched by `path` under `ctx` and clicks it
///
/// Transient failures (the element going stale) are retried after a short
/// delay, up to `click-retries` attempts; exhaustion propagates as
/// [`ScrapeError::Interaction`]. The element never appearing within
/// `clickable-timeout-ms` is a [`ScrapeError::Timeout`] and is not retried
/// here.
pub async fn click_with_retry<N: Node>(
    ctx: &N,
    path: &str,
    timing: &ScraperConfig,
) -> Result<()> {
    let timeout = Duration::from_millis(timing.clickable_timeout_ms);
    let delay = Duration::from_millis(timing.click_retry_delay_ms);

    let mut attempt = 0;
    loop {
        attempt += 1;
        match attempt_click(ctx, path, timeout).await {
            Ok(ClickAttempt::Clicked) => return Ok(()),
            Ok(ClickAttempt::TimedOut) => {
                return Err(ScrapeError::Timeout {
                    path: path.to_string(),
                    waited_ms: timing.clickable_timeout_ms,
                })
            }
            Err(e) if e.is_transient() && attempt < timing.click_retries => {
                trace!(path, attempt, "transient click failure, retrying");
                sleep(delay).await;
            }
            Err(e) if e.is_transient() => {
                return Err(ScrapeError::Interaction {
                    path: path.to_string(),
                    attempts: attempt,
                    source: e,
                })
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Expands truncated reviews on the current page, if any are truncated
///
/// The expand-control candidates are checked in order; the first present
/// wins. After clicking, the collapsed counterpart ("show less") appearing
/// confirms the expansion actually completed. No control present at all is
/// not an error: short reviews ship untruncated.
pub async fn expand_reviews<N: Node>(
    section: &N,
    selectors: &SelectorSet,
    timing: &ScraperConfig,
) -> Result<()> {
    let Some(control) = first_present(section, &selectors.expand_controls).await? else {
        trace!("no expand control on this page");
        return Ok(());
    };

    click_with_retry(section, control, timing).await?;
    sleep(Duration::from_millis(timing.settle_ms)).await;

    let confirmed = wait_until(Duration::from_millis(timing.expand_timeout_ms), || async {
        Ok(!section.query(&selectors.collapse_marker).await?.is_empty())
    })
    .await?;

    if !confirmed {
        return Err(ScrapeError::Timeout {
            path: selectors.collapse_marker.clone(),
            waited_ms: timing.expand_timeout_ms,
        });
    }

    Ok(())
}

/// Returns the first candidate path with at least one match under `ctx`
async fn first_present<'a, N: Node>(
    ctx: &N,
    candidates: &'a [String],
) -> DriverResult<Option<&'a str>> {
    for path in candidates {
        if !ctx.query(path).await?.is_empty() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
