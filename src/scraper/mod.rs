//! Crawl orchestration
//!
//! This module contains the scripted crawl itself:
//! - the bounded per-URL retry wrapper
//! - the per-page crawl (section location, pagination, expansion, extraction)
//! - the click-with-retry interaction primitive
//!
//! Everything here is generic over the [`driver::Session`] trait; the only
//! place the real browser appears is the [`scrape`] entry point.

mod actions;
mod crawl;
mod retry;

pub use actions::{click_with_retry, expand_reviews};
pub use crawl::crawl_once;
pub use retry::with_attempts;

use crate::config::Config;
use crate::driver::{CdpSession, Session};
use crate::output::write_report;
use crate::{Result, ScrapeError};
use std::path::Path;
use tracing::info;

/// Runs the complete scrape: launch a browser, process every target
///
/// This is the main entry point. The browser is shut down whether the
/// crawl succeeded or not.
pub async fn scrape(config: Config) -> Result<()> {
    let session = CdpSession::launch(&config.browser)
        .await
        .map_err(ScrapeError::Driver)?;

    let result = scrape_targets(&session, &config).await;
    session.close().await;
    result
}

/// Processes every configured target through one session
///
/// Each target is crawled with up to `max-attempts` full attempts; a
/// successful crawl's rows are committed to the output file before the next
/// target starts. A target that exhausts its attempts aborts the run with
/// the last error.
pub async fn scrape_targets<S: Session>(session: &S, config: &Config) -> Result<()> {
    for target in &config.targets {
        info!(url = %target.url, "processing target");

        let report = with_attempts(config.scraper.max_attempts, |attempt| {
            crawl_once(
                session,
                &config.selectors,
                &config.scraper,
                &target.url,
                attempt,
            )
        })
        .await?;

        write_report(Path::new(&config.output.csv_path), &report)?;
        info!(
            rows = report.rows.len(),
            path = %config.output.csv_path,
            "report written"
        );
    }

    Ok(())
}
