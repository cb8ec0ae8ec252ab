//! Single-URL crawl
//!
//! `crawl_once` is pure with respect to output: it returns the extracted
//! rows and writes nothing, so the retry wrapper can throw a failed attempt
//! away without leaving a half-written file behind.

use crate::config::{ScraperConfig, SelectorSet};
use crate::driver::{wait_until, Node, Session};
use crate::review::{CrawlReport, Rating, ReviewRecord};
use crate::scraper::actions::{click_with_retry, expand_reviews};
use crate::{Result, ScrapeError};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info};

/// Crawls one target URL and returns everything extracted from it
///
/// Control flow: navigate, connectivity check, locate the
/// review section, read the page count, then per page expand truncated
/// reviews, extract (rating, text) per container, and advance. Any failure
/// abandons the attempt; the caller decides whether to retry.
pub async fn crawl_once<S: Session>(
    session: &S,
    selectors: &SelectorSet,
    timing: &ScraperConfig,
    url: &str,
    attempt: u32,
) -> Result<CrawlReport> {
    let start = Instant::now();
    debug!(url, attempt, "starting crawl");

    session.goto(url).await?;
    check_connectivity(session, selectors, url).await?;

    let title = session.title().await?;
    info!("Checking: {}", title);

    let section = locate_review_section(session, selectors).await?;
    let page_count = read_page_count(&section, selectors).await?;
    debug!("found {} pages", page_count);

    let mut rows = Vec::new();
    for page in 1..=page_count {
        debug!("checking page {}", page);

        let ready = wait_until(Duration::from_millis(timing.section_timeout_ms), || async {
            Ok(!section.query(&selectors.section_marker).await?.is_empty())
        })
        .await?;
        if !ready {
            return Err(ScrapeError::Timeout {
                path: selectors.section_marker.clone(),
                waited_ms: timing.section_timeout_ms,
            });
        }

        expand_reviews(&section, selectors, timing).await?;

        let containers = session.query(&selectors.review_containers).await?;
        debug!("found {} containers", containers.len());
        for container in &containers {
            rows.push(extract_review(container, selectors).await?);
        }

        if page < page_count {
            click_with_retry(&section, &selectors.next_control, timing).await?;
            sleep(Duration::from_millis(timing.settle_ms)).await;
        }
    }

    info!(
        "Total time: {:.2} s",
        start.elapsed().as_secs_f64()
    );

    Ok(CrawlReport {
        url: url.to_string(),
        title,
        rows,
    })
}

/// Fails with a connectivity error if the page rendered the site's
/// error-indicator element instead of content
///
/// Runs before any extraction, so a dead page never yields partial rows.
pub async fn check_connectivity<S: Session>(
    session: &S,
    selectors: &SelectorSet,
    url: &str,
) -> Result<()> {
    if let Some(marker) = session
        .query(&selectors.error_marker)
        .await?
        .into_iter()
        .next()
    {
        let message = marker.text().await?;
        return Err(ScrapeError::Connectivity {
            url: url.to_string(),
            message,
        });
    }

    debug!("connection established");
    Ok(())
}

/// Finds the reviews section among the candidate tab panels
///
/// The real section is the candidate whose subtree contains the marker
/// element; its parent node anchors all further per-page queries.
async fn locate_review_section<S: Session>(
    session: &S,
    selectors: &SelectorSet,
) -> Result<S::Node> {
    for tab in session.query(&selectors.review_section).await? {
        if tab.query(&selectors.section_marker).await?.is_empty() {
            continue;
        }
        if let Some(parent) = tab.query("..").await?.into_iter().next() {
            return Ok(parent);
        }
    }

    Err(ScrapeError::ElementNotFound {
        path: selectors.review_section.clone(),
    })
}

/// Reads the page count from the pagination widget's last entry
///
/// A missing widget means a single page, not an error. Widget text that is
/// not a number is a typed failure for the attempt.
async fn read_page_count<N: Node>(section: &N, selectors: &SelectorSet) -> Result<u32> {
    let Some(widget) = section
        .query(&selectors.page_numbers)
        .await?
        .into_iter()
        .next()
    else {
        return Ok(1);
    };

    let entries = widget.query(".//*").await?;
    let Some(last) = entries.last() else {
        return Ok(1);
    };

    let text = last.text().await?;
    text.trim()
        .parse::<u32>()
        .map_err(|_| ScrapeError::PageCount { value: text })
}

/// Extracts one (rating, text) pair from a review container
///
/// A missing rating indicator records `Absent`; a missing review body or
/// text node is a structural failure. Text candidates are tried in order,
/// first present wins.
async fn extract_review<N: Node>(container: &N, selectors: &SelectorSet) -> Result<ReviewRecord> {
    let rating = match container.query(&selectors.rating).await?.into_iter().next() {
        Some(indicator) => indicator
            .attr("class")
            .await?
            .map(|class| Rating::from_class_attr(&class))
            .unwrap_or(Rating::Absent),
        None => Rating::Absent,
    };

    let Some(body) = container
        .query(&selectors.review_body)
        .await?
        .into_iter()
        .next()
    else {
        return Err(ScrapeError::ElementNotFound {
            path: selectors.review_body.clone(),
        });
    };

    for candidate in &selectors.text_candidates {
        if let Some(node) = body.query(candidate).await?.into_iter().next() {
            let text = node.text().await?;
            return Ok(ReviewRecord { rating, text });
        }
    }

    Err(ScrapeError::ElementNotFound {
        path: selectors.text_candidates.join(" | "),
    })
}
