//! Integration tests for the scraper
//!
//! These tests run the full crawl cycle against an in-memory fake driver
//! session. The fake resolves the injected selector set against a small
//! page model (pagination, expandable reviews, an error marker), so every
//! crawl behavior is exercised end-to-end without a browser.

use async_trait::async_trait;
use bubble_scrape::config::{
    BrowserConfig, Config, OutputConfig, ScraperConfig, SelectorSet, Target,
};
use bubble_scrape::driver::{DriverError, DriverResult, Node, Session};
use bubble_scrape::review::Rating;
use bubble_scrape::scraper::{crawl_once, scrape_targets};
use bubble_scrape::ScrapeError;
use std::sync::{Arc, Mutex};

/// Selector set the fake page model understands
fn test_selectors() -> SelectorSet {
    SelectorSet {
        review_section: "section".to_string(),
        section_marker: "marker".to_string(),
        page_numbers: "pages".to_string(),
        expand_controls: vec!["more-new".to_string(), "more-old".to_string()],
        collapse_marker: "less".to_string(),
        review_containers: "containers".to_string(),
        rating: "rating".to_string(),
        review_body: "body".to_string(),
        text_candidates: vec!["primary".to_string(), "fallback".to_string()],
        next_control: "next".to_string(),
        error_marker: "error".to_string(),
    }
}

/// Timing tuned so failing waits do not stall the test run
fn test_timing() -> ScraperConfig {
    ScraperConfig {
        max_attempts: 3,
        click_retries: 5,
        click_retry_delay_ms: 1,
        clickable_timeout_ms: 300,
        section_timeout_ms: 300,
        expand_timeout_ms: 300,
        settle_ms: 0,
    }
}

#[derive(Debug, Clone, Default)]
struct FakeReview {
    rating_class: Option<String>,
    primary_text: Option<String>,
    fallback_text: Option<String>,
}

fn rated(class: &str, text: &str) -> FakeReview {
    FakeReview {
        rating_class: Some(class.to_string()),
        primary_text: Some(text.to_string()),
        ..Default::default()
    }
}

fn unrated_fallback(text: &str) -> FakeReview {
    FakeReview {
        fallback_text: Some(text.to_string()),
        ..Default::default()
    }
}

#[derive(Debug)]
struct PageState {
    title: String,
    error_text: Option<String>,
    has_section: bool,
    marker_in_section: bool,
    /// `None` means no pagination widget on the page
    widget_pages: Option<u32>,
    /// Overrides the last widget entry's text, for the non-numeric case
    widget_label_override: Option<String>,
    /// Reviews per page, 1-indexed by `current_page`
    pages: Vec<Vec<FakeReview>>,
    current_page: u32,
    /// Whether the current page's truncated reviews were expanded
    expanded: bool,
    truncated: bool,
    /// Remaining goto calls that should fail (retry-wrapper tests)
    goto_failures_remaining: u32,
    /// Remaining next-control clicks that should go stale
    stale_next_remaining: u32,
    goto_count: u32,
    next_clicks: u32,
    /// Review text nodes actually read (connectivity ordering property)
    text_reads: u32,
}

impl PageState {
    fn new(pages: Vec<Vec<FakeReview>>, widget: bool) -> Self {
        let widget_pages = if widget { Some(pages.len() as u32) } else { None };
        Self {
            title: "Boat Tour - Reviews".to_string(),
            error_text: None,
            has_section: true,
            marker_in_section: true,
            widget_pages,
            widget_label_override: None,
            pages,
            current_page: 1,
            expanded: false,
            truncated: true,
            goto_failures_remaining: 0,
            stale_next_remaining: 0,
            goto_count: 0,
            next_clicks: 0,
            text_reads: 0,
        }
    }

    fn current_reviews(&self) -> Vec<FakeReview> {
        self.pages
            .get(self.current_page as usize - 1)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Clone)]
enum Kind {
    Section,
    SectionParent,
    Marker,
    PagesWidget,
    PageEntry(u32),
    Container(usize),
    RatingSpan(String),
    Body(usize),
    TextNode(String),
    ExpandControl,
    CollapseMarker,
    NextControl,
    ErrorMarker,
}

#[derive(Clone)]
struct FakeNode {
    state: Arc<Mutex<PageState>>,
    kind: Kind,
}

struct FakeSession {
    state: Arc<Mutex<PageState>>,
}

impl FakeSession {
    fn new(state: PageState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn node(&self, kind: Kind) -> FakeNode {
        FakeNode {
            state: Arc::clone(&self.state),
            kind,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }
}

impl FakeNode {
    fn make(&self, kind: Kind) -> FakeNode {
        FakeNode {
            state: Arc::clone(&self.state),
            kind,
        }
    }
}

#[async_trait]
impl Session for FakeSession {
    type Node = FakeNode;

    async fn goto(&self, _url: &str) -> DriverResult<()> {
        let mut state = self.state();
        state.goto_count += 1;
        if state.goto_failures_remaining > 0 {
            state.goto_failures_remaining -= 1;
            return Err(DriverError::NavigationFailed("connection reset".to_string()));
        }
        // Fresh navigation resets the in-page state
        state.current_page = 1;
        state.expanded = false;
        Ok(())
    }

    async fn title(&self) -> DriverResult<String> {
        Ok(self.state().title.clone())
    }

    async fn query(&self, path: &str) -> DriverResult<Vec<FakeNode>> {
        let state = self.state();
        let nodes = match path {
            "error" if state.error_text.is_some() => vec![self.node(Kind::ErrorMarker)],
            "section" if state.has_section => vec![self.node(Kind::Section)],
            "containers" => {
                let count = state.current_reviews().len();
                (0..count).map(|i| self.node(Kind::Container(i))).collect()
            }
            _ => vec![],
        };
        Ok(nodes)
    }
}

#[async_trait]
impl Node for FakeNode {
    async fn query(&self, path: &str) -> DriverResult<Vec<FakeNode>> {
        let state = self.state.lock().unwrap();
        let nodes = match (&self.kind, path) {
            (Kind::Section, "marker") if state.marker_in_section => {
                vec![self.make(Kind::Marker)]
            }
            (Kind::Section, "..") => vec![self.make(Kind::SectionParent)],
            (Kind::SectionParent, "marker") if state.marker_in_section => {
                vec![self.make(Kind::Marker)]
            }
            (Kind::SectionParent, "pages") => match state.widget_pages {
                Some(_) => vec![self.make(Kind::PagesWidget)],
                None => vec![],
            },
            // The old-style control is the one present; the new-style
            // candidate before it must be skipped without error
            (Kind::SectionParent, "more-old")
                if state.truncated && !state.expanded =>
            {
                vec![self.make(Kind::ExpandControl)]
            }
            (Kind::SectionParent, "less") if state.expanded => {
                vec![self.make(Kind::CollapseMarker)]
            }
            (Kind::SectionParent, "next") => vec![self.make(Kind::NextControl)],
            (Kind::PagesWidget, ".//*") => {
                let n = state.widget_pages.unwrap_or(1);
                (1..=n).map(|i| self.make(Kind::PageEntry(i))).collect()
            }
            (Kind::Container(i), "rating") => {
                match state.current_reviews().get(*i).and_then(|r| r.rating_class.clone()) {
                    Some(class) => vec![self.make(Kind::RatingSpan(class))],
                    None => vec![],
                }
            }
            (Kind::Container(i), "body") => vec![self.make(Kind::Body(*i))],
            (Kind::Body(i), "primary") => {
                match state.current_reviews().get(*i).and_then(|r| r.primary_text.clone()) {
                    Some(text) => vec![self.make(Kind::TextNode(text))],
                    None => vec![],
                }
            }
            (Kind::Body(i), "fallback") => {
                match state.current_reviews().get(*i).and_then(|r| r.fallback_text.clone()) {
                    Some(text) => vec![self.make(Kind::TextNode(text))],
                    None => vec![],
                }
            }
            _ => vec![],
        };
        Ok(nodes)
    }

    async fn text(&self) -> DriverResult<String> {
        let mut state = self.state.lock().unwrap();
        let text = match &self.kind {
            Kind::TextNode(text) => {
                state.text_reads += 1;
                text.clone()
            }
            Kind::ErrorMarker => state.error_text.clone().unwrap_or_default(),
            Kind::PageEntry(n) => {
                let is_last = Some(*n) == state.widget_pages;
                match (&state.widget_label_override, is_last) {
                    (Some(label), true) => label.clone(),
                    _ => n.to_string(),
                }
            }
            _ => String::new(),
        };
        Ok(text)
    }

    async fn attr(&self, name: &str) -> DriverResult<Option<String>> {
        match (&self.kind, name) {
            (Kind::RatingSpan(class), "class") => Ok(Some(class.clone())),
            _ => Ok(None),
        }
    }

    async fn click(&self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        match &self.kind {
            Kind::ExpandControl => {
                state.expanded = true;
                Ok(())
            }
            Kind::NextControl => {
                if state.stale_next_remaining > 0 {
                    state.stale_next_remaining -= 1;
                    return Err(DriverError::Stale);
                }
                state.next_clicks += 1;
                state.current_page += 1;
                state.expanded = false;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// The spec's worked example: each page has one bubble_40 review with
/// primary text and one unrated review with only fallback text
fn example_pages(count: usize) -> Vec<Vec<FakeReview>> {
    (0..count)
        .map(|_| {
            vec![
                rated("ui_bubble_rating bubble_40", "Great trip"),
                unrated_fallback("OK"),
            ]
        })
        .collect()
}

#[tokio::test]
async fn test_visits_exactly_widget_page_count() {
    let session = FakeSession::new(PageState::new(example_pages(3), true));
    let report = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1)
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 6);
    // Two advances for three pages; no click past the last page
    assert_eq!(session.state().next_clicks, 2);
}

#[tokio::test]
async fn test_no_widget_means_single_page() {
    let session = FakeSession::new(PageState::new(example_pages(3), false));
    let report = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1)
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(session.state().next_clicks, 0);
}

#[tokio::test]
async fn test_rating_suffix_and_placeholder() {
    let session = FakeSession::new(PageState::new(example_pages(1), false));
    let report = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1)
        .await
        .unwrap();

    assert_eq!(report.rows[0].rating, Rating::Stars(4));
    assert_eq!(report.rows[0].text, "Great trip");
    assert_eq!(report.rows[1].rating, Rating::Absent);
    assert_eq!(report.rows[1].text, "OK");
}

#[tokio::test]
async fn test_primary_text_preferred_over_fallback() {
    let mut review = rated("ui_bubble_rating bubble_50", "full text");
    review.fallback_text = Some("teaser".to_string());
    let session = FakeSession::new(PageState::new(vec![vec![review]], false));

    let report = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1)
        .await
        .unwrap();
    assert_eq!(report.rows[0].text, "full text");
}

#[tokio::test]
async fn test_connectivity_error_precedes_extraction() {
    let mut state = PageState::new(example_pages(2), true);
    state.error_text = Some("ERR_NAME_NOT_RESOLVED".to_string());
    let session = FakeSession::new(state);

    let result = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1).await;

    match result {
        Err(ScrapeError::Connectivity { message, .. }) => {
            assert_eq!(message, "ERR_NAME_NOT_RESOLVED");
        }
        other => panic!("expected connectivity error, got {:?}", other.map(|r| r.rows)),
    }
    assert_eq!(session.state().text_reads, 0, "no review text may be read");
}

#[tokio::test]
async fn test_missing_section_is_element_not_found() {
    let mut state = PageState::new(example_pages(1), false);
    state.has_section = false;
    let session = FakeSession::new(state);

    let result = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1).await;
    assert!(matches!(result, Err(ScrapeError::ElementNotFound { .. })));
}

#[tokio::test]
async fn test_lookalike_section_without_marker_rejected() {
    let mut state = PageState::new(example_pages(1), false);
    state.marker_in_section = false;
    let session = FakeSession::new(state);

    let result = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1).await;
    assert!(matches!(result, Err(ScrapeError::ElementNotFound { .. })));
}

#[tokio::test]
async fn test_non_numeric_page_count_is_typed_failure() {
    let mut state = PageState::new(example_pages(2), true);
    state.widget_label_override = Some("Next ›".to_string());
    let session = FakeSession::new(state);

    let result = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1).await;
    match result {
        Err(ScrapeError::PageCount { value }) => assert_eq!(value, "Next ›"),
        other => panic!("expected page-count error, got {:?}", other.map(|r| r.rows)),
    }
}

#[tokio::test]
async fn test_stale_next_control_retried_locally() {
    let mut state = PageState::new(example_pages(2), true);
    state.stale_next_remaining = 2;
    let session = FakeSession::new(state);

    let report = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1)
        .await
        .unwrap();
    assert_eq!(report.rows.len(), 4);
}

#[tokio::test]
async fn test_stale_next_control_exhaustion_propagates() {
    let mut state = PageState::new(example_pages(2), true);
    state.stale_next_remaining = u32::MAX;
    let session = FakeSession::new(state);

    let result = crawl_once(&session, &test_selectors(), &test_timing(), "https://t", 1).await;
    match result {
        Err(ScrapeError::Interaction { attempts, .. }) => {
            assert_eq!(attempts, test_timing().click_retries);
        }
        other => panic!("expected interaction error, got {:?}", other.map(|r| r.rows)),
    }
}

fn test_config(csv_path: &str) -> Config {
    Config {
        scraper: test_timing(),
        browser: BrowserConfig::default(),
        output: OutputConfig {
            csv_path: csv_path.to_string(),
        },
        targets: vec![Target {
            url: "https://www.example.com/reviews".to_string(),
        }],
        selectors: test_selectors(),
    }
}

#[tokio::test]
async fn test_end_to_end_report_file() {
    // Spec example: 3 pages, each with a bubble_40 "Great trip" review and
    // an unrated fallback-text "OK" review; expect a title row plus six
    // data rows in page order.
    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("reviews.csv");

    let session = FakeSession::new(PageState::new(example_pages(3), true));
    scrape_targets(&session, &test_config(csv_path.to_str().unwrap()))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "Boat Tour - Reviews");
    for page in 0..3 {
        assert_eq!(lines[1 + page * 2], "4,Great trip");
        assert_eq!(lines[2 + page * 2], "-,OK");
    }
}

#[tokio::test]
async fn test_retry_wrapper_recovers_failed_attempts() {
    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("reviews.csv");

    let mut state = PageState::new(example_pages(1), false);
    state.goto_failures_remaining = 2;
    let session = FakeSession::new(state);

    scrape_targets(&session, &test_config(csv_path.to_str().unwrap()))
        .await
        .unwrap();

    // Two failed attempts, one successful: exactly three navigations
    assert_eq!(session.state().goto_count, 3);
    assert!(csv_path.exists());
}

#[tokio::test]
async fn test_retry_exhaustion_aborts_without_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("reviews.csv");

    let mut state = PageState::new(example_pages(1), false);
    state.goto_failures_remaining = u32::MAX;
    let session = FakeSession::new(state);

    let result = scrape_targets(&session, &test_config(csv_path.to_str().unwrap())).await;

    assert!(matches!(result, Err(ScrapeError::Driver(_))));
    assert_eq!(session.state().goto_count, test_timing().max_attempts);
    assert!(!csv_path.exists(), "a failed target must not write a file");
}
