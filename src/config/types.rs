use crate::config::selectors::SelectorSet;
use serde::Deserialize;

/// Main configuration structure for Bubble-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub selectors: SelectorSet,
}

/// Crawl behavior configuration
///
/// Defaults match the constants the scraper was tuned with against the
/// live site; override them per deployment rather than editing code.
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Full crawl attempts per target before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Click attempts on a stale/obstructed element before propagating
    #[serde(rename = "click-retries", default = "default_click_retries")]
    pub click_retries: u32,

    /// Delay between click retries (milliseconds)
    #[serde(rename = "click-retry-delay-ms", default = "default_click_retry_delay")]
    pub click_retry_delay_ms: u64,

    /// How long to wait for a control to appear before clicking it
    #[serde(rename = "clickable-timeout-ms", default = "default_clickable_timeout")]
    pub clickable_timeout_ms: u64,

    /// How long to wait for the review section to become interactive
    #[serde(rename = "section-timeout-ms", default = "default_section_timeout")]
    pub section_timeout_ms: u64,

    /// How long to wait for expanded reviews to report themselves collapsed
    #[serde(rename = "expand-timeout-ms", default = "default_expand_timeout")]
    pub expand_timeout_ms: u64,

    /// Fixed settle pause after expand/next clicks (milliseconds)
    #[serde(rename = "settle-ms", default = "default_settle")]
    pub settle_ms: u64,
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit path to a Chromium-based browser executable
    #[serde(rename = "chrome-path", default)]
    pub chrome_path: Option<String>,

    /// Navigation request timeout (milliseconds)
    #[serde(rename = "navigation-timeout-ms", default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV file; rewritten per target processed
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

/// A page whose reviews should be collected
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub url: String,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_click_retries() -> u32 {
    100
}

fn default_click_retry_delay() -> u64 {
    100
}

fn default_clickable_timeout() -> u64 {
    20_000
}

fn default_section_timeout() -> u64 {
    5_000
}

fn default_expand_timeout() -> u64 {
    10_000
}

fn default_settle() -> u64 {
    500
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30_000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            click_retries: default_click_retries(),
            click_retry_delay_ms: default_click_retry_delay(),
            clickable_timeout_ms: default_clickable_timeout(),
            section_timeout_ms: default_section_timeout(),
            expand_timeout_ms: default_expand_timeout(),
            settle_ms: default_settle(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            navigation_timeout_ms: default_navigation_timeout(),
        }
    }
}
