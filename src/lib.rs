//! Bubble-Scrape: a review scraper for paginated listing pages
//!
//! This crate drives a Chromium browser through CDP to walk the review
//! section of travel-attraction pages, expanding truncated reviews and
//! collecting (star rating, review text) pairs into a CSV file. Selectors
//! for the site's markup live in configuration, not code.

pub mod config;
pub mod driver;
pub mod output;
pub mod review;
pub mod scraper;

use thiserror::Error;

/// Main error type for Bubble-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not connect to {url}: {message}")]
    Connectivity { url: String, message: String },

    #[error("No element matched '{path}'")]
    ElementNotFound { path: String },

    #[error("Timed out after {waited_ms}ms waiting for '{path}'")]
    Timeout { path: String, waited_ms: u64 },

    #[error("Gave up clicking '{path}' after {attempts} attempts: {source}")]
    Interaction {
        path: String,
        attempts: u32,
        source: driver::DriverError,
    },

    #[error("Pagination widget reported a non-numeric page count: '{value}'")]
    PageCount { value: String },

    #[error("Driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Bubble-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, SelectorSet};
pub use review::{CrawlReport, Rating, ReviewRecord};
