//! Configuration loading and validation
//!
//! Everything the crawler is told about a site comes from a TOML file
//! parsed here: target URLs, retry bounds, wait budgets, and the selector
//! set for the markup version it was written against.

mod parser;
mod selectors;
mod types;
mod validation;

pub use parser::load_config;
pub use selectors::SelectorSet;
pub use types::{BrowserConfig, Config, OutputConfig, ScraperConfig, Target};
pub use validation::validate;
