//! Browser driver seam
//!
//! The crawler never talks to chromiumoxide directly; it goes through the
//! [`Session`] and [`Node`] traits so that the browser stays a black box
//! and tests can substitute an in-memory page. The production
//! implementation is [`CdpSession`].

mod cdp;
mod detect;
mod wait;

pub use cdp::{CdpNode, CdpSession};
pub use detect::detect_browser;
pub use wait::{wait_until, POLL_INTERVAL};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the browser driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser not available: {0}")]
    BrowserNotAvailable(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// The element's reference no longer resolves; the page moved on
    /// underneath us. Click logic treats this as retryable.
    #[error("element went stale")]
    Stale,

    #[error("JavaScript evaluation failed: {0}")]
    JsEvalFailed(String),

    #[error("CDP error: {0}")]
    Cdp(String),
}

impl DriverError {
    /// Whether a short delay and another try are worth it
    pub fn is_transient(&self) -> bool {
        matches!(self, DriverError::Stale)
    }
}

/// Result type alias for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A handle to an element in the live page
#[async_trait]
pub trait Node: Clone + Send + Sync {
    /// Finds elements under this node matching a path expression
    /// (`..` walks to the parent, as in any XPath)
    async fn query(&self, path: &str) -> DriverResult<Vec<Self>>;

    /// The node's rendered text
    async fn text(&self) -> DriverResult<String>;

    /// An attribute value, `None` when the attribute is missing
    async fn attr(&self, name: &str) -> DriverResult<Option<String>>;

    /// Clicks the node; `Stale` when it no longer exists
    async fn click(&self) -> DriverResult<()>;
}

/// One browser session with one loaded page
#[async_trait]
pub trait Session: Send + Sync {
    type Node: Node;

    /// Navigates the page to a URL and waits for the load to settle
    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// The loaded page's title
    async fn title(&self) -> DriverResult<String>;

    /// Finds elements at document scope matching a path expression
    async fn query(&self, path: &str) -> DriverResult<Vec<Self::Node>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_stale_is_transient() {
        assert!(DriverError::Stale.is_transient());
        assert!(!DriverError::Cdp("boom".to_string()).is_transient());
        assert!(!DriverError::JsEvalFailed("boom".to_string()).is_transient());
        assert!(!DriverError::NavigationFailed("boom".to_string()).is_transient());
    }
}
