//! CDP-backed driver implementation
//!
//! All element work goes through `Page::evaluate` of small JavaScript
//! snippets built around `document.evaluate` (the browser's own XPath
//! engine). Matched elements get tagged with a `data-bs-ref` attribute and
//! are addressed by that number afterwards; a ref that no longer resolves
//! means the page replaced the element, which surfaces as
//! [`DriverError::Stale`].

use crate::config::BrowserConfig;
use crate::driver::detect::detect_browser;
use crate::driver::{DriverError, DriverResult, Node, Session};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

impl From<chromiumoxide::error::CdpError> for DriverError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        DriverError::Cdp(err.to_string())
    }
}

/// Finds elements by XPath under the document or a ref-tagged context node.
/// Returns `null` when the context node is gone, else an array of refs.
const QUERY_JS: &str = r#"
((xpath, ctxRef) => {
    window.__bsRefs = window.__bsRefs || 0;
    let ctx = document;
    if (ctxRef !== null) {
        ctx = document.querySelector('[data-bs-ref="' + ctxRef + '"]');
        if (!ctx) return null;
    }
    const snap = document.evaluate(
        xpath, ctx, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    const refs = [];
    for (let i = 0; i < snap.snapshotLength; i++) {
        const el = snap.snapshotItem(i);
        if (el.nodeType !== Node.ELEMENT_NODE) continue;
        if (!el.hasAttribute('data-bs-ref')) {
            el.setAttribute('data-bs-ref', String(++window.__bsRefs));
        }
        refs.push(Number(el.getAttribute('data-bs-ref')));
    }
    return refs;
})
"#;

/// Reads a node's rendered text. `null` when the ref is gone.
const TEXT_JS: &str = r#"
((ref) => {
    const el = document.querySelector('[data-bs-ref="' + ref + '"]');
    if (!el) return null;
    return { text: (el.innerText || el.textContent || '').trim() };
})
"#;

/// Reads an attribute. `null` when the ref is gone; a missing attribute is
/// `{ value: null }`.
const ATTR_JS: &str = r#"
((ref, name) => {
    const el = document.querySelector('[data-bs-ref="' + ref + '"]');
    if (!el) return null;
    return { value: el.getAttribute(name) };
})
"#;

/// Scrolls a node into view and clicks it. `false` when the ref is gone.
const CLICK_JS: &str = r#"
((ref) => {
    const el = document.querySelector('[data-bs-ref="' + ref + '"]');
    if (!el || !el.isConnected) return false;
    el.scrollIntoView({ behavior: 'instant', block: 'center' });
    el.click();
    return true;
})
"#;

/// A live browser session owning the browser process and one page
pub struct CdpSession {
    browser: Browser,
    page: Page,
    event_task: JoinHandle<()>,
}

impl CdpSession {
    /// Detects a browser, launches it, and opens a blank page
    pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
        let executable = detect_browser(config.chrome_path.as_deref())?;
        debug!(path = %executable.display(), headless = config.headless, "launching browser");

        let mut builder = CdpBrowserConfig::builder()
            .chrome_executable(&executable)
            .request_timeout(Duration::from_millis(config.navigation_timeout_ms))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        if !config.headless {
            builder = builder.with_head();
        }

        let cdp_config = builder
            .build()
            .map_err(|e| DriverError::LaunchFailed(format!("bad browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| DriverError::LaunchFailed(e.to_string()))?;

        // Drain browser events so the connection keeps making progress
        let event_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                trace!(?event, "browser event");
            }
            debug!("browser event handler exited");
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            event_task,
        })
    }

    /// Shuts the browser down, ignoring errors from an already-dead process
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
        self.event_task.abort();
    }

    async fn eval<T: DeserializeOwned>(&self, js: String) -> DriverResult<T> {
        eval(&self.page, js).await
    }
}

async fn eval<T: DeserializeOwned>(page: &Page, js: String) -> DriverResult<T> {
    // Arrays and objects only come back with return-by-value set
    let params = EvaluateParams::builder()
        .expression(js)
        .return_by_value(true)
        .build()
        .map_err(DriverError::JsEvalFailed)?;

    page.evaluate(params)
        .await
        .map_err(|e| DriverError::JsEvalFailed(e.to_string()))?
        .into_value()
        .map_err(|e| DriverError::JsEvalFailed(format!("failed to decode result: {e:?}")))
}

fn query_call(path: &str, ctx_ref: Option<u32>) -> String {
    let xpath = serde_json::to_string(path).unwrap_or_else(|_| "\"\"".to_string());
    let ctx = ctx_ref.map_or("null".to_string(), |r| r.to_string());
    format!("({QUERY_JS})({xpath}, {ctx})")
}

fn nodes_from_refs(page: &Page, refs: Vec<u32>) -> Vec<CdpNode> {
    refs.into_iter()
        .map(|ref_| CdpNode {
            page: page.clone(),
            ref_,
        })
        .collect()
}

#[async_trait]
impl Session for CdpSession {
    type Node = CdpNode;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::NavigationFailed(e.to_string()))?;
        // Best effort; some pages never fire the load event cleanly
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn title(&self) -> DriverResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn query(&self, path: &str) -> DriverResult<Vec<CdpNode>> {
        let refs: Option<Vec<u32>> = self.eval(query_call(path, None)).await?;
        // Document scope has no context node that could have gone away
        Ok(nodes_from_refs(&self.page, refs.unwrap_or_default()))
    }
}

/// An element handle addressed by its `data-bs-ref` tag
#[derive(Clone)]
pub struct CdpNode {
    page: Page,
    ref_: u32,
}

#[async_trait]
impl Node for CdpNode {
    async fn query(&self, path: &str) -> DriverResult<Vec<Self>> {
        let refs: Option<Vec<u32>> =
            eval(&self.page, query_call(path, Some(self.ref_))).await?;
        match refs {
            Some(refs) => Ok(nodes_from_refs(&self.page, refs)),
            None => Err(DriverError::Stale),
        }
    }

    async fn text(&self) -> DriverResult<String> {
        let result: Option<Value> =
            eval(&self.page, format!("({TEXT_JS})({})", self.ref_)).await?;
        let obj = result.ok_or(DriverError::Stale)?;
        Ok(obj["text"].as_str().unwrap_or_default().to_string())
    }

    async fn attr(&self, name: &str) -> DriverResult<Option<String>> {
        let name_json = serde_json::to_string(name)
            .map_err(|e| DriverError::JsEvalFailed(e.to_string()))?;
        let result: Option<Value> =
            eval(&self.page, format!("({ATTR_JS})({}, {name_json})", self.ref_)).await?;
        let obj = result.ok_or(DriverError::Stale)?;
        Ok(obj["value"].as_str().map(String::from))
    }

    async fn click(&self) -> DriverResult<()> {
        let clicked: bool =
            eval(&self.page, format!("({CLICK_JS})({})", self.ref_)).await?;
        if clicked {
            Ok(())
        } else {
            Err(DriverError::Stale)
        }
    }
}
