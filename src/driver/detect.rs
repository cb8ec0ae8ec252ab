//! Chromium executable detection

use crate::driver::{DriverError, DriverResult};
use std::path::PathBuf;

/// Executable names to try in PATH, most specific first
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "brave-browser",
    "msedge",
];

/// Locates a Chromium-based browser executable
///
/// Checks (in order):
/// 1. Explicit path from config (if provided)
/// 2. `CHROME` environment variable
/// 3. Known executable names in PATH
///
/// # Arguments
///
/// * `custom_path` - Path from `[browser] chrome-path`, if configured
pub fn detect_browser(custom_path: Option<&str>) -> DriverResult<PathBuf> {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
        return Err(DriverError::BrowserNotAvailable(format!(
            "configured chrome-path '{}' does not exist",
            path
        )));
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    Err(DriverError::BrowserNotAvailable(format!(
        "no Chromium-based browser found; install one or set chrome-path \
         (searched PATH for: {})",
        CHROMIUM_EXECUTABLES.join(", ")
    )))
}
