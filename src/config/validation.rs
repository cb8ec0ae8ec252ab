use crate::config::selectors::SelectorSet;
use crate::config::types::{Config, OutputConfig, ScraperConfig, Target};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.click_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "click_retries must be >= 1, got {}",
            config.click_retries
        )));
    }

    for (name, value) in [
        ("clickable_timeout_ms", config.clickable_timeout_ms),
        ("section_timeout_ms", config.section_timeout_ms),
        ("expand_timeout_ms", config.expand_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be > 0",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target list
fn validate_targets(targets: &[Target]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] is required".to_string(),
        ));
    }

    for target in targets {
        let url = Url::parse(&target.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", target.url, e)))?;

        if url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Target URL '{}' must use HTTPS scheme",
                target.url
            )));
        }
    }

    Ok(())
}

/// Validates that no selector was overridden to something unusable
fn validate_selectors(selectors: &SelectorSet) -> Result<(), ConfigError> {
    let singles = [
        ("review-section", &selectors.review_section),
        ("section-marker", &selectors.section_marker),
        ("page-numbers", &selectors.page_numbers),
        ("collapse-marker", &selectors.collapse_marker),
        ("review-containers", &selectors.review_containers),
        ("rating", &selectors.rating),
        ("review-body", &selectors.review_body),
        ("next-control", &selectors.next_control),
        ("error-marker", &selectors.error_marker),
    ];

    for (name, value) in singles {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{}' cannot be empty",
                name
            )));
        }
    }

    for (name, list) in [
        ("expand-controls", &selectors.expand_controls),
        ("text-candidates", &selectors.text_candidates),
    ] {
        if list.is_empty() || list.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "selector list '{}' must contain at least one non-empty entry",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{BrowserConfig, Config};

    fn minimal_config() -> Config {
        Config {
            scraper: ScraperConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig {
                csv_path: "./reviews.csv".to_string(),
            },
            targets: vec![Target {
                url: "https://www.example.com/reviews".to_string(),
            }],
            selectors: SelectorSet::default(),
        }
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = minimal_config();
        config.scraper.max_attempts = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = minimal_config();
        config.scraper.section_timeout_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_target_list_rejected() {
        let mut config = minimal_config();
        config.targets.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_http_target_rejected() {
        let mut config = minimal_config();
        config.targets[0].url = "http://www.example.com/reviews".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unparseable_target_rejected() {
        let mut config = minimal_config();
        config.targets[0].url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_selector_rejected() {
        let mut config = minimal_config();
        config.selectors.rating = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_candidate_list_rejected() {
        let mut config = minimal_config();
        config.selectors.text_candidates.clear();
        assert!(validate(&config).is_err());
    }
}
