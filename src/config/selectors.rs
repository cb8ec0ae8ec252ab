use serde::Deserialize;

/// The set of path expressions the crawler drives the page with
///
/// These are coupled to one observed version of the site's markup and will
/// break when it changes; that is why they are configuration and not code.
/// Every field defaults to the markup version this crate was written
/// against, so a config file only needs to override what moved.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSet {
    /// Candidate review sections (tab panels) on the page
    #[serde(rename = "review-section", default = "default_review_section")]
    pub review_section: String,

    /// Marker that distinguishes the real reviews section from lookalikes,
    /// and doubles as the "section is interactive" probe
    #[serde(rename = "section-marker", default = "default_section_marker")]
    pub section_marker: String,

    /// Pagination widget, searched under the section's parent
    #[serde(rename = "page-numbers", default = "default_page_numbers")]
    pub page_numbers: String,

    /// Expand ("show more") controls, tried in order; first present wins
    #[serde(rename = "expand-controls", default = "default_expand_controls")]
    pub expand_controls: Vec<String>,

    /// Collapsed counterpart that appears once expansion completed
    #[serde(rename = "collapse-marker", default = "default_collapse_marker")]
    pub collapse_marker: String,

    /// One repeated element per user review
    #[serde(rename = "review-containers", default = "default_review_containers")]
    pub review_containers: String,

    /// Star-rating indicator inside a container; the class token suffix
    /// carries the bucket
    #[serde(default = "default_rating")]
    pub rating: String,

    /// Review body inside a container
    #[serde(rename = "review-body", default = "default_review_body")]
    pub review_body: String,

    /// Text nodes inside the body, tried in order; first present wins
    #[serde(rename = "text-candidates", default = "default_text_candidates")]
    pub text_candidates: Vec<String>,

    /// Control that advances to the next review page
    #[serde(rename = "next-control", default = "default_next_control")]
    pub next_control: String,

    /// Element the site renders instead of content when unreachable
    #[serde(rename = "error-marker", default = "default_error_marker")]
    pub error_marker: String,
}

fn default_review_section() -> String {
    "//div[@id='REVIEWS' and @data-tab='TABS_REVIEWS']".to_string()
}

fn default_section_marker() -> String {
    ".//*[text()='Write a review']".to_string()
}

fn default_page_numbers() -> String {
    ".//div[@class='pageNumbers']".to_string()
}

fn default_expand_controls() -> Vec<String> {
    vec![
        ".//span[@class='location-review-review-list-parts-ExpandableReview__cta--2mR2g']"
            .to_string(),
        ".//span[@class='taLnk ulBlueLinks']".to_string(),
    ]
}

fn default_collapse_marker() -> String {
    ".//span[text()='Show less' or text()='Read less']".to_string()
}

fn default_review_containers() -> String {
    "//div[contains(@class, 'review-container') or contains(@class, 'reviewContainer')]"
        .to_string()
}

fn default_rating() -> String {
    ".//span[contains(@class, 'ui_bubble_rating bubble_')]".to_string()
}

fn default_review_body() -> String {
    ".//*[@class='location-review-review-list-parts-ExpandableReview__reviewText--gOmRC' \
     or @class='prw_rup prw_reviews_text_summary_hsx']"
        .to_string()
}

fn default_text_candidates() -> Vec<String> {
    vec![
        ".//p[@class='partial_entry']".to_string(),
        ".//span".to_string(),
    ]
}

fn default_next_control() -> String {
    ".//a[contains(@class, 'next') and contains(@class, 'nav') and contains(@class, 'ui_button')]"
        .to_string()
}

fn default_error_marker() -> String {
    "//*[contains(concat(' ', normalize-space(@class), ' '), ' error-code ')]".to_string()
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            review_section: default_review_section(),
            section_marker: default_section_marker(),
            page_numbers: default_page_numbers(),
            expand_controls: default_expand_controls(),
            collapse_marker: default_collapse_marker(),
            review_containers: default_review_containers(),
            rating: default_rating(),
            review_body: default_review_body(),
            text_candidates: default_text_candidates(),
            next_control: default_next_control(),
            error_marker: default_error_marker(),
        }
    }
}
