//! Review record types and rating interpretation
//!
//! The site encodes a review's star rating as a suffix on a CSS class token
//! (`ui_bubble_rating bubble_40` means four bubbles). This module turns that
//! token into a typed rating and defines the row shape the writer persists.

use std::fmt;

/// A review's star rating, or the absence of one
///
/// Not every container carries a rating indicator; those reviews are
/// recorded with the `-` placeholder rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Stars(u8),
    Absent,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Stars(n) => write!(f, "{}", n),
            Rating::Absent => write!(f, "-"),
        }
    }
}

impl Rating {
    /// Interprets the class attribute of a rating indicator
    ///
    /// The last `_`-separated token is the bucket: two or more digits are
    /// tens of stars (`40` is four, `35` rounds down to three), a bare
    /// digit is taken as-is. Anything that does not land in 1..=5 becomes
    /// `Absent`, so the emitted field is never malformed.
    pub fn from_class_attr(class_attr: &str) -> Rating {
        let Some(token) = class_attr.rsplit('_').next() else {
            return Rating::Absent;
        };

        let Ok(bucket) = token.trim().parse::<u32>() else {
            return Rating::Absent;
        };

        let stars = if bucket >= 10 { bucket / 10 } else { bucket };
        if (1..=5).contains(&stars) {
            Rating::Stars(stars as u8)
        } else {
            Rating::Absent
        }
    }
}

/// One extracted review: rating and full (expanded) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub rating: Rating,
    pub text: String,
}

/// The complete result of one successful crawl of one target
///
/// Built in memory and handed to the writer whole, so a crawl that fails
/// partway never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub url: String,
    pub title: String,
    pub rows: Vec<ReviewRecord>,
}
