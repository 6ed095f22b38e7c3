//! Serializable snapshots of scraped data.
//!
//! [`crate::Article`] holds a fetcher handle and a lazy cache, so it is not
//! itself serializable. These plain records are what the CLI prints as JSON.

use serde::{Deserialize, Serialize};

/// One listing entry, as printed by `rodong list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSummary {
    /// Position within the section, starting at 0.
    pub index: usize,
    pub section: String,
    pub title: String,
    pub url: String,
}

/// A fully loaded article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    /// Justified content paragraphs joined with `\n`.
    pub text: String,
    /// Absolute photo URLs, possibly empty.
    pub photos: Vec<String>,
}
