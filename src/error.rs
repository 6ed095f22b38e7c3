//! Error types for the Rodong Sinmun scraper.
//!
//! The parsing rules are tied to one externally controlled site layout, so
//! any structural surprise is reported as an error instead of being papered
//! over with partial data.

use thiserror::Error;

/// Errors produced while enumerating sections or loading articles.
#[derive(Error, Debug)]
pub enum Error {
    /// The section identifier is not one of the profile's sections.
    #[error("unknown section: {section}")]
    InvalidSection { section: String },

    /// The page ceiling was reached without any stop marker showing up.
    ///
    /// This means the site's "past the last page" behaviour no longer matches
    /// the configured markers.
    #[error("pagination heuristic failed for section {section}: no stop marker within {pages} pages")]
    PaginationHeuristicFailed { section: String, pages: u32 },

    /// A required structural pattern was not found where expected.
    #[error("page format changed: {0}")]
    PageFormatChanged(String),

    /// HTTP failure, passed through from the client untouched.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// A CSS selector in the site profile does not parse.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The profile domain or a resolved link is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
