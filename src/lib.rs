//! # rodong
//!
//! Lazy access to the articles on the English edition of Rodong Sinmun
//! ("Workers' Newspaper"), the North Korean state newspaper.
//!
//! The site is split into sections. A [`SectionCatalog`] maps each section
//! identifier to the list of [`Article`]s in it, fetching the section's
//! listing pages the first time it is asked for. Each article fetches its
//! own page the first time its text or photos are read.
//!
//! ```no_run
//! use rodong::{Config, SectionCatalog};
//!
//! # fn main() -> rodong::Result<()> {
//! let catalog = SectionCatalog::from_config(&Config::default())?;
//! for article in catalog.get("editorial")? {
//!     println!("{} <{}>", article.title(), article.url());
//! }
//! let first = &catalog.get("editorial")?[0];
//! println!("{}", first.text()?);
//! # Ok(())
//! # }
//! ```
//!
//! Everything site-specific (URLs, stop markers, selectors, link encoding)
//! lives in a [`SiteProfile`], see [`profile`].
//!
//! All I/O is blocking and single-threaded; the catalog and its articles
//! share one HTTP client through `Rc` and are not `Send`.

pub mod article;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod models;
pub mod profile;
mod utils;

#[cfg(test)]
mod testing;

pub use article::Article;
pub use catalog::SectionCatalog;
pub use config::Config;
pub use error::{Error, Result};
pub use http::{DEFAULT_USER_AGENT, Fetch, HttpClient};
pub use models::{ArticleRecord, ArticleSummary};
pub use profile::{LinkEncoding, PhotoLocator, Revision, SiteProfile, StopKind, StopMarker};
