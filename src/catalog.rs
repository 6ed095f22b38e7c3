//! Section-keyed article lists with on-demand pagination.
//!
//! [`SectionCatalog`] behaves like a read-only map from section identifier
//! to the ordered list of [`Article`]s in that section. A section's listing
//! pages are fetched the first time it is looked up, and the resulting list
//! is kept for the lifetime of the catalog.
//!
//! # Pagination
//!
//! The site does not say how many listing pages a section has. Pages are
//! fetched in ascending order until one of the profile's stop markers
//! appears in a body:
//!
//! 1. a client-side redirect (out-of-range pages bounce back to page 1),
//! 2. a localized "unknown address" error.
//!
//! Running past `max_pages` without seeing either is reported as
//! [`Error::PaginationHeuristicFailed`], since it means the markers no
//! longer describe the site.

use crate::article::Article;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{Fetch, HttpClient};
use crate::listing::{parse_listing, stop_reason};
use crate::profile::SiteProfile;
use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// Lazily populated map from section identifier to its articles.
pub struct SectionCatalog {
    fetcher: Rc<dyn Fetch>,
    profile: Rc<SiteProfile>,
    sections: BTreeMap<String, OnceCell<Vec<Article>>>,
}

impl SectionCatalog {
    /// Create a catalog that fetches through a new [`HttpClient`] configured
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the resolved profile does not validate or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpClient::new(&config.user_agent, config.timeout())?;
        Self::with_fetcher(config.profile(), Rc::new(client))
    }

    /// Create a catalog over `profile` using an existing HTTP capability.
    ///
    /// Every section starts unpopulated; nothing is fetched here.
    ///
    /// # Errors
    ///
    /// Returns the first problem reported by [`SiteProfile::validate`].
    pub fn with_fetcher(profile: SiteProfile, fetcher: Rc<dyn Fetch>) -> Result<Self> {
        profile.validate()?;
        let sections = profile
            .section_ids()
            .map(|id| (id.to_string(), OnceCell::new()))
            .collect();
        Ok(Self {
            fetcher,
            profile: Rc::new(profile),
            sections,
        })
    }

    /// Articles in `section`, in listing order (page 1 first).
    ///
    /// The first call for a section fetches and parses all of its listing
    /// pages; later calls return the same cached slice. The returned
    /// articles load their own text and photos on demand.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSection`] for an identifier outside the profile,
    ///   without any fetch
    /// - [`Error::PaginationHeuristicFailed`] when no stop marker shows up
    ///   within the page ceiling
    /// - [`Error::PageFormatChanged`] when a listing entry cannot be parsed
    /// - network errors, unchanged
    ///
    /// On error the section stays unpopulated and may be retried.
    pub fn get(&self, section: &str) -> Result<&[Article]> {
        let cell = self.sections.get(section).ok_or_else(|| Error::InvalidSection {
            section: section.to_string(),
        })?;
        let articles = cell.get_or_try_init(|| self.load_section(section))?;
        Ok(articles.as_slice())
    }

    /// Every valid section identifier, populated or not.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Whether `section` has already been fetched. Unknown sections are
    /// never populated.
    pub fn is_populated(&self, section: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|cell| cell.get().is_some())
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    #[instrument(level = "info", skip(self), fields(profile = %self.profile.name))]
    fn load_section(&self, section: &str) -> Result<Vec<Article>> {
        let mut articles = Vec::new();

        for page in 1.. {
            if page > self.profile.max_pages {
                return Err(Error::PaginationHeuristicFailed {
                    section: section.to_string(),
                    pages: self.profile.max_pages,
                });
            }

            let url = self.profile.listing_url(section, page)?;
            debug!(page, %url, "Fetching listing page");
            let body = self.fetcher.fetch(&url)?;

            if let Some(marker) = stop_reason(&self.profile, &body) {
                debug!(page, stop = %marker.kind, "Past the last listing page");
                break;
            }

            let entries = parse_listing(&self.profile, &body)?;
            debug!(page, count = entries.len(), "Parsed listing page");
            articles.extend(entries.into_iter().map(|entry| {
                Article::new(
                    Rc::clone(&self.fetcher),
                    Rc::clone(&self.profile),
                    entry.title,
                    entry.url,
                )
            }));
        }

        info!(count = articles.len(), "Populated section");
        Ok(articles)
    }
}

impl fmt::Debug for SectionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let populated: Vec<&str> = self
            .sections
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(id, _)| id.as_str())
            .collect();
        f.debug_struct("SectionCatalog")
            .field("profile", &self.profile.name)
            .field("fetcher", &self.fetcher)
            .field("populated", &populated)
            .finish()
    }
}
