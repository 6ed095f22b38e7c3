//! Site profiles: everything about the Rodong Sinmun layout that changes
//! between site revisions.
//!
//! The scraper's control flow never hardcodes a marker string, URL form or
//! selector. A [`SiteProfile`] carries them instead, so adapting to a new
//! layout means writing a new profile (in code or in the YAML config), not
//! touching the pagination loop.
//!
//! # Revisions
//!
//! | Revision | Links | Photos |
//! |----------|-------|--------|
//! | [`Revision::Classic`] | plain relative `href` | images inside the content table |
//! | [`Revision::Redesign`] | `name('escaped/path')` script calls | [`PhotoLocator::Incomplete`] |

use crate::error::{Error, Result};
use crate::utils::parse_selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Placeholder replaced by the page number in [`SiteProfile::page_query`].
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Page ceiling used by the built-in profiles.
pub const DEFAULT_MAX_PAGES: u32 = 50;

const SECTIONS: &[(&str, &str)] = &[
    ("supreme_leader", "/en/index.php?strPageID=SF01_01_02"),
    ("in_dprk", "/en/index.php?strPageID=SF01_01_03&iThemeID=2"),
    ("inter_korean", "/en/index.php?strPageID=SF01_01_03&iThemeID=3"),
    ("international", "/en/index.php?strPageID=SF01_01_03&iThemeID=4"),
    ("editorial", "/en/index.php?strPageID=SF01_01_04&iClassID=4"),
    ("article", "/en/index.php?strPageID=SF01_01_04&iClassID=5"),
    ("commentary", "/en/index.php?strPageID=SF01_01_04&iClassID=6"),
    ("document", "/en/index.php?strPageID=SF01_01_05&iClassID=7"),
];

/// Known site revisions with a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    #[default]
    Classic,
    Redesign,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Classic => write!(f, "classic"),
            Revision::Redesign => write!(f, "redesign"),
        }
    }
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Revision::Classic),
            "redesign" => Ok(Revision::Redesign),
            other => Err(format!(
                "unknown revision {other:?} (expected \"classic\" or \"redesign\")"
            )),
        }
    }
}

/// What a stop marker means when it shows up in a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// Client-side redirect back to page 1 for out-of-range pages.
    Redirect,
    /// Localized "unknown address" error page.
    UnknownAddress,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKind::Redirect => write!(f, "redirect"),
            StopKind::UnknownAddress => write!(f, "unknown_address"),
        }
    }
}

/// A body substring that marks a listing page as past the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopMarker {
    pub kind: StopKind,
    pub pattern: String,
}

impl StopMarker {
    pub fn new(kind: StopKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: pattern.to_string(),
        }
    }
}

/// How listing anchors encode the article path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkEncoding {
    /// `href` holds the relative path directly.
    Href,
    /// `href` or `onclick` holds `name('escaped/path')`.
    ScriptCall,
    /// Plain `href` when it is a real path, else a script-call payload.
    Auto,
}

/// Where an article's photos live in its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoLocator {
    /// `img` elements matched by `selector`, typically scoped to the
    /// article's content table.
    ContentTable { selector: String },
    /// The redesign locator, which never matched the intended images.
    ///
    /// Articles loaded with this locator always report an empty photo list,
    /// even when the page has photos. The correct locator for that layout is
    /// not known, so this is kept as a known limitation of the profile.
    Incomplete,
}

/// Layout description of one Rodong Sinmun site revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Short label used in logs.
    pub name: String,
    /// Scheme and host, without trailing slash (e.g. `http://rodong.rep.kp`).
    pub domain: String,
    /// Path prefix put between the domain and a listing link's relative path.
    pub article_prefix: String,
    /// Section identifier to listing path template.
    pub sections: BTreeMap<String, String>,
    /// Appended to the section path; `{page}` becomes the 1-based page number.
    pub page_query: String,
    /// Stop checks, tried in order against every listing body.
    pub stop_markers: Vec<StopMarker>,
    /// Hard page ceiling. Exceeding it is an error, not a stop.
    pub max_pages: u32,
    /// Selector for the title-line element of each listing entry.
    pub title_line_selector: String,
    pub link_encoding: LinkEncoding,
    /// Selector for candidate content paragraphs in an article page.
    pub paragraph_selector: String,
    /// Inline `style` a content paragraph must carry.
    pub paragraph_style: String,
    pub photos: PhotoLocator,
}

impl SiteProfile {
    /// The original English site layout.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            domain: "http://rodong.rep.kp".to_string(),
            article_prefix: "/en/".to_string(),
            sections: default_sections(),
            page_query: "&page={page}".to_string(),
            stop_markers: vec![
                StopMarker::new(StopKind::Redirect, "location.href="),
                StopMarker::new(StopKind::UnknownAddress, "알수 없는 주소"),
            ],
            max_pages: DEFAULT_MAX_PAGES,
            title_line_selector: ".ListNewsLineTitle".to_string(),
            link_encoding: LinkEncoding::Href,
            paragraph_selector: "body > table p".to_string(),
            paragraph_style: "text-align: justify".to_string(),
            photos: PhotoLocator::ContentTable {
                selector: "body > table img".to_string(),
            },
        }
    }

    /// The redesigned layout with script-call links.
    ///
    /// Photo extraction is [`PhotoLocator::Incomplete`]: `photos()` is always
    /// empty under this profile.
    pub fn redesign() -> Self {
        Self {
            name: "redesign".to_string(),
            domain: "http://www.rodong.rep.kp".to_string(),
            page_query: "&iPageNo={page}".to_string(),
            link_encoding: LinkEncoding::Auto,
            paragraph_selector: "p.ArticleContent".to_string(),
            photos: PhotoLocator::Incomplete,
            ..Self::classic()
        }
    }

    pub fn for_revision(revision: Revision) -> Self {
        match revision {
            Revision::Classic => Self::classic(),
            Revision::Redesign => Self::redesign(),
        }
    }

    /// Check that the domain parses, every selector compiles and the page
    /// query has a page placeholder.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`], [`Error::InvalidSelector`] or [`Error::Config`].
    pub fn validate(&self) -> Result<()> {
        self.domain_url()?;
        parse_selector(&self.title_line_selector)?;
        parse_selector(&self.paragraph_selector)?;
        if let PhotoLocator::ContentTable { selector } = &self.photos {
            parse_selector(selector)?;
        }
        if !self.page_query.contains(PAGE_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "page_query {:?} has no {PAGE_PLACEHOLDER} placeholder",
                self.page_query
            )));
        }
        if let Some(marker) = self.stop_markers.iter().find(|m| m.pattern.is_empty()) {
            return Err(Error::Config(format!("empty {} stop marker", marker.kind)));
        }
        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Section identifiers, in sorted order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// URL of listing page `page` (1-based) for `section`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSection`] if the profile has no such section.
    pub fn listing_url(&self, section: &str, page: u32) -> Result<String> {
        let path = self
            .sections
            .get(section)
            .ok_or_else(|| Error::InvalidSection {
                section: section.to_string(),
            })?;
        let query = self
            .page_query
            .replace(PAGE_PLACEHOLDER, &page.to_string());
        Ok(format!("{}{}{}", self.domain_trimmed(), path, query))
    }

    /// Absolute article URL for a relative path taken from a listing link:
    /// `domain + article_prefix + path`.
    pub fn article_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.domain_trimmed(),
            self.article_prefix,
            path.trim_start_matches('/')
        )
    }

    /// Resolve an asset reference such as an `img` `src` against the domain.
    pub fn resolve_asset(&self, src: &str) -> Result<String> {
        Ok(self.domain_url()?.join(src)?.to_string())
    }

    pub fn domain_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.domain)?)
    }

    fn domain_trimmed(&self) -> &str {
        self.domain.trim_end_matches('/')
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::classic()
    }
}

fn default_sections() -> BTreeMap<String, String> {
    SECTIONS
        .iter()
        .map(|(id, path)| (id.to_string(), path.to_string()))
        .collect()
}
