//! Listing page parsing: stop-condition checks and entry extraction.
//!
//! A listing page is one page of title lines for a section. Each title line
//! wraps an anchor whose target is either a plain relative path or a
//! script call such as `fn_articleView('index.php?...')`.

use crate::error::{Error, Result};
use crate::profile::{LinkEncoding, SiteProfile, StopMarker};
use crate::utils::{decode_escapes, parse_selector, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// `identifier('payload')`, payload may contain backslash escapes.
static SCRIPT_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_$][\w$.]*\s*\(\s*'((?:[^'\\]|\\.)*)'\s*\)")
        .expect("script-call pattern is valid")
});

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("anchor selector is valid"));

/// One title line of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Visible title, trimmed.
    pub title: String,
    /// Absolute article URL.
    pub url: String,
}

/// First stop marker, in profile order, found in `body`.
pub fn stop_reason<'p>(profile: &'p SiteProfile, body: &str) -> Option<&'p StopMarker> {
    profile
        .stop_markers
        .iter()
        .find(|marker| body.contains(&marker.pattern))
}

/// Extract every title line from a listing page, in document order.
///
/// # Errors
///
/// [`Error::PageFormatChanged`] if a title line has no anchor or its link
/// is in neither supported form.
#[instrument(level = "debug", skip_all, fields(profile = %profile.name))]
pub fn parse_listing(profile: &SiteProfile, body: &str) -> Result<Vec<ListingEntry>> {
    let title_line = parse_selector(&profile.title_line_selector)?;
    let document = Html::parse_document(body);

    let mut entries = Vec::new();
    for line in document.select(&title_line) {
        let title = line.text().collect::<String>().trim().to_string();
        let anchor = line.select(&ANCHOR).next().ok_or_else(|| {
            Error::PageFormatChanged(format!(
                "title line {:?} has no link (html: {})",
                title,
                truncate_for_log(&line.html(), 200)
            ))
        })?;
        let path = link_path(profile.link_encoding, anchor)?;
        entries.push(ListingEntry {
            title,
            url: profile.article_url(&path),
        });
    }

    debug!(count = entries.len(), "Parsed listing entries");
    Ok(entries)
}

/// Relative article path encoded in `anchor`.
fn link_path(encoding: LinkEncoding, anchor: ElementRef<'_>) -> Result<String> {
    let found = match encoding {
        LinkEncoding::Href => plain_href(anchor),
        LinkEncoding::ScriptCall => script_call_payload(anchor).transpose()?,
        // a usable href wins; onclick handlers are often unrelated tracking calls
        LinkEncoding::Auto => match plain_href(anchor) {
            Some(path) => Some(path),
            None => script_call_payload(anchor).transpose()?,
        },
    };

    found.ok_or_else(|| {
        Error::PageFormatChanged(format!(
            "unrecognised {encoding:?} link: {}",
            truncate_for_log(&anchor.html(), 200)
        ))
    })
}

fn plain_href(anchor: ElementRef<'_>) -> Option<String> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    Some(href.to_string())
}

/// Decoded payload of a script call in `href` or `onclick`, if either has one.
fn script_call_payload(anchor: ElementRef<'_>) -> Option<Result<String>> {
    ["href", "onclick"]
        .iter()
        .filter_map(|attr| anchor.value().attr(attr))
        .find_map(decode_script_call)
}

/// Decode `identifier('<escaped-path>')` into the path it carries.
///
/// Returns `None` when `value` contains no script call at all.
pub fn decode_script_call(value: &str) -> Option<Result<String>> {
    let captures = SCRIPT_CALL.captures(value)?;
    Some(decode_escapes(&captures[1]))
}
