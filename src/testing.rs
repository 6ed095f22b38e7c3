//! Test doubles and HTML fixtures.

use crate::error::{Error, Result};
use crate::http::Fetch;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory [`Fetch`] that serves fixture bodies and records every request.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    fallback: Option<String>,
    requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Body served for any URL without its own fixture.
    pub fn with_fallback(mut self, body: &str) -> Self {
        self.fallback = Some(body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Fetch for MockFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| Error::Config(format!("no fixture for {url}")))
    }
}

/// Listing page with one `.ListNewsLineTitle` cell per `(title, href)`.
pub fn listing_page(entries: &[(&str, &str)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(title, href)| {
            let href = href.replace('&', "&amp;");
            format!(
                "<tr><td class=\"ListNewsLineTitle\">\n    <a href=\"{href}\">{title}</a>\n  </td></tr>\n"
            )
        })
        .collect();
    format!("<html><head><title>Rodong Sinmun</title></head><body><table>\n{rows}</table></body></html>")
}

/// Page the classic site serves for out-of-range listing pages.
pub const REDIRECT_PAGE: &str =
    "<html><body><script>location.href='index.php?strPageID=SF01_01_04&iClassID=4';</script></body></html>";

/// Localized "unknown address" error page.
pub const UNKNOWN_ADDRESS_PAGE: &str = "<html><body><p>알수 없는 주소입니다.</p></body></html>";
