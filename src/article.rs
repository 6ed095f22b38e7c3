//! Lazily loaded Rodong Sinmun article.
//!
//! An [`Article`] knows its title and URL from the listing page that
//! discovered it. Its text and photos are fetched together, once, the first
//! time either is asked for.

use crate::error::{Error, Result};
use crate::http::Fetch;
use crate::models::ArticleRecord;
use crate::profile::{PhotoLocator, SiteProfile};
use crate::utils::{normalize_style, parse_selector};
use once_cell::unsync::OnceCell;
use scraper::Html;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// Text and photos of an article, loaded as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArticleContent {
    text: String,
    photos: Vec<String>,
}

/// One news item.
///
/// `title` and `url` are always available. `text` and `photos` trigger a
/// single fetch of the article page on first use and are cached afterwards;
/// a failed load caches nothing, so a later call fetches again.
///
/// The cache uses interior mutability: an `&Article` handed out by
/// [`crate::SectionCatalog::get`] can still load its own content.
pub struct Article {
    title: String,
    url: String,
    fetcher: Rc<dyn Fetch>,
    profile: Rc<SiteProfile>,
    content: OnceCell<ArticleContent>,
}

impl Article {
    pub fn new(fetcher: Rc<dyn Fetch>, profile: Rc<SiteProfile>, title: String, url: String) -> Self {
        Self {
            title,
            url,
            fetcher,
            profile,
            content: OnceCell::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The article's body text: every justified content paragraph, in
    /// document order, joined with `\n`.
    ///
    /// # Errors
    ///
    /// Network errors from the fetcher, or [`Error::PageFormatChanged`] when
    /// the page cannot be interpreted.
    pub fn text(&self) -> Result<&str> {
        Ok(&self.ensure_loaded()?.text)
    }

    /// Absolute URLs of the article's photos.
    ///
    /// Always empty under a profile whose locator is
    /// [`PhotoLocator::Incomplete`].
    pub fn photos(&self) -> Result<&[String]> {
        Ok(&self.ensure_loaded()?.photos)
    }

    /// Text if it has already been loaded, without fetching.
    pub fn cached_text(&self) -> Option<&str> {
        self.content.get().map(|c| c.text.as_str())
    }

    /// Photos if they have already been loaded, without fetching.
    pub fn cached_photos(&self) -> Option<&[String]> {
        self.content.get().map(|c| c.photos.as_slice())
    }

    pub fn is_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// Serializable copy of the article, loading its content if needed.
    pub fn snapshot(&self) -> Result<ArticleRecord> {
        let content = self.ensure_loaded()?;
        Ok(ArticleRecord {
            title: self.title.clone(),
            url: self.url.clone(),
            text: content.text.clone(),
            photos: content.photos.clone(),
        })
    }

    fn ensure_loaded(&self) -> Result<&ArticleContent> {
        self.content.get_or_try_init(|| self.load())
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    fn load(&self) -> Result<ArticleContent> {
        let body = self.fetcher.fetch(&self.url)?;
        let content = parse_article(&self.profile, &body)?;
        info!(
            chars = content.text.chars().count(),
            photos = content.photos.len(),
            "Loaded article"
        );
        Ok(content)
    }
}

impl fmt::Debug for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Article")
            .field("title", &self.title)
            .field("url", &self.url)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

fn parse_article(profile: &SiteProfile, body: &str) -> Result<ArticleContent> {
    let document = Html::parse_document(body);

    let paragraph = parse_selector(&profile.paragraph_selector)?;
    let wanted_style = normalize_style(&profile.paragraph_style);
    let text = document
        .select(&paragraph)
        .filter(|p| {
            p.value()
                .attr("style")
                .is_some_and(|style| normalize_style(style) == wanted_style)
        })
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    let photos = match &profile.photos {
        PhotoLocator::ContentTable { selector } => {
            let image = parse_selector(selector)?;
            let mut photos = Vec::new();
            for img in document.select(&image) {
                let src = img.value().attr("src").ok_or_else(|| {
                    Error::PageFormatChanged(format!("content image without src: {}", img.html()))
                })?;
                photos.push(profile.resolve_asset(src)?);
            }
            photos
        }
        PhotoLocator::Incomplete => {
            debug!(profile = %profile.name, "Photo locator is incomplete; reporting no photos");
            Vec::new()
        }
    };

    Ok(ArticleContent { text, photos })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    const ARTICLE_URL: &str = "http://rodong.rep.kp/en/index.php?strPageID=SF01_02_01&newsID=1";

    const ARTICLE_PAGE: &str = r#"<html><head><title>Article</title></head><body>
        <table><tr><td>
            <p style="text-align: justify">Pyongyang, January 1 (Rodong Sinmun) -- First paragraph.</p>
            <img src="/en/photo/2015/01/01-01.jpg">
            <p style="text-align: center">Photo caption</p>
            <p style="text-align: justify">Second paragraph.</p>
            <img src="photo/2015/01/01-02.jpg">
        </td></tr></table>
        <p style="text-align: justify">Footer outside the content table.</p>
    </body></html>"#;

    fn article(mock: &Rc<MockFetcher>, profile: SiteProfile) -> Article {
        Article::new(
            mock.clone(),
            Rc::new(profile),
            "New Year Address".to_string(),
            ARTICLE_URL.to_string(),
        )
    }

    #[test]
    fn test_identity_available_without_fetch() {
        let mock = Rc::new(MockFetcher::new());
        let a = article(&mock, SiteProfile::classic());
        assert_eq!(a.title(), "New Year Address");
        assert_eq!(a.url(), ARTICLE_URL);
        assert_eq!(mock.fetch_count(), 0);
    }

    #[test]
    fn test_content_absent_before_access() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());
        assert!(!a.is_loaded());
        assert!(a.cached_text().is_none());
        assert!(a.cached_photos().is_none());
    }

    #[test]
    fn test_text_access_loads_both_fields_once() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());

        a.text().unwrap();
        assert!(a.cached_text().is_some());
        assert!(a.cached_photos().is_some());
        assert_eq!(mock.fetch_count(), 1);

        a.text().unwrap();
        a.photos().unwrap();
        assert_eq!(mock.fetch_count(), 1);
    }

    #[test]
    fn test_photos_access_loads_both_fields_once() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());

        a.photos().unwrap();
        assert!(a.cached_text().is_some());
        a.text().unwrap();
        a.photos().unwrap();
        assert_eq!(mock.fetch_count(), 1);
    }

    #[test]
    fn test_text_keeps_only_justified_paragraphs() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());
        assert_eq!(
            a.text().unwrap(),
            "Pyongyang, January 1 (Rodong Sinmun) -- First paragraph.\nSecond paragraph."
        );
    }

    #[test]
    fn test_two_justified_one_plain() {
        let page = r#"<html><body><table><tr><td>
            <p style="text-align: justify">Alpha.</p>
            <p>Not justified.</p>
            <p style="text-align: justify">Beta.</p>
        </td></tr></table></body></html>"#;
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, page));
        let a = article(&mock, SiteProfile::classic());
        assert_eq!(a.text().unwrap(), "Alpha.\nBeta.");
        assert!(a.photos().unwrap().is_empty());
    }

    #[test]
    fn test_photos_resolved_against_domain() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());
        assert_eq!(
            a.photos().unwrap(),
            &[
                "http://rodong.rep.kp/en/photo/2015/01/01-01.jpg".to_string(),
                "http://rodong.rep.kp/photo/2015/01/01-02.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_incomplete_locator_reports_no_photos() {
        let page = r#"<html><body>
            <p class="ArticleContent" style="text-align: justify">Body.</p>
            <img src="/en/photo/1.jpg">
        </body></html>"#;
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, page));
        let a = article(&mock, SiteProfile::redesign());
        assert_eq!(a.text().unwrap(), "Body.");
        assert!(a.photos().unwrap().is_empty());
    }

    #[test]
    fn test_image_without_src_fails() {
        let page = r#"<html><body><table><tr><td><img alt="x"></td></tr></table></body></html>"#;
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, page));
        let a = article(&mock, SiteProfile::classic());
        assert!(matches!(a.photos(), Err(Error::PageFormatChanged(_))));
        assert!(!a.is_loaded());
    }

    #[test]
    fn test_failed_load_caches_nothing() {
        let mock = Rc::new(MockFetcher::new());
        let a = article(&mock, SiteProfile::classic());
        assert!(a.text().is_err());
        assert!(!a.is_loaded());
        assert!(a.text().is_err());
        assert_eq!(mock.fetch_count(), 2);
    }

    #[test]
    fn test_snapshot() {
        let mock = Rc::new(MockFetcher::new().with_page(ARTICLE_URL, ARTICLE_PAGE));
        let a = article(&mock, SiteProfile::classic());
        let record = a.snapshot().unwrap();
        assert_eq!(record.title, "New Year Address");
        assert_eq!(record.photos.len(), 2);
        assert!(record.text.ends_with("Second paragraph."));
    }
}
