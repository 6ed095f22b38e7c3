//! HTTP capability used by the catalog and every article it creates.
//!
//! [`Fetch`] is the seam: production code goes through [`HttpClient`], a
//! blocking `reqwest` client with a fixed `User-Agent`; tests substitute an
//! in-memory implementation.

use crate::error::Result;
use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "JucheBot/1.0";

/// Something that can turn a URL into a response body.
///
/// Implementations are shared read-only between the catalog and its
/// articles, so `fetch` takes `&self`.
pub trait Fetch: fmt::Debug {
    /// Fetch `url` and return the response body as text.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP client with an identifying `User-Agent` header.
///
/// The header (and optional timeout) is fixed at construction and applied to
/// every request. Network errors are returned as-is; there is no retry.
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Build a client sending `user_agent` on every request.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Value of the `User-Agent` header
    /// * `timeout` - Per-request timeout, or `None` for reqwest's default
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Network`] if the TLS backend cannot be initialised.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            user_agent: user_agent.to_string(),
        })
    }

    /// The `User-Agent` this client identifies with.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Fetch for HttpClient {
    #[instrument(level = "debug", skip(self))]
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        // Out-of-range pages are recognised by their content, so keep the body.
        if !status.is_success() {
            warn!(%url, %status, "Non-success status; using body anyway");
        }
        let body = response.text()?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
