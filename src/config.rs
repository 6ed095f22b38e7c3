//! YAML configuration.
//!
//! Every field is optional; an empty file gives the classic profile with the
//! default user agent and no explicit timeout.
//!
//! ```yaml
//! user_agent: JucheBot/1.0
//! timeout_secs: 30
//! revision: redesign
//! ```
//!
//! A full `site:` block replaces the built-in profile entirely, which is the
//! way to follow a layout change without a new release.

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;
use crate::profile::{Revision, SiteProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Built-in profile to use when `site` is absent.
    pub revision: Revision,
    /// Custom site profile; takes precedence over `revision`.
    pub site: Option<SiteProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            revision: Revision::default(),
            site: None,
        }
    }
}

impl Config {
    /// Read and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] naming the path if it cannot be read or parsed.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_yaml(&raw)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!(revision = %config.revision, custom_site = config.site.is_some(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// The site profile in effect.
    pub fn profile(&self) -> SiteProfile {
        self.site
            .clone()
            .unwrap_or_else(|| SiteProfile::for_revision(self.revision))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
