//! Client configuration.
//!
//! Everything the OpenAlex client needs is carried in [`OpenAlexConfig`] and
//! handed to [`crate::openalex::OpenAlexClient::new`]; nothing is read from
//! process-wide state after construction.

use crate::error::{OpenAlexError, Result};
use std::str::FromStr;

/// OpenAlex API base URL
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// Maximum results per page (OpenAlex limit)
pub const MAX_PER_PAGE: usize = 200;

/// Page size used when none is configured
pub const DEFAULT_PER_PAGE: usize = 25;

/// Configuration for [`crate::openalex::OpenAlexClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAlexConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Email for polite pool access
    pub mailto: Option<String>,
    /// Results requested per list call
    pub per_page: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries on HTTP 429 before giving up
    pub max_retries: u32,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            base_url: OPENALEX_API_BASE.to_string(),
            mailto: None,
            per_page: DEFAULT_PER_PAGE,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl OpenAlexConfig {
    /// Defaults overlaid with `OPENALEX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("OPENALEX_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(mailto) = lookup("OPENALEX_EMAIL").filter(|m| !m.trim().is_empty()) {
            config.mailto = Some(mailto);
        }
        if let Some(raw) = lookup("OPENALEX_PER_PAGE") {
            config.per_page = parse_var("OPENALEX_PER_PAGE", &raw)?;
        }
        if let Some(raw) = lookup("OPENALEX_TIMEOUT_SECS") {
            config.timeout_secs = parse_var("OPENALEX_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("OPENALEX_MAX_RETRIES") {
            config.max_retries = parse_var("OPENALEX_MAX_RETRIES", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the polite pool email.
    pub fn with_mailto(mut self, mailto: impl Into<String>) -> Self {
        self.mailto = Some(mailto.into());
        self
    }

    /// Point the client at another API root (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(OpenAlexError::Config("base_url must not be empty".to_string()));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(OpenAlexError::Config(format!(
                "per_page must be within 1..={}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        if self.timeout_secs == 0 {
            return Err(OpenAlexError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Base URL with any trailing slashes removed.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| OpenAlexError::Config(format!("invalid value for {}: {:?}", key, raw)))
}
