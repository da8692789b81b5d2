//! OpenAlex API Client
//!
//! HTTP implementation of [`ScholarlyMetadataClient`] over the OpenAlex REST API.
//!
//! API Best Practices (per OpenAlex docs):
//! - Use `mailto:email` parameter for polite pool (10 req/s vs 1 req/s)
//! - Implement exponential backoff for retries on HTTP 429

use crate::client::ScholarlyMetadataClient;
use crate::config::OpenAlexConfig;
use crate::error::{OpenAlexError, OptionExt, Result};
use crate::records::{AuthorRecord, WorkRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Seconds suggested to callers once 429 retries are exhausted
const RATE_LIMIT_COOLDOWN_SECS: u64 = 60;

/// OpenAlex REST client
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    client: Client,
    config: OpenAlexConfig,
}

impl OpenAlexClient {
    /// Build a client from an explicit configuration.
    pub fn new(config: OpenAlexConfig) -> Result<Self> {
        config.validate()?;

        let user_agent = match &config.mailto {
            Some(email) => format!(
                "{}/{} (mailto:{})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                email
            ),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| OpenAlexError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAlexConfig {
        &self.config
    }

    /// URL for a list endpoint, e.g. `/works` with `search=...`.
    fn list_url(&self, endpoint: &str, query: &str) -> String {
        let url = format!(
            "{}{}?{}&per-page={}",
            self.config.api_root(),
            endpoint,
            query,
            self.config.per_page
        );
        self.with_mailto(url)
    }

    /// URL for a single entity, e.g. `/works/W9`.
    fn entity_url(&self, endpoint: &str, id: &str) -> String {
        let url = format!(
            "{}{}/{}",
            self.config.api_root(),
            endpoint,
            urlencoding::encode(id)
        );
        match &self.config.mailto {
            Some(email) => format!("{}?mailto={}", url, urlencoding::encode(email)),
            None => url,
        }
    }

    fn with_mailto(&self, url: String) -> String {
        match &self.config.mailto {
            Some(email) => format!("{}&mailto={}", url, urlencoding::encode(email)),
            None => url,
        }
    }

    /// GET `url` and parse the body as JSON, backing off on 429.
    async fn get_json(&self, url: &str) -> Result<Value> {
        let mut retries = 0;

        loop {
            debug!(url = %url, "Fetching OpenAlex");
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                return serde_json::from_str(&body).map_err(|e| {
                    OpenAlexError::Parse(format!("Failed to parse OpenAlex response: {}", e))
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retries < self.config.max_retries {
                    let backoff = Duration::from_secs(2u64.pow(retries));
                    warn!(
                        retries = retries,
                        backoff_secs = backoff.as_secs(),
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    retries += 1;
                    continue;
                }
                return Err(OpenAlexError::RateLimited(RATE_LIMIT_COOLDOWN_SECS));
            }

            return Err(OpenAlexError::Api {
                code: status.as_u16(),
                message: format!("OpenAlex API error: {}", status),
            });
        }
    }

    /// Fetch a list endpoint and return the objects in its `results` array.
    async fn get_results(&self, url: &str) -> Result<Vec<Value>> {
        let envelope = self.get_json(url).await?;
        let results = envelope
            .get("results")
            .and_then(Value::as_array)
            .ok_or_parse("OpenAlex response has no `results` array")?;

        results
            .iter()
            .map(|item| {
                if item.is_object() {
                    Ok(item.clone())
                } else {
                    Err(OpenAlexError::Parse(format!(
                        "OpenAlex result is not an object: {}",
                        item
                    )))
                }
            })
            .collect()
    }
}

#[async_trait]
impl ScholarlyMetadataClient for OpenAlexClient {
    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorRecord>> {
        let url = self.list_url(
            "/authors",
            &format!("filter=display_name.search:{}", urlencoding::encode(name)),
        );
        let results = self.get_results(&url).await?;
        Ok(results.into_iter().map(AuthorRecord::new).collect())
    }

    async fn search_works(&self, text: &str) -> Result<Vec<WorkRecord>> {
        let url = self.list_url("/works", &format!("search={}", urlencoding::encode(text)));
        let results = self.get_results(&url).await?;
        Ok(results.into_iter().map(WorkRecord::new).collect())
    }

    async fn works_by_author(&self, author_id: &str) -> Result<Vec<WorkRecord>> {
        let url = self.list_url(
            "/works",
            &format!("filter=author.id:{}", urlencoding::encode(author_id)),
        );
        let results = self.get_results(&url).await?;
        Ok(results.into_iter().map(WorkRecord::new).collect())
    }

    async fn fetch_work(&self, work_id: &str) -> Result<WorkRecord> {
        let url = self.entity_url("/works", work_id);
        let work = self.get_json(&url).await?;
        if !work.is_object() {
            return Err(OpenAlexError::Parse(format!(
                "OpenAlex work {} is not an object",
                work_id
            )));
        }
        Ok(WorkRecord::new(work))
    }
}
