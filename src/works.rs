//! Work-centric document builder.
//!
//! Searches works by free text. Search hits lack the abstract, so every hit is
//! re-fetched by id before its [`Document`] is assembled.

use crate::client::ScholarlyMetadataClient;
use crate::document::{assemble_text, Document, Metadata};
use crate::error::{OpenAlexError, Result};
use crate::records::WorkRecord;
use crate::DEFAULT_LIMIT;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds one document per work matching a text query
#[derive(Debug, Clone)]
pub struct WorkDocumentBuilder {
    client: Arc<dyn ScholarlyMetadataClient>,
    concurrency: usize,
}

impl WorkDocumentBuilder {
    pub fn new(client: Arc<dyn ScholarlyMetadataClient>) -> Self {
        Self {
            client,
            concurrency: 1,
        }
    }

    /// Re-fetch up to `n` works at once. Output order is unchanged.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// [`Self::build`] with the default limit.
    pub async fn build_default(&self, query: &str) -> Result<Vec<Document>> {
        self.build(query, DEFAULT_LIMIT).await
    }

    /// Documents for the first `limit` works matching `query`.
    ///
    /// Any failure aborts the whole call; no partial list is returned.
    pub async fn build(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        info!(query = query, limit = limit, "Starting OpenAlex work query");

        let hits = self
            .client
            .search_works(query)
            .await
            .map_err(OpenAlexError::into_search_failure)?;

        let documents: Vec<Document> = stream::iter(hits.into_iter().take(limit))
            .map(|hit| self.hit_document(hit))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        info!(query = query, count = documents.len(), "OpenAlex work query complete");
        Ok(documents)
    }

    async fn hit_document(&self, hit: WorkRecord) -> Result<Document> {
        let title = hit.title()?;
        let work_id = hit.openalex_id()?;

        debug!(work = %work_id, "Fetching full work");
        let work = self.client.fetch_work(&work_id).await?;

        let text = assemble_text(&title, &work.abstract_text());

        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!(title));
        metadata.insert("authors".to_string(), json!(work.authors()?));
        metadata.insert("venue".to_string(), json!(work.venue()));

        Ok(Document::new(text, metadata))
    }
}
