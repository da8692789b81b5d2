//! Author-centric document builder.
//!
//! Searches authors by name, then lists each author's works and emits one
//! [`Document`] per (author, work) pair.

use crate::client::ScholarlyMetadataClient;
use crate::document::{assemble_text, Document, Metadata};
use crate::error::{OpenAlexError, Result};
use crate::records::{AuthorRecord, WorkRecord};
use crate::DEFAULT_LIMIT;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds documents from the works of authors matching a name query
#[derive(Debug, Clone)]
pub struct AuthorDocumentBuilder {
    client: Arc<dyn ScholarlyMetadataClient>,
    concurrency: usize,
}

/// Author fields shared by every document of that author
struct AuthorContext {
    display_name: String,
    last_known_institution: String,
    cited_by_count: i64,
}

impl AuthorDocumentBuilder {
    pub fn new(client: Arc<dyn ScholarlyMetadataClient>) -> Self {
        Self {
            client,
            concurrency: 1,
        }
    }

    /// Fetch up to `n` authors' works at once. Output order is unchanged.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// [`Self::build`] with the default limit.
    pub async fn build_default(&self, query: &str) -> Result<Vec<Document>> {
        self.build(query, DEFAULT_LIMIT).await
    }

    /// Documents for the works of the first `limit` authors matching `query`.
    ///
    /// Any failure aborts the whole call; no partial list is returned.
    pub async fn build(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        info!(query = query, limit = limit, "Starting OpenAlex author query");

        let authors = self
            .client
            .search_authors(query)
            .await
            .map_err(OpenAlexError::into_search_failure)?;

        let per_author: Vec<Vec<Document>> = stream::iter(authors.into_iter().take(limit))
            .map(|author| self.author_documents(author))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let documents: Vec<Document> = per_author.into_iter().flatten().collect();
        info!(query = query, count = documents.len(), "OpenAlex author query complete");
        Ok(documents)
    }

    async fn author_documents(&self, author: AuthorRecord) -> Result<Vec<Document>> {
        let author_id = author.openalex_id()?;
        let display_name = author.display_name()?;

        let raw_institution = author.raw_last_known_institution().unwrap_or(&Value::Null);
        debug!(author = %author_id, last_known_institution = %raw_institution, "Raw institution");

        let context = AuthorContext {
            display_name,
            last_known_institution: author.last_known_institution(),
            cited_by_count: author.cited_by_count()?,
        };

        let works = self.client.works_by_author(&author_id).await?;
        debug!(author = %author_id, works = works.len(), "Fetched author works");

        works
            .iter()
            .map(|work| work_document(&context, work))
            .collect()
    }
}

fn work_document(author: &AuthorContext, work: &WorkRecord) -> Result<Document> {
    let title = work.title()?;
    let text = assemble_text(&title, &work.abstract_text());

    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), json!(title));
    metadata.insert("author".to_string(), json!(author.display_name));
    metadata.insert(
        "last_known_institution".to_string(),
        json!(author.last_known_institution),
    );
    metadata.insert("cited_by_count".to_string(), json!(author.cited_by_count));
    metadata.insert("authors".to_string(), json!(work.authors()?));
    metadata.insert("venue".to_string(), json!(work.venue()));

    Ok(Document::new(text, metadata))
}
