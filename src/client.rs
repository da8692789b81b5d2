//! The upstream metadata service seen by the document builders.

use crate::error::Result;
use crate::records::{AuthorRecord, WorkRecord};
use async_trait::async_trait;

/// Source of author and work records.
///
/// Implementations report network, HTTP status and rate-limit failures as
/// errors for which [`crate::OpenAlexError::is_upstream`] is true.
#[async_trait]
pub trait ScholarlyMetadataClient: Send + Sync + std::fmt::Debug {
    /// Authors whose display name matches `name`.
    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorRecord>>;

    /// Works matching a free-text query. Hits may lack fields such as the abstract.
    async fn search_works(&self, text: &str) -> Result<Vec<WorkRecord>>;

    /// Works attributed to the author with bare id `author_id`.
    async fn works_by_author(&self, author_id: &str) -> Result<Vec<WorkRecord>>;

    /// Full record of the work with bare id `work_id`.
    async fn fetch_work(&self, work_id: &str) -> Result<WorkRecord>;
}
