//! Mock client for testing purposes.
//!
//! Serves canned records from memory and records every call in order, so
//! tests can check which detail fetches a builder issued.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::client::ScholarlyMetadataClient;
use crate::error::{OpenAlexError, Result};
use crate::records::{AuthorRecord, WorkRecord};

/// A call received by [`MockClient`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockCall {
    SearchAuthors(String),
    SearchWorks(String),
    WorksByAuthor(String),
    FetchWork(String),
}

/// Failure to inject for a given call
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Non-success HTTP status (an upstream error)
    Status(u16),
    /// Undecodable body (a non-upstream error)
    Parse(String),
}

impl MockFailure {
    fn to_error(&self) -> OpenAlexError {
        match self {
            MockFailure::Status(code) => OpenAlexError::Api {
                code: *code,
                message: format!("mock status {}", code),
            },
            MockFailure::Parse(msg) => OpenAlexError::Parse(msg.clone()),
        }
    }
}

/// In-memory [`ScholarlyMetadataClient`]
#[derive(Debug, Default)]
pub struct MockClient {
    authors: HashMap<String, Vec<AuthorRecord>>,
    searches: HashMap<String, Vec<WorkRecord>>,
    author_works: HashMap<String, Vec<WorkRecord>>,
    works: HashMap<String, WorkRecord>,
    failures: HashMap<MockCall, MockFailure>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authors returned for an author-name search.
    pub fn with_authors(mut self, name: &str, authors: Vec<Value>) -> Self {
        self.authors
            .insert(name.to_string(), authors.into_iter().map(AuthorRecord::new).collect());
        self
    }

    /// Hits returned for a free-text work search.
    pub fn with_search(mut self, text: &str, hits: Vec<Value>) -> Self {
        self.searches
            .insert(text.to_string(), hits.into_iter().map(WorkRecord::new).collect());
        self
    }

    /// Works attributed to a bare author id.
    pub fn with_author_works(mut self, author_id: &str, works: Vec<Value>) -> Self {
        self.author_works
            .insert(author_id.to_string(), works.into_iter().map(WorkRecord::new).collect());
        self
    }

    /// Full work record served for a bare work id.
    pub fn with_work(mut self, work_id: &str, work: Value) -> Self {
        self.works.insert(work_id.to_string(), WorkRecord::new(work));
        self
    }

    /// Make `call` fail instead of answering.
    pub fn fail_on(mut self, call: MockCall, failure: MockFailure) -> Self {
        self.failures.insert(call, failure);
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        let failure = self.failures.get(&call).map(MockFailure::to_error);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ScholarlyMetadataClient for MockClient {
    async fn search_authors(&self, name: &str) -> Result<Vec<AuthorRecord>> {
        self.record(MockCall::SearchAuthors(name.to_string()))?;
        Ok(self.authors.get(name).cloned().unwrap_or_default())
    }

    async fn search_works(&self, text: &str) -> Result<Vec<WorkRecord>> {
        self.record(MockCall::SearchWorks(text.to_string()))?;
        Ok(self.searches.get(text).cloned().unwrap_or_default())
    }

    async fn works_by_author(&self, author_id: &str) -> Result<Vec<WorkRecord>> {
        self.record(MockCall::WorksByAuthor(author_id.to_string()))?;
        Ok(self.author_works.get(author_id).cloned().unwrap_or_default())
    }

    async fn fetch_work(&self, work_id: &str) -> Result<WorkRecord> {
        self.record(MockCall::FetchWork(work_id.to_string()))?;
        self.works.get(work_id).cloned().ok_or_else(|| OpenAlexError::Api {
            code: 404,
            message: format!("mock has no work {}", work_id),
        })
    }
}
