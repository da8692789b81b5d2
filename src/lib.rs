//! # rustopenalex
//!
//! OpenAlex reader: turns author and work searches into flat text-plus-metadata
//! documents ready for a downstream indexer.
//!
//! ## Modules
//!
//! - [`authors`] - one document per (author, work) for an author-name query
//! - [`works`] - one document per work for a free-text query
//! - [`client`] - the upstream client trait the builders depend on
//! - [`openalex`] - OpenAlex REST implementation of that trait
//! - [`mock`] - in-memory implementation for tests
//! - [`records`] / [`extract`] - defended and required field access
//! - [`document`] - document type and text assembly
//! - [`export`] - JSON/CSV output
//! - [`config`] - client configuration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rustopenalex::{config::OpenAlexConfig, openalex::OpenAlexClient, works::WorkDocumentBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OpenAlexClient::new(OpenAlexConfig::from_env()?)?;
//!     let documents = WorkDocumentBuilder::new(Arc::new(client))
//!         .build("large language models", 10)
//!         .await?;
//!     println!("Built {} documents", documents.len());
//!     Ok(())
//! }
//! ```

pub mod authors;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod mock;
pub mod openalex;
pub mod records;
pub mod works;

/// Number of top-level search results considered when no limit is given
pub const DEFAULT_LIMIT: usize = 10;

pub use authors::AuthorDocumentBuilder;
pub use client::ScholarlyMetadataClient;
pub use document::{Document, Metadata};
pub use error::{OpenAlexError, Result};
pub use works::WorkDocumentBuilder;
