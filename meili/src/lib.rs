//! Meilisearch API SDK for Rust.
//!
//! This crate provides a typed client for the Meilisearch HTTP API:
//! index lifecycle, document ingestion, asynchronous update tracking and
//! search with facet and highlight options.
//!
//! Document mutations are asynchronous on the server: each call is
//! acknowledged with an update id, and
//! [`Index::wait_for_pending_update`] turns that id into a bounded
//! blocking wait.
//!
//! # Example
//!
//! ```rust,no_run
//! use meili::Client;
//! use serde_json::json;
//!
//! # async fn run() -> meili::Result<()> {
//! let client = Client::builder("http://localhost:7700")
//!     .api_key("masterKey")
//!     .build()?;
//!
//! let movies = client.get_or_create_index("movies", None).await?;
//!
//! let ack = movies
//!     .add_documents(
//!         &[json!({ "id": 1, "title": "Carol", "genre": "drama" })],
//!         Some("id"),
//!     )
//!     .await?;
//! movies.wait_for_pending_update(ack.update_id).await?;
//!
//! let results = movies.search::<serde_json::Value>(Some("carol"), None).await?;
//! println!("{} hits", results.nb_hits);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod http;
mod index;
mod search;
mod types;
mod updates;

pub use client::{Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use error::{Error, Result, error_code};
pub use index::{DocumentsQuery, Index};
pub use search::{FacetFilter, SearchQuery, SearchResponse};
pub use types::{
    ClientStats, Dump, DumpStatus, IndexInfo, IndexOptions, IndexStats, Keys, UpdateId, Version,
};
pub use updates::{
    DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, UpdateState, UpdateStatus, UpdateType,
};
