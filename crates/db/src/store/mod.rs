//! Backend-agnostic listing record store.

use std::path::PathBuf;

use async_trait::async_trait;
use estates_core::types::RecordId;

use crate::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};

mod json_file;
mod postgres;

pub use json_file::JsonFileStore;
pub use postgres::PgPropertyStore;

/// Errors raised by a [`PropertyStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed listing file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Listing with id {0} already exists")]
    Conflict(RecordId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable, queryable collection of property listings.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Short backend label for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Insert a listing, assigning an id when the input has none.
    /// Fails with [`StoreError::Conflict`] if the id is taken.
    async fn create(&self, input: CreateProperty) -> StoreResult<Property>;

    /// All listings matching `filter`, newest first where the backend tracks
    /// creation time and in storage order otherwise.
    async fn find_all(&self, filter: &PropertyFilter) -> StoreResult<Vec<Property>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Property>>;

    /// Overwrite the fields present in `input`. `None` if the id is unknown.
    async fn update(&self, id: &str, input: UpdateProperty) -> StoreResult<Option<Property>>;

    /// Remove a listing. `false` if the id is unknown.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
}
