//! Document store holding person records.
//!
//! The service only ever talks to a [`PersonStore`], so backends can be swapped
//! (and faked in tests) without touching the service contract.

use std::sync::Arc;

use axum::async_trait;
use serde::Deserialize;

use crate::model::person::{Person, PersonId};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid stored document: {0}")]
    InvalidData(String),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The four primitives the service needs from a document store.
///
/// "Absent" is never an error: lookups return `None` and deletes return `false`.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<Person>>;

    async fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>>;

    /// Stores a new document.
    async fn insert(&self, person: &Person) -> StoreResult<()>;

    /// Overwrites the document with the same id. Returns `false`, and writes
    /// nothing, when that document no longer exists.
    async fn replace(&self, person: &Person) -> StoreResult<bool>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: PersonId) -> StoreResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    Memory,
    Sqlite { path: String },
}

impl StorageConfig {
    pub async fn open(&self) -> anyhow::Result<Arc<dyn PersonStore>> {
        let store: Arc<dyn PersonStore> = match self {
            StorageConfig::Memory => {
                tracing::info!("Using in-memory store");

                Arc::new(MemoryStore::new())
            }
            StorageConfig::Sqlite { path } => {
                tracing::info!(%path, "Using sqlite store");

                Arc::new(SqliteStore::open(path.clone()).await?)
            }
        };

        Ok(store)
    }
}
