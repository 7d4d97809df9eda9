//! User persistence
//!
//! Storage lives for one run only. There is one writer (the ingestor) while
//! ingesting and one reader (the selector) afterwards, so the implementations
//! only need a plain mutex.

pub mod memory;
pub mod sqlite;

use crate::error::StoreError;
use crate::validator::ValidatedUser;
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use memory::MemoryUserStore;
pub use sqlite::SqliteUserStore;

/// Append-only store of validated users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Append a user. Ids are unique.
    async fn insert(&self, user: ValidatedUser) -> Result<(), StoreError>;

    /// Up to `limit` users, ascending by age. Equal ages keep insertion order.
    async fn query_youngest(&self, limit: usize) -> Result<Vec<ValidatedUser>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Which store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Sqlite,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Open a fresh, empty store
pub fn open_store(kind: StoreKind) -> Result<Arc<dyn UserStore>, StoreError> {
    Ok(match kind {
        StoreKind::Memory => Arc::new(MemoryUserStore::new()),
        StoreKind::Sqlite => Arc::new(SqliteUserStore::open_in_memory()?),
    })
}
