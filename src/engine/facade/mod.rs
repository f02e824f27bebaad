//! Interface of the transactional document store the event store runs on,
//! plus an in-memory implementation.

use crate::engine::errors::FacadeError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod filter;
pub mod memory;

pub use filter::Filter;
pub use memory::{MemoryDocumentStore, MemoryTransaction};


/// Primary key of a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocKey {
    Int(u64),
    Binary(Vec<u8>),
    Text(String),
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKey::Int(v) => write!(f, "{}", v),
            DocKey::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            DocKey::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: DocKey,
    pub body: Value,
}

impl Document {
    pub fn new(key: DocKey, body: Value) -> Self {
        Self { key, body }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    KeyAscending,
}

/// Lazily produced query results.
pub type DocumentStream = BoxStream<'static, Result<Document, FacadeError>>;

/// Collection management and transaction entry point.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    type Transaction: DocumentTransaction;

    async fn create_collection(&self, name: &str) -> Result<(), FacadeError>;

    async fn collection_names(&self) -> Result<Vec<String>, FacadeError>;

    /// Declares a secondary index on a dotted body path.
    async fn create_index(&self, collection: &str, path: &str) -> Result<(), FacadeError>;

    async fn indexes(&self, collection: &str) -> Result<Vec<String>, FacadeError>;

    async fn begin(&self) -> Result<Self::Transaction, FacadeError>;
}

/// One unit of atomic work. Writes become visible to others on `commit`;
/// reads see committed data plus this transaction's own writes.
#[async_trait]
pub trait DocumentTransaction: Send {
    async fn insert_many(&mut self, collection: &str, docs: Vec<Document>)
    -> Result<(), FacadeError>;

    async fn upsert(&mut self, collection: &str, doc: Document) -> Result<(), FacadeError>;

    async fn exists(&mut self, collection: &str, key: &DocKey) -> Result<bool, FacadeError>;

    async fn max_key(&mut self, collection: &str) -> Result<Option<DocKey>, FacadeError>;

    fn find_all(
        &mut self,
        collection: &str,
        filter: Filter,
        sort: Option<SortOrder>,
    ) -> DocumentStream;

    async fn commit(self) -> Result<(), FacadeError>;

    async fn rollback(self) -> Result<(), FacadeError>;
}
