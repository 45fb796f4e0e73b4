//! Remote document store abstraction.
//!
//! The core treats the backing store as opaque: collection-scoped CRUD plus
//! a subscribe-to-changes primitive keyed by an equality predicate on one
//! field. No server-side range queries are assumed.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

pub use memory::MemoryDocumentStore;

/// Raw store record: a store-assigned id beside an opaque JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Full set of documents currently matching a subscription's predicate,
/// pushed by the store whenever any of them change.
pub type Snapshot = Vec<Document>;

/// Receiving end of a subscription. Snapshots arrive in the order the store
/// emits them; dropping the receiver cancels the subscription.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<Snapshot>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its assigned id.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Fetch a single document, `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge the top-level fields of `changes` into an existing document.
    async fn update(&self, collection: &str, id: &str, changes: Value) -> Result<(), StoreError>;

    /// Delete a document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Subscribe to all documents in `collection` whose `field` equals
    /// `value`. The current matching set is delivered immediately, then
    /// again after every change.
    fn subscribe(&self, collection: &str, field: &str, value: &str) -> SnapshotReceiver;
}
