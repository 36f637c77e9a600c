//! Document store abstraction
//!
//! The popularity tracker and saved movies registry only ever talk to a
//! `DocumentStore`. Appwrite is the production backend; the in-memory store
//! implements the same contract for local runs and tests.

use serde_json::{Map, Value};

use crate::{
    error::AppResult,
    models::{Document, DocumentId, DocumentQuery, Permission},
};

pub mod appwrite;
pub mod memory;

pub use appwrite::AppwriteClient;
pub use memory::MemoryDocumentStore;

/// CRUD and query operations over named collections
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching every filter, optionally sorted and truncated
    ///
    /// Without a sort the store's own ordering is kept.
    async fn query_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>>;

    /// Fetch one document by id; `NotFound` if it does not exist
    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document>;

    /// Create a document. Fails with a store error if an explicit id already exists.
    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Map<String, Value>,
        permissions: Vec<Permission>,
    ) -> AppResult<Document>;

    /// Merge `fields` into an existing document
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<Document>;

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
