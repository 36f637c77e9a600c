use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::{cmp::Ordering, collections::HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::DocumentStore,
    error::{AppError, AppResult},
    models::{Document, DocumentId, DocumentQuery, Filter, FilterOp, Permission, SortDirection},
};

/// Process-local document store
///
/// Collections keep insertion order, which is the "store-defined" order
/// returned for unsorted queries and for ties under a sort.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection
    pub async fn document_count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(Vec::len).unwrap_or(0)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ if a == b => Some(Ordering::Equal),
        _ => None,
    }
}

fn satisfies(doc: &Document, filter: &Filter) -> bool {
    let ordering = doc
        .get(&filter.field)
        .and_then(|value| compare_values(value, &filter.value));

    match filter.op {
        FilterOp::Equal => ordering == Some(Ordering::Equal),
        FilterOp::NotEqual => ordering != Some(Ordering::Equal),
        FilterOp::LessThan => ordering == Some(Ordering::Less),
        FilterOp::LessThanEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        FilterOp::GreaterThan => ordering == Some(Ordering::Greater),
        FilterOp::GreaterThanEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
    }
}

/// Missing or incomparable values sort before everything else
fn sort_key_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.filters.iter().all(|f| satisfies(doc, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            // sort_by is stable, so equal keys keep insertion order
            documents.sort_by(|a, b| {
                let ordering = sort_key_cmp(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }

        tracing::debug!(
            collection = %collection,
            results = documents.len(),
            store = "memory",
            "Documents queried"
        );

        Ok(documents)
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("document {} in {}", id, collection)))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Map<String, Value>,
        _permissions: Vec<Permission>,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let id = match id {
            DocumentId::Unique => Uuid::new_v4().simple().to_string(),
            DocumentId::Custom(id) => {
                if docs.iter().any(|doc| doc.id == id) {
                    return Err(AppError::Store(format!(
                        "Document with the requested ID already exists: {}",
                        id
                    )));
                }
                id
            }
        };

        let timestamp = now();
        let document = Document {
            id,
            created_at: Some(timestamp.clone()),
            updated_at: Some(timestamp),
            fields,
        };
        docs.push(document.clone());

        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| AppError::NotFound(format!("document {} in {}", id, collection)))?;

        document.fields.extend(fields);
        document.updated_at = Some(now());

        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("document {} in {}", id, collection)))?;

        let position = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| AppError::NotFound(format!("document {} in {}", id, collection)))?;
        docs.remove(position);

        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
