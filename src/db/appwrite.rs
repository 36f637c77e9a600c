//! Appwrite REST backend
//!
//! One `AppwriteClient` serves both the databases API (as a `DocumentStore`)
//! and the account API (as an `AccountProvider`, see `services::accounts`).
//! The HTTP client keeps a cookie store, so once a session is created every
//! later document call is made on behalf of that user.

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{
    db::DocumentStore,
    error::{AppError, AppResult},
    models::{Document, DocumentId, DocumentQuery, FilterOp, Permission, SortDirection},
};

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Non-success answer from Appwrite
#[derive(Debug)]
pub(crate) struct AppwriteFailure {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Clone)]
pub struct AppwriteClient {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
    database_id: String,
}

impl AppwriteClient {
    pub fn new(
        endpoint: String,
        project_id: String,
        api_key: Option<String>,
        database_id: String,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().cookie_store(true).build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            database_id,
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self
            .http_client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);

        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    /// Request made on behalf of the user a JWT was issued to; the API key is not sent
    pub(crate) fn request_as_user(&self, method: Method, path: &str, jwt: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        self.http_client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-JWT", jwt)
    }

    /// Reads the error message out of a failed response
    pub(crate) async fn failure(response: Response) -> AppwriteFailure {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        AppwriteFailure { status, message }
    }

    fn documents_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection
        )
    }

    fn store_error(collection: &str, id: Option<&str>, failure: AppwriteFailure) -> AppError {
        if failure.status == StatusCode::NOT_FOUND {
            return AppError::NotFound(format!(
                "document {} in {}: {}",
                id.unwrap_or("-"),
                collection,
                failure.message
            ));
        }

        AppError::Store(format!(
            "Appwrite returned status {}: {}",
            failure.status, failure.message
        ))
    }
}

fn operator_method(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Equal => "equal",
        FilterOp::NotEqual => "notEqual",
        FilterOp::LessThan => "lessThan",
        FilterOp::LessThanEqual => "lessThanEqual",
        FilterOp::GreaterThan => "greaterThan",
        FilterOp::GreaterThanEqual => "greaterThanEqual",
    }
}

/// Encodes a query as the JSON strings Appwrite expects in `queries[]`
fn encode_queries(query: &DocumentQuery) -> Vec<String> {
    let mut encoded: Vec<String> = query
        .filters
        .iter()
        .map(|filter| {
            json!({
                "method": operator_method(filter.op),
                "attribute": filter.field,
                "values": [filter.value],
            })
            .to_string()
        })
        .collect();

    if let Some(sort) = &query.sort {
        let method = match sort.direction {
            SortDirection::Asc => "orderAsc",
            SortDirection::Desc => "orderDesc",
        };
        encoded.push(json!({ "method": method, "attribute": sort.field }).to_string());
    }

    if let Some(limit) = query.limit {
        encoded.push(json!({ "method": "limit", "values": [limit] }).to_string());
    }

    encoded
}

#[async_trait::async_trait]
impl DocumentStore for AppwriteClient {
    async fn query_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        let params: Vec<(&str, String)> = encode_queries(query)
            .into_iter()
            .map(|q| ("queries[]", q))
            .collect();

        let response = self
            .request(Method::GET, &self.documents_path(collection))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Appwrite request failed: {}", e)))?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            tracing::error!(
                collection = %collection,
                status = %failure.status,
                message = %failure.message,
                "Document query failed"
            );
            return Err(Self::store_error(collection, None, failure));
        }

        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Malformed document list: {}", e)))?;

        tracing::debug!(
            collection = %collection,
            total = list.total,
            returned = list.documents.len(),
            store = "appwrite",
            "Documents queried"
        );

        Ok(list.documents)
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Appwrite request failed: {}", e)))?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            return Err(Self::store_error(collection, Some(id), failure));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Malformed document: {}", e)))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Map<String, Value>,
        permissions: Vec<Permission>,
    ) -> AppResult<Document> {
        let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        let body = json!({
            "documentId": id.to_string(),
            "data": fields,
            "permissions": permissions,
        });

        let response = self
            .request(Method::POST, &self.documents_path(collection))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Appwrite request failed: {}", e)))?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            tracing::error!(
                collection = %collection,
                status = %failure.status,
                message = %failure.message,
                "Document create failed"
            );
            return Err(Self::store_error(collection, None, failure));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Malformed document: {}", e)))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<Document> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        let response = self
            .request(Method::PATCH, &path)
            .json(&json!({ "data": fields }))
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Appwrite request failed: {}", e)))?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            return Err(Self::store_error(collection, Some(id), failure));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Malformed document: {}", e)))
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let path = format!("{}/{}", self.documents_path(collection), id);
        let response = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Appwrite request failed: {}", e)))?;

        if !response.status().is_success() {
            let failure = Self::failure(response).await;
            return Err(Self::store_error(collection, Some(id), failure));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "appwrite"
    }
}
