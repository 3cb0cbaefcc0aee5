//! Document-store contract and its HTTPS implementation.
//!
//! Documents are schemaless JSON payloads grouped into named collections.
//! The store owns ids-to-envelope bookkeeping (`$id`, `$createdAt`,
//! `$updatedAt`); callers shape only the payload.

use crate::error::{PlatformError, Result};
use crate::http::HttpTransport;
use crate::wire;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A stored document: envelope metadata plus the caller-shaped payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Value,
}

/// One page of a document listing, with the collection-wide total.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Filter/sort/pagination parameters understood by document listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Equal(String, String),
    Search(String, String),
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
    CursorAfter(String),
}

impl Query {
    pub fn equal(field: &str, value: &str) -> Self {
        Query::Equal(field.to_string(), value.to_string())
    }

    pub fn search(field: &str, term: &str) -> Self {
        Query::Search(field.to_string(), term.to_string())
    }

    pub fn order_asc(field: &str) -> Self {
        Query::OrderAsc(field.to_string())
    }

    pub fn order_desc(field: &str) -> Self {
        Query::OrderDesc(field.to_string())
    }

    pub fn limit(count: u32) -> Self {
        Query::Limit(count)
    }

    pub fn cursor_after(document_id: &str) -> Self {
        Query::CursorAfter(document_id.to_string())
    }

    /// Canonical string form sent to the platform.
    pub fn encode(&self) -> String {
        match self {
            Query::Equal(field, value) => format!(r#"equal("{field}", "{value}")"#),
            Query::Search(field, term) => format!(r#"search("{field}", "{term}")"#),
            Query::OrderAsc(field) => format!(r#"orderAsc("{field}")"#),
            Query::OrderDesc(field) => format!(r#"orderDesc("{field}")"#),
            Query::Limit(count) => format!("limit({count})"),
            Query::CursorAfter(id) => format!(r#"cursorAfter("{id}")"#),
        }
    }
}

/// External document store, grouped into named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document>;

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document>;

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document>;

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<()>;

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage>;
}

/// Document store backed by the platform's databases API.
pub struct HttpDocumentStore {
    transport: Arc<HttpTransport>,
    database_id: String,
}

impl HttpDocumentStore {
    pub fn new(transport: Arc<HttpTransport>, database_id: &str) -> Self {
        Self {
            transport,
            database_id: database_id.to_string(),
        }
    }

    fn documents_path(&self, collection_id: &str) -> String {
        format!(
            "databases/{}/collections/{}/documents",
            self.database_id, collection_id
        )
    }

    fn document_path(&self, collection_id: &str, document_id: &str) -> String {
        format!("{}/{}", self.documents_path(collection_id), document_id)
    }
}

/// Split a raw response into envelope fields and payload.
pub(crate) fn document_from_value(value: Value) -> Result<Document> {
    let mut map = wire::object(value, "document")?;
    let id = wire::string_field(&map, "$id")?;
    let created_at = wire::timestamp_field(&map, "$createdAt")?;
    let updated_at = wire::timestamp_field(&map, "$updatedAt")?;
    map.retain(|key, _| !key.starts_with('$'));
    Ok(Document {
        id,
        created_at,
        updated_at,
        data: Value::Object(map),
    })
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document> {
        let body = serde_json::json!({ "documentId": document_id, "data": data });
        let value = self
            .transport
            .request(
                Method::POST,
                &self.documents_path(collection_id),
                &[],
                Some(&body),
            )
            .await?;
        document_from_value(value)
    }

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document> {
        let value = self
            .transport
            .request(
                Method::GET,
                &self.document_path(collection_id, document_id),
                &[],
                None,
            )
            .await?;
        document_from_value(value)
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document> {
        let body = serde_json::json!({ "data": data });
        let value = self
            .transport
            .request(
                Method::PATCH,
                &self.document_path(collection_id, document_id),
                &[],
                Some(&body),
            )
            .await?;
        document_from_value(value)
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<()> {
        self.transport
            .request(
                Method::DELETE,
                &self.document_path(collection_id, document_id),
                &[],
                None,
            )
            .await?;
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage> {
        let encoded: Vec<String> = queries.iter().map(Query::encode).collect();
        let pairs: Vec<(&str, &str)> = encoded
            .iter()
            .map(|query| ("queries[]", query.as_str()))
            .collect();

        let value = self
            .transport
            .request(
                Method::GET,
                &self.documents_path(collection_id),
                &pairs,
                None,
            )
            .await?;

        let mut map = wire::object(value, "document list")?;
        let total = map
            .get("total")
            .and_then(Value::as_u64)
            .ok_or_else(|| PlatformError::Malformed("missing field total".to_string()))?;
        let items = match map.remove("documents") {
            Some(Value::Array(items)) => items,
            _ => return Err(PlatformError::Malformed("missing documents array".to_string())),
        };

        let documents = items
            .into_iter()
            .map(document_from_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(DocumentPage { total, documents })
    }
}
