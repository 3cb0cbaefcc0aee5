//! Shared HTTPS transport for the hosted platform's REST API.
//!
//! One transport is constructed per deployment and shared by the account,
//! document-store, and blob-storage clients. It owns the connection pool,
//! the project/key headers, and the decoding of platform error bodies.

use crate::error::{PlatformError, Result};
use bytes::Bytes;
use mime::Mime;
use reqwest::{header, Client as HttpClient, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Request timeout applied to every platform call. A timed-out call fails
/// that single step; nothing at this layer retries.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const PROJECT_HEADER: &str = "X-Platform-Project";
const KEY_HEADER: &str = "X-Platform-Key";

/// HTTP transport bound to one platform deployment.
pub struct HttpTransport {
    client: HttpClient,
    endpoint: Url,
    project_id: String,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport for the given endpoint and project credentials.
    pub fn new(endpoint: &str, project_id: &str, api_key: &str) -> Result<Self> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let mut base = endpoint.trim_end_matches('/').to_string();
        base.push('/');
        let endpoint = Url::parse(&base)?;

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        tracing::info!(endpoint = %endpoint, project = %project_id, "platform transport initialized");

        Ok(Self {
            client,
            endpoint,
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Resolve a path relative to the configured endpoint.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.endpoint.join(path)?)
    }

    /// Send a JSON request and decode the JSON response body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        self.decode(request.send().await?).await
    }

    /// Send a raw byte payload (file upload) and decode the JSON response.
    pub async fn send_bytes(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        content_type: &Mime,
        payload: Bytes,
    ) -> Result<Value> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let response = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, content_type.to_string())
            .body(payload)
            .send()
            .await?;

        self.decode(response).await
    }

    async fn decode(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| PlatformError::Malformed(err.to_string()))
    }
}

/// Error body shape returned by the platform on non-success statuses.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}
