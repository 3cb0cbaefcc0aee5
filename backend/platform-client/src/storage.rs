//! Blob-storage contract and its HTTPS implementation.
//!
//! Files are opaque byte payloads stored under caller-generated ids in a
//! configured bucket. Preview URLs are derived locally from a file id; no
//! call is made until something fetches the URL.

use crate::error::{PlatformError, Result};
use crate::http::HttpTransport;
use crate::wire;
use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use reqwest::Method;
use std::sync::Arc;
use url::Url;

/// Fixed preview rendition served for post and profile images.
pub const PREVIEW_WIDTH: u32 = 2000;
pub const PREVIEW_HEIGHT: u32 = 2000;
pub const PREVIEW_GRAVITY: &str = "top";
pub const PREVIEW_QUALITY: u32 = 100;

/// A file payload headed for blob storage.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: &str, content_type: Mime, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type,
            bytes,
        }
    }
}

/// A file accepted by blob storage.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
}

/// External blob storage bound to one bucket.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store the payload under the caller-generated id.
    async fn create_file(&self, file_id: &str, file: FileUpload) -> Result<StoredFile>;

    /// Derive the preview URL for a stored file. Purely local; fails only
    /// when no valid URL can be formed for the id.
    fn file_preview_url(&self, file_id: &str) -> Result<Url>;

    /// Delete a stored file. Deleting an absent file is not an error.
    async fn delete_file(&self, file_id: &str) -> Result<()>;
}

/// Blob storage backed by the platform's storage API.
pub struct HttpBlobStorage {
    transport: Arc<HttpTransport>,
    bucket_id: String,
}

impl HttpBlobStorage {
    pub fn new(transport: Arc<HttpTransport>, bucket_id: &str) -> Self {
        Self {
            transport,
            bucket_id: bucket_id.to_string(),
        }
    }

    fn files_path(&self) -> String {
        format!("storage/buckets/{}/files", self.bucket_id)
    }
}

#[async_trait]
impl BlobStorage for HttpBlobStorage {
    async fn create_file(&self, file_id: &str, file: FileUpload) -> Result<StoredFile> {
        let value = self
            .transport
            .send_bytes(
                Method::POST,
                &self.files_path(),
                &[("fileId", file_id), ("fileName", &file.file_name)],
                &file.content_type,
                file.bytes,
            )
            .await?;

        let map = wire::object(value, "file")?;
        let id = wire::string_field(&map, "$id")?;
        let name = wire::string_field(&map, "name").unwrap_or_else(|_| file.file_name.clone());
        tracing::debug!(%id, "file stored");
        Ok(StoredFile { id, name })
    }

    fn file_preview_url(&self, file_id: &str) -> Result<Url> {
        if file_id.is_empty() {
            return Err(PlatformError::Malformed(
                "cannot derive a preview for an empty file id".to_string(),
            ));
        }

        let mut url = self
            .transport
            .url(&format!("{}/{}/preview", self.files_path(), file_id))?;
        url.query_pairs_mut()
            .append_pair("width", &PREVIEW_WIDTH.to_string())
            .append_pair("height", &PREVIEW_HEIGHT.to_string())
            .append_pair("gravity", PREVIEW_GRAVITY)
            .append_pair("quality", &PREVIEW_QUALITY.to_string())
            .append_pair("project", self.transport.project_id());
        Ok(url)
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let path = format!("{}/{}", self.files_path(), file_id);
        match self
            .transport
            .request(Method::DELETE, &path, &[], None)
            .await
        {
            Ok(_) => Ok(()),
            // Already gone is fine; deletes are how compensation cleans up.
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err),
        }
    }
}
