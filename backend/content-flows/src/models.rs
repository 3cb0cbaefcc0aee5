//! Wire-facing models for the content workflows.
//!
//! These mirror documents held by the external store; this layer shapes
//! the payloads but does not own their storage. Field names are camelCase
//! on the wire.

use chrono::{DateTime, Utc};
use platform_client::{Document, FileUpload, PlatformError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlowError, Result};

/// A member profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    pub image_url: String,
    /// Empty for profiles still on their initials avatar.
    #[serde(default)]
    pub image_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub creator: String,
    pub caption: String,
    pub image_url: String,
    pub image_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ids of the users who liked this post.
    #[serde(default)]
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved-post join document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPost {
    pub id: String,
    pub user: String,
    pub post: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of posts plus the collection-wide total.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub total: u64,
    pub posts: Vec<Post>,
}

/// Acknowledgement returned by destructive operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Sign-up input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub creator: String,
    pub caption: String,
    pub file: FileUpload,
    pub location: String,
    /// Comma-separated tag list as typed by the user.
    pub tags: Option<String>,
}

/// Input for editing a post. `image_url`/`image_id` carry the post's
/// current image reference; `file` is the optional replacement.
#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub post_id: String,
    pub caption: String,
    pub image_url: String,
    pub image_id: String,
    pub location: String,
    pub tags: Option<String>,
    pub file: Option<FileUpload>,
}

/// Input for editing a profile.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub user_id: String,
    pub name: String,
    pub bio: String,
    pub image_url: String,
    pub image_id: String,
    pub file: Option<FileUpload>,
}

/// Decode a document into a typed model, folding the envelope fields into
/// the payload first.
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T> {
    let Document {
        id,
        created_at,
        updated_at,
        data,
    } = doc;

    let mut map = match data {
        Value::Object(map) => map,
        _ => {
            return Err(FlowError::Document(PlatformError::Malformed(
                "document payload is not an object".to_string(),
            )))
        }
    };
    map.insert("id".to_string(), Value::String(id));
    map.insert(
        "createdAt".to_string(),
        Value::String(created_at.to_rfc3339()),
    );
    map.insert(
        "updatedAt".to_string(),
        Value::String(updated_at.to_rfc3339()),
    );

    serde_json::from_value(Value::Object(map))
        .map_err(|err| FlowError::Document(PlatformError::Malformed(err.to_string())))
}
