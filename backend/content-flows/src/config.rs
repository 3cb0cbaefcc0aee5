//! Configuration management for the content workflows.
//!
//! All ids here are opaque identifiers issued by the hosted platform's
//! console; they are supplied by deployment configuration.

use serde::{Deserialize, Serialize};

/// Main workflow-layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Platform endpoint and credentials
    pub platform: PlatformConfig,
    /// Per-collection ids in the document store
    pub collections: Collections,
}

/// Hosted-platform connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform's REST API
    pub endpoint: String,
    /// Project this deployment belongs to
    pub project_id: String,
    /// Server-side API key
    pub api_key: String,
    /// Database holding the content collections
    pub database_id: String,
    /// Bucket holding post and profile images
    pub storage_bucket_id: String,
}

/// Collection ids for the three content collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collections {
    pub users: String,
    pub posts: String,
    pub saves: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            platform: PlatformConfig {
                endpoint: std::env::var("PLATFORM_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4080/v1".to_string()),
                project_id: std::env::var("PLATFORM_PROJECT_ID")
                    .unwrap_or_else(|_| "lume-dev".to_string()),
                api_key: std::env::var("PLATFORM_API_KEY")
                    .map_err(|_| "PLATFORM_API_KEY must be set".to_string())?,
                database_id: std::env::var("PLATFORM_DATABASE_ID")
                    .unwrap_or_else(|_| "main".to_string()),
                storage_bucket_id: std::env::var("PLATFORM_STORAGE_BUCKET_ID")
                    .unwrap_or_else(|_| "media".to_string()),
            },
            collections: Collections {
                users: std::env::var("USERS_COLLECTION_ID")
                    .unwrap_or_else(|_| "users".to_string()),
                posts: std::env::var("POSTS_COLLECTION_ID")
                    .unwrap_or_else(|_| "posts".to_string()),
                saves: std::env::var("SAVES_COLLECTION_ID")
                    .unwrap_or_else(|_| "saves".to_string()),
            },
        })
    }
}
