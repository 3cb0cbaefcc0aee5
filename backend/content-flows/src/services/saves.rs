/// Saved-post workflows - the user/post join records
use crate::error::{FlowError, Result};
use crate::models::{decode, Ack, SavedPost};
use crate::unique_id;
use platform_client::DocumentStore;
use std::sync::Arc;

pub struct SaveService {
    store: Arc<dyn DocumentStore>,
    collection_id: String,
}

impl SaveService {
    pub fn new(store: Arc<dyn DocumentStore>, collection_id: &str) -> Self {
        Self {
            store,
            collection_id: collection_id.to_string(),
        }
    }

    /// Save a post for a user. Single-step; a failure surfaces directly.
    pub async fn save_post(&self, user_id: &str, post_id: &str) -> Result<SavedPost> {
        let payload = serde_json::json!({ "user": user_id, "post": post_id });
        let doc = self
            .store
            .create_document(&self.collection_id, &unique_id(), payload)
            .await
            .map_err(FlowError::Document)?;
        decode(doc)
    }

    /// Remove a saved-post record.
    pub async fn delete_saved_post(&self, save_id: &str) -> Result<Ack> {
        self.store
            .delete_document(&self.collection_id, save_id)
            .await
            .map_err(FlowError::Document)?;
        Ok(Ack::ok())
    }
}
