/// Post workflows - compensating create/update/delete plus the feed reads
use crate::error::{FlowError, Result};
use crate::models::{decode, Ack, NewPost, Post, PostPage, UpdatePost};
use crate::unique_id;
use platform_client::{BlobStorage, DocumentStore, PlatformError, Query};
use saga::Saga;
use std::sync::Arc;

/// Page size for cursor-paginated browsing.
const POSTS_PAGE_SIZE: u32 = 9;
/// How many posts the home timeline shows.
const RECENT_POSTS_LIMIT: u32 = 20;

pub struct PostService {
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn BlobStorage>,
    collection_id: String,
}

impl PostService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStorage>,
        collection_id: &str,
    ) -> Self {
        Self {
            store,
            storage,
            collection_id: collection_id.to_string(),
        }
    }

    /// Create a post: upload the image, derive its preview URL, write the
    /// post document. If either later step fails, the uploaded image is
    /// deleted again before the error surfaces.
    pub async fn create_post(&self, post: NewPost) -> Result<Post> {
        let NewPost {
            creator,
            caption,
            file,
            location,
            tags,
        } = post;

        let uploaded = self
            .storage
            .create_file(&unique_id(), file)
            .await
            .map_err(FlowError::Upload)?;

        let mut saga = Saga::new("create_post");
        {
            let storage = Arc::clone(&self.storage);
            let file_id = uploaded.id.clone();
            saga.push("delete uploaded image", move || async move {
                storage.delete_file(&file_id).await
            });
        }

        let image_url = match self.storage.file_preview_url(&uploaded.id) {
            Ok(url) => url.to_string(),
            Err(err) => {
                saga.unwind().await;
                return Err(FlowError::Preview(err));
            }
        };

        let payload = serde_json::json!({
            "creator": creator,
            "caption": caption,
            "imageUrl": image_url,
            "imageId": uploaded.id,
            "location": location,
            "tags": parse_tags(tags.as_deref()),
        });

        let doc = saga
            .try_step(async {
                self.store
                    .create_document(&self.collection_id, &unique_id(), payload)
                    .await
                    .map_err(FlowError::Document)
            })
            .await?;

        saga.commit();
        tracing::info!(post_id = %doc.id, "post created");
        decode(doc)
    }

    /// Edit a post. A supplied replacement image is uploaded first and
    /// deleted again if the document update fails; once the update lands,
    /// the image it replaced is deleted as best-effort cleanup.
    pub async fn update_post(&self, update: UpdatePost) -> Result<Post> {
        let UpdatePost {
            post_id,
            caption,
            image_url,
            image_id,
            location,
            tags,
            file,
        } = update;

        if post_id.is_empty() {
            return Err(FlowError::Validation("post id is required".to_string()));
        }

        let mut saga: Saga<PlatformError> = Saga::new("update_post");
        let mut image = (image_url, image_id.clone());
        let mut replaced = false;

        if let Some(file) = file {
            let uploaded = self
                .storage
                .create_file(&unique_id(), file)
                .await
                .map_err(FlowError::Upload)?;
            {
                let storage = Arc::clone(&self.storage);
                let file_id = uploaded.id.clone();
                saga.push("delete replacement image", move || async move {
                    storage.delete_file(&file_id).await
                });
            }

            let preview = match self.storage.file_preview_url(&uploaded.id) {
                Ok(url) => url,
                Err(err) => {
                    saga.unwind().await;
                    return Err(FlowError::Preview(err));
                }
            };
            image = (preview.to_string(), uploaded.id.clone());
            replaced = true;
        }

        let payload = serde_json::json!({
            "caption": caption,
            "imageUrl": image.0,
            "imageId": image.1,
            "location": location,
            "tags": parse_tags(tags.as_deref()),
        });

        let doc = saga
            .try_step(async {
                self.store
                    .update_document(&self.collection_id, &post_id, payload)
                    .await
                    .map_err(FlowError::Document)
            })
            .await?;
        saga.commit();

        // The update landed; the image it replaced is now unreferenced.
        if replaced && !image_id.is_empty() {
            if let Err(err) = self.storage.delete_file(&image_id).await {
                tracing::warn!(file_id = %image_id, "replaced image left behind: {}", err);
            }
        }

        decode(doc)
    }

    /// Delete a post, then its image. Both ids are required; with either
    /// missing this is a no-op. A failed image delete leaves an orphaned
    /// blob behind and is only logged; there is no retry path.
    pub async fn delete_post(
        &self,
        post_id: Option<&str>,
        image_id: Option<&str>,
    ) -> Result<Option<Ack>> {
        let (post_id, image_id) = match (post_id, image_id) {
            (Some(post_id), Some(image_id)) if !post_id.is_empty() && !image_id.is_empty() => {
                (post_id, image_id)
            }
            _ => return Ok(None),
        };

        self.store
            .delete_document(&self.collection_id, post_id)
            .await
            .map_err(FlowError::Document)?;

        if let Err(err) = self.storage.delete_file(image_id).await {
            tracing::warn!(file_id = %image_id, "post image left behind: {}", err);
        }

        tracing::info!(%post_id, "post deleted");
        Ok(Some(Ack::ok()))
    }

    /// Replace a post's likes with the given set of user ids.
    pub async fn like_post(&self, post_id: &str, likes: &[String]) -> Result<Post> {
        let doc = self
            .store
            .update_document(
                &self.collection_id,
                post_id,
                serde_json::json!({ "likes": likes }),
            )
            .await
            .map_err(FlowError::Document)?;
        decode(doc)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        if post_id.is_empty() {
            return Err(FlowError::Validation("post id is required".to_string()));
        }
        let doc = self
            .store
            .get_document(&self.collection_id, post_id)
            .await
            .map_err(FlowError::Document)?;
        decode(doc)
    }

    /// Latest posts for the home timeline.
    pub async fn recent_posts(&self) -> Result<Vec<Post>> {
        let page = self
            .store
            .list_documents(
                &self.collection_id,
                &[
                    Query::order_desc("$createdAt"),
                    Query::limit(RECENT_POSTS_LIMIT),
                ],
            )
            .await
            .map_err(FlowError::Document)?;
        page.documents.into_iter().map(decode).collect()
    }

    /// Full-text search over captions.
    pub async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        let page = self
            .store
            .list_documents(&self.collection_id, &[Query::search("caption", term)])
            .await
            .map_err(FlowError::Document)?;
        page.documents.into_iter().map(decode).collect()
    }

    /// One page of the browse feed, most recently updated first.
    pub async fn posts_page(&self, cursor: Option<&str>) -> Result<PostPage> {
        let mut queries = vec![
            Query::order_desc("$updatedAt"),
            Query::limit(POSTS_PAGE_SIZE),
        ];
        if let Some(cursor) = cursor {
            queries.push(Query::cursor_after(cursor));
        }

        let page = self
            .store
            .list_documents(&self.collection_id, &queries)
            .await
            .map_err(FlowError::Document)?;

        Ok(PostPage {
            total: page.total,
            posts: page
                .documents
                .into_iter()
                .map(decode)
                .collect::<Result<_>>()?,
        })
    }

    /// A creator's posts, newest first.
    pub async fn user_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        if user_id.is_empty() {
            return Err(FlowError::Validation("user id is required".to_string()));
        }
        let page = self
            .store
            .list_documents(
                &self.collection_id,
                &[
                    Query::equal("creator", user_id),
                    Query::order_desc("$createdAt"),
                ],
            )
            .await
            .map_err(FlowError::Document)?;
        page.documents.into_iter().map(decode).collect()
    }
}

/// Split a comma-separated tag list into deduplicated tags. Spaces are
/// stripped; empty segments are dropped.
pub(crate) fn parse_tags(tags: Option<&str>) -> Vec<String> {
    let Some(tags) = tags else {
        return Vec::new();
    };

    let mut parsed: Vec<String> = Vec::new();
    for tag in tags.replace(' ', "").split(',') {
        if !tag.is_empty() && !parsed.iter().any(|seen| seen == tag) {
            parsed.push(tag.to_string());
        }
    }
    parsed
}
