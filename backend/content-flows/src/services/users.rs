/// User workflows - sign-up, sessions, and profile management
use crate::error::{FlowError, Result};
use crate::models::{decode, NewUser, UpdateUser, User};
use crate::unique_id;
use platform_client::{AccountService, BlobStorage, DocumentStore, PlatformError, Query, Session};
use saga::Saga;
use std::sync::Arc;

pub struct UserService {
    accounts: Arc<dyn AccountService>,
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn BlobStorage>,
    collection_id: String,
}

impl UserService {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStorage>,
        collection_id: &str,
    ) -> Self {
        Self {
            accounts,
            store,
            storage,
            collection_id: collection_id.to_string(),
        }
    }

    /// Sign up: register the account, then create its profile document
    /// seeded with an initials avatar.
    ///
    /// An account whose profile write fails stays behind: no session
    /// exists yet that could authorize deleting it.
    pub async fn create_user_account(&self, new_user: NewUser) -> Result<User> {
        let NewUser {
            name,
            email,
            username,
            password,
        } = new_user;

        let account = self
            .accounts
            .create_account(&unique_id(), &email, &password, &name)
            .await
            .map_err(FlowError::Account)?;

        let avatar = self
            .accounts
            .initials_avatar_url(&account.name)
            .map_err(FlowError::Account)?;

        let payload = serde_json::json!({
            "accountId": account.id,
            "name": account.name,
            "email": account.email,
            "username": username,
            "imageUrl": avatar.to_string(),
        });

        let doc = self
            .store
            .create_document(&self.collection_id, &unique_id(), payload)
            .await
            .map_err(FlowError::Document)?;

        tracing::info!(account_id = %account.id, "user signed up");
        decode(doc)
    }

    /// Log in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.accounts
            .create_email_session(email, password)
            .await
            .map_err(FlowError::Account)
    }

    /// Log the current session out.
    pub async fn sign_out(&self) -> Result<()> {
        self.accounts
            .delete_current_session()
            .await
            .map_err(FlowError::Account)
    }

    /// The profile behind the current session, if one exists.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let account = self
            .accounts
            .current_account()
            .await
            .map_err(FlowError::Account)?;

        let page = self
            .store
            .list_documents(
                &self.collection_id,
                &[Query::equal("accountId", &account.id)],
            )
            .await
            .map_err(FlowError::Document)?;

        page.documents.into_iter().next().map(decode).transpose()
    }

    /// Edit a profile. A replacement image follows the same compensation
    /// rules as posts; the previous image is only deleted when the
    /// profile actually had one.
    pub async fn update_user(&self, update: UpdateUser) -> Result<User> {
        let UpdateUser {
            user_id,
            name,
            bio,
            image_url,
            image_id,
            file,
        } = update;

        if user_id.is_empty() {
            return Err(FlowError::Validation("user id is required".to_string()));
        }

        let mut saga: Saga<PlatformError> = Saga::new("update_user");
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
            "name": name,
            "bio": bio,
            "imageUrl": image.0,
            "imageId": image.1,
        });

        let doc = saga
            .try_step(async {
                self.store
                    .update_document(&self.collection_id, &user_id, payload)
                    .await
                    .map_err(FlowError::Document)
            })
            .await?;
        saga.commit();

        // Profiles created at sign-up carry an initials avatar and no
        // stored image; only delete when there was one to replace.
        if replaced && !image_id.is_empty() {
            if let Err(err) = self.storage.delete_file(&image_id).await {
                tracing::warn!(file_id = %image_id, "replaced avatar left behind: {}", err);
            }
        }

        decode(doc)
    }

    /// Member directory, newest first.
    pub async fn get_users(&self, limit: Option<u32>) -> Result<Vec<User>> {
        let mut queries = vec![Query::order_desc("$createdAt")];
        if let Some(limit) = limit {
            queries.push(Query::limit(limit));
        }

        let page = self
            .store
            .list_documents(&self.collection_id, &queries)
            .await
            .map_err(FlowError::Document)?;
        page.documents.into_iter().map(decode).collect()
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User> {
        if user_id.is_empty() {
            return Err(FlowError::Validation("user id is required".to_string()));
        }
        let doc = self
            .store
            .get_document(&self.collection_id, user_id)
            .await
            .map_err(FlowError::Document)?;
        decode(doc)
    }
}
