/// Content Flows Library
///
/// The content workflow layer for the Lume social platform: compensating
/// multi-step create/update/delete flows for posts, profiles, and
/// saved-post records, composed from calls against the hosted platform's
/// account, document, and storage services.
///
/// Workflows are sequential chains of suspension points with no shared
/// mutable state; there is no retry, and rollback is approximated by
/// best-effort forward compensation of freshly created blobs.
///
/// # Modules
///
/// - `services`: post/user/save workflow services
/// - `models`: wire-facing data structures
/// - `error`: error types
/// - `config`: configuration management
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{Collections, Config, PlatformConfig};
pub use error::{FlowError, Result};
pub use services::{PostService, SaveService, UserService};

use platform_client::{
    AccountService, BlobStorage, DocumentStore, HttpAccountService, HttpBlobStorage,
    HttpDocumentStore, HttpTransport, PlatformError,
};
use std::sync::Arc;

/// The wired-up workflow layer: one service per content concern, all
/// sharing the injected platform collaborators.
pub struct ContentFlows {
    pub posts: PostService,
    pub users: UserService,
    pub saves: SaveService,
}

impl ContentFlows {
    /// Wire the services to explicit collaborator instances. Tests pass
    /// in-memory fakes here.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStorage>,
        collections: &Collections,
    ) -> Self {
        Self {
            posts: PostService::new(
                Arc::clone(&store),
                Arc::clone(&storage),
                &collections.posts,
            ),
            users: UserService::new(accounts, Arc::clone(&store), storage, &collections.users),
            saves: SaveService::new(store, &collections.saves),
        }
    }

    /// Wire the services to the hosted platform described by `config`.
    pub fn from_config(config: &Config) -> std::result::Result<Self, PlatformError> {
        let transport = Arc::new(HttpTransport::new(
            &config.platform.endpoint,
            &config.platform.project_id,
            &config.platform.api_key,
        )?);

        let accounts: Arc<dyn AccountService> =
            Arc::new(HttpAccountService::new(Arc::clone(&transport)));
        let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(
            Arc::clone(&transport),
            &config.platform.database_id,
        ));
        let storage: Arc<dyn BlobStorage> = Arc::new(HttpBlobStorage::new(
            transport,
            &config.platform.storage_bucket_id,
        ));

        Ok(Self::new(accounts, store, storage, &config.collections))
    }
}

/// Generate a unique id for a new document, file, or account, the way the
/// platform's own SDKs do.
pub(crate) fn unique_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
