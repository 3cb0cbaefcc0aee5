//! In-memory fakes for the platform collaborators, with per-operation
//! failure injection, plus helpers to wire a workflow layer around them.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use content_flows::models::NewPost;
use content_flows::{Collections, ContentFlows};
use platform_client::{
    Account, AccountService, BlobStorage, Document, DocumentPage, DocumentStore, FileUpload,
    PlatformError, Query, Result, Session, StoredFile,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

fn rejected(what: &str) -> PlatformError {
    PlatformError::Api {
        status: 503,
        message: format!("{what} rejected by test flag"),
    }
}

fn not_found(what: &str) -> PlatformError {
    PlatformError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

#[derive(Default)]
pub struct FakeBlobStorage {
    files: Mutex<HashMap<String, usize>>,
    fail_create: AtomicBool,
    fail_preview: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeBlobStorage {
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.files.lock().unwrap().contains_key(file_id)
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_preview(&self, fail: bool) {
        self.fail_preview.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStorage for FakeBlobStorage {
    async fn create_file(&self, file_id: &str, file: FileUpload) -> Result<StoredFile> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(rejected("file write"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(file_id.to_string(), file.bytes.len());
        Ok(StoredFile {
            id: file_id.to_string(),
            name: file.file_name,
        })
    }

    fn file_preview_url(&self, file_id: &str) -> Result<Url> {
        if self.fail_preview.load(Ordering::SeqCst) {
            return Err(PlatformError::Malformed(
                "no preview for this file".to_string(),
            ));
        }
        Url::parse(&format!("https://cdn.test/files/{file_id}/preview"))
            .map_err(PlatformError::from)
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(rejected("file delete"));
        }
        self.files.lock().unwrap().remove(file_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeDocumentStore {
    pub fn count(&self, collection_id: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection_id)
            .map_or(0, Vec::len)
    }

    pub fn data(&self, collection_id: &str, document_id: &str) -> Option<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_id)?
            .iter()
            .find(|doc| doc.id == document_id)
            .map(|doc| doc.data.clone())
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }
}

fn sort_documents(docs: &mut [Document], field: &str, descending: bool) {
    match field {
        "$createdAt" => docs.sort_by_key(|doc| doc.created_at),
        "$updatedAt" => docs.sort_by_key(|doc| doc.updated_at),
        _ => docs.sort_by(|a, b| {
            let left = a.data.get(field).and_then(Value::as_str).unwrap_or("");
            let right = b.data.get(field).and_then(Value::as_str).unwrap_or("");
            left.cmp(right)
        }),
    }
    if descending {
        docs.reverse();
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(rejected("document create"));
        }
        let now = Utc::now();
        let doc = Document {
            id: document_id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_id)
            .and_then(|docs| docs.iter().find(|doc| doc.id == document_id))
            .cloned()
            .ok_or_else(|| not_found("document"))
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Document> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(rejected("document update"));
        }
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection_id)
            .ok_or_else(|| not_found("collection"))?;
        let doc = docs
            .iter_mut()
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| not_found("document"))?;

        if let (Value::Object(existing), Value::Object(update)) = (&mut doc.data, data) {
            for (key, value) in update {
                existing.insert(key, value);
            }
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(rejected("document delete"));
        }
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection_id)
            .ok_or_else(|| not_found("collection"))?;
        let before = docs.len();
        docs.retain(|doc| doc.id != document_id);
        if docs.len() == before {
            return Err(not_found("document"));
        }
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage> {
        let mut docs: Vec<Document> = self
            .collections
            .lock()
            .unwrap()
            .get(collection_id)
            .cloned()
            .unwrap_or_default();

        for query in queries {
            match query {
                Query::Equal(field, value) => docs.retain(|doc| {
                    doc.data.get(field).and_then(Value::as_str) == Some(value.as_str())
                }),
                Query::Search(field, term) => docs.retain(|doc| {
                    doc.data
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.contains(term.as_str()))
                }),
                Query::OrderAsc(field) => sort_documents(&mut docs, field, false),
                Query::OrderDesc(field) => sort_documents(&mut docs, field, true),
                Query::Limit(_) | Query::CursorAfter(_) => {}
            }
        }

        if let Some(Query::CursorAfter(cursor)) = queries
            .iter()
            .find(|query| matches!(query, Query::CursorAfter(_)))
        {
            if let Some(position) = docs.iter().position(|doc| &doc.id == cursor) {
                docs = docs.split_off(position + 1);
            }
        }

        let total = docs.len() as u64;
        if let Some(Query::Limit(limit)) = queries
            .iter()
            .find(|query| matches!(query, Query::Limit(_)))
        {
            docs.truncate(*limit as usize);
        }

        Ok(DocumentPage {
            total,
            documents: docs,
        })
    }
}

#[derive(Default)]
pub struct FakeAccountService {
    accounts: Mutex<Vec<Account>>,
    passwords: Mutex<HashMap<String, String>>,
    current: Mutex<Option<Account>>,
    fail_create: AtomicBool,
}

impl FakeAccountService {
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn has_session(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountService for FakeAccountService {
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(rejected("account create"));
        }
        let account = Account {
            id: account_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        self.passwords
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        Ok(account)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session> {
        let stored = self.passwords.lock().unwrap().get(email).cloned();
        let account = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.email == email)
            .cloned();

        match (stored, account) {
            (Some(stored), Some(account)) if stored == password => {
                *self.current.lock().unwrap() = Some(account.clone());
                Ok(Session {
                    id: format!("session-{}", account.id),
                    account_id: account.id,
                })
            }
            _ => Err(PlatformError::Api {
                status: 401,
                message: "invalid credentials".to_string(),
            }),
        }
    }

    async fn delete_current_session(&self) -> Result<()> {
        self.current
            .lock()
            .unwrap()
            .take()
            .map(|_| ())
            .ok_or_else(|| not_found("session"))
    }

    async fn current_account(&self) -> Result<Account> {
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PlatformError::Api {
                status: 401,
                message: "no active session".to_string(),
            })
    }

    fn initials_avatar_url(&self, name: &str) -> Result<Url> {
        Url::parse(&format!(
            "https://cdn.test/avatars/initials?name={}",
            name.replace(' ', "+")
        ))
        .map_err(PlatformError::from)
    }
}

/// A workflow layer wired to fresh fakes, with the fakes kept reachable
/// for assertions.
pub struct TestWorld {
    pub accounts: Arc<FakeAccountService>,
    pub store: Arc<FakeDocumentStore>,
    pub storage: Arc<FakeBlobStorage>,
    pub flows: ContentFlows,
}

pub fn world() -> TestWorld {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();

    let accounts = Arc::new(FakeAccountService::default());
    let store = Arc::new(FakeDocumentStore::default());
    let storage = Arc::new(FakeBlobStorage::default());
    let collections = Collections {
        users: "users".to_string(),
        posts: "posts".to_string(),
        saves: "saves".to_string(),
    };

    let flows = ContentFlows::new(
        Arc::clone(&accounts) as Arc<dyn AccountService>,
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::clone(&storage) as Arc<dyn BlobStorage>,
        &collections,
    );

    TestWorld {
        accounts,
        store,
        storage,
        flows,
    }
}

pub fn png(name: &str) -> FileUpload {
    FileUpload::new(name, mime::IMAGE_PNG, Bytes::from_static(b"\x89PNG fake"))
}

pub fn new_post(creator: &str, file: FileUpload) -> NewPost {
    NewPost {
        creator: creator.to_string(),
        caption: "golden hour".to_string(),
        file,
        location: "Lisbon".to_string(),
        tags: Some("sunset, beach".to_string()),
    }
}
