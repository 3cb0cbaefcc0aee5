/// Platform Client Library
///
/// Typed contracts for the hosted backend platform the Lume services
/// delegate to (account service, document store, blob storage), plus
/// HTTPS implementations of each, sharing one transport. Workflow code
/// depends on the traits only, so tests run against in-memory fakes.
///
/// # Modules
///
/// - `account`: account/session contract and client
/// - `databases`: document-store contract, query encoding, and client
/// - `storage`: blob-storage contract, preview derivation, and client
/// - `http`: shared transport (headers, timeouts, error decoding)
/// - `error`: error types
pub mod account;
pub mod databases;
pub mod error;
pub mod http;
pub mod storage;

mod wire;

pub use account::{Account, AccountService, HttpAccountService, Session};
pub use databases::{Document, DocumentPage, DocumentStore, HttpDocumentStore, Query};
pub use error::{PlatformError, Result};
pub use http::HttpTransport;
pub use storage::{BlobStorage, FileUpload, HttpBlobStorage, StoredFile};
