//! Error types for the content workflows.

use platform_client::PlatformError;
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// What failed, by workflow step. Callers can tell a rejected upload from
/// a failed preview derivation from a document-store refusal without
/// re-deriving it from an empty result.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Blob storage rejected a file write
    #[error("upload rejected: {0}")]
    Upload(#[source] PlatformError),

    /// No preview URL could be derived for an uploaded file
    #[error("preview derivation failed: {0}")]
    Preview(#[source] PlatformError),

    /// The document store rejected a create/update/delete/list
    #[error("document operation failed: {0}")]
    Document(#[source] PlatformError),

    /// The account service rejected an account or session operation
    #[error("account operation failed: {0}")]
    Account(#[source] PlatformError),

    /// Required input was missing or unusable before any call went out
    #[error("invalid input: {0}")]
    Validation(String),
}
