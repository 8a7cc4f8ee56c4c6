//! Clients for the external stores backing the service
//!
//! - `storage`: S3-compatible object store for image payloads
//! - `metadata`: DynamoDB-compatible store for image records

pub mod metadata;
pub mod storage;

use thiserror::Error;

/// Failure reported by one of the external stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object store error: {0}")]
    ObjectStore(String),

    #[error("metadata store error: {0}")]
    MetadataStore(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
