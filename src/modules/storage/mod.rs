//! Object storage for image payloads
//!
//! Provides the `ObjectStore` seam used by the image workflows and its
//! S3-compatible implementation.

mod s3_client;

use async_trait::async_trait;

use crate::modules::StoreResult;

pub use s3_client::S3ObjectStore;

/// Key-addressed binary storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` with `content_type` attached and return the
    /// externally resolvable location of the object
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StoreResult<String>;

    /// Remove the object stored under `key`; removing a missing key succeeds
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
