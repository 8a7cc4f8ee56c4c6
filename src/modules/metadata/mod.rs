//! Metadata storage for image records
//!
//! Provides the `MetadataStore` seam used by the image workflows and its
//! DynamoDB-compatible implementation.

mod dynamodb_client;

use async_trait::async_trait;

use crate::features::images::models::ImageRecord;
use crate::modules::StoreResult;

pub use dynamodb_client::DynamoDbMetadataStore;

/// Record storage keyed by image id
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert or overwrite the record stored under `record.id`
    async fn put(&self, record: &ImageRecord) -> StoreResult<()>;

    /// Fetch one record; `None` when no record has that id
    async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>>;

    /// Remove the record; removing a missing id succeeds
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Read every record in the store, in retrieval order
    ///
    /// Items that cannot be decoded are reported as `Err` entries so the
    /// caller decides whether to skip or fail.
    async fn scan_all(&self) -> StoreResult<Vec<StoreResult<ImageRecord>>>;
}
