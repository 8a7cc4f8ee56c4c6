use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::images::dtos::{is_image_content_type, MAX_UPLOAD_SIZE};
use crate::features::images::models::{storage_key, ImageRecord};
use crate::modules::metadata::MetadataStore;
use crate::modules::storage::ObjectStore;

const UPLOAD_FAILED: &str = "Failed to upload image";
const LIST_FAILED: &str = "Failed to list images";
const DELETE_FAILED: &str = "Failed to delete image";

/// Upload, list and delete workflows over the object and metadata stores
///
/// Payloads are written before metadata and deleted before metadata, so a
/// record never points at a payload that was not stored.
pub struct ImageService {
    object_store: Arc<dyn ObjectStore>,
    metadata_store: Arc<dyn MetadataStore>,
}

impl ImageService {
    pub fn new(object_store: Arc<dyn ObjectStore>, metadata_store: Arc<dyn MetadataStore>) -> Self {
        Self {
            object_store,
            metadata_store,
        }
    }

    /// Store an image payload and its metadata record
    ///
    /// # Arguments
    /// * `data` - The image content as bytes
    /// * `filename` - The original filename
    /// * `content_type` - The MIME type declared by the client
    ///
    /// # Returns
    /// The stored record
    pub async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<ImageRecord> {
        Self::validate_upload(&data, filename, content_type)?;

        let id = Uuid::new_v4().to_string();
        let key = storage_key(&id, filename);
        let size = data.len() as u64;

        let url = self
            .object_store
            .put(&key, data, content_type)
            .await
            .map_err(|e| AppError::dependency(UPLOAD_FAILED, e))?;

        debug!("Image payload stored: {}", key);

        let record = ImageRecord::new(
            id,
            filename.to_string(),
            content_type.to_string(),
            size,
            url,
        );

        if let Err(e) = self.metadata_store.put(&record).await {
            // Roll back the payload so it does not linger without a record
            match self.object_store.delete(&key).await {
                Ok(()) => warn!(
                    "Metadata write failed for {}, payload {} removed",
                    record.id, key
                ),
                Err(cleanup) => error!(
                    "Metadata write failed for {} and payload {} could not be removed: {}",
                    record.id, key, cleanup
                ),
            }
            return Err(AppError::dependency(UPLOAD_FAILED, e));
        }

        info!(
            "Image uploaded: id={}, filename={}, content_type={}, size={}",
            record.id, record.filename, record.content_type, record.size
        );

        Ok(record)
    }

    /// List every image, most recently uploaded first
    ///
    /// Records that cannot be decoded are skipped. Records sharing a
    /// timestamp keep the order in which the store returned them.
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let scanned = self
            .metadata_store
            .scan_all()
            .await
            .map_err(|e| AppError::dependency(LIST_FAILED, e))?;

        let mut images: Vec<ImageRecord> = scanned
            .into_iter()
            .filter_map(|item| match item {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable image record: {}", e);
                    None
                }
            })
            .collect();

        images.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        debug!("Listed {} images", images.len());
        Ok(images)
    }

    /// Delete an image payload and its record
    ///
    /// Returns `NotFound` when no record has this id. If the payload cannot
    /// be removed the record is kept so the delete can be retried.
    pub async fn delete_image(&self, id: &str) -> Result<()> {
        let record = self
            .metadata_store
            .get(id)
            .await
            .map_err(|e| AppError::dependency(DELETE_FAILED, e))?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        let key = record.storage_key();

        self.object_store
            .delete(&key)
            .await
            .map_err(|e| AppError::dependency(DELETE_FAILED, e))?;

        debug!("Image payload deleted: {}", key);

        self.metadata_store
            .delete(&record.id)
            .await
            .map_err(|e| AppError::dependency(DELETE_FAILED, e))?;

        info!("Image deleted: id={}, key={}", record.id, key);

        Ok(())
    }

    fn validate_upload(data: &[u8], filename: &str, content_type: &str) -> Result<()> {
        if data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }

        if filename.trim().is_empty() {
            return Err(AppError::Validation("Filename is required".to_string()));
        }

        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                MAX_UPLOAD_SIZE,
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        if !is_image_content_type(content_type) {
            return Err(AppError::Validation(format!(
                "File type '{}' is not allowed. Only image files can be uploaded",
                content_type
            )));
        }

        Ok(())
    }
}
