//! S3-compatible object store client
//!
//! Stores image payloads in a single bucket using path-style addressing,
//! which LocalStack, MinIO and AWS S3 all accept.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::AwsConfig;
use crate::modules::storage::ObjectStore;
use crate::modules::{StoreError, StoreResult};

/// S3-compatible object store bound to one bucket
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    public_endpoint: String,
}

impl S3ObjectStore {
    /// Create a new client from configuration
    ///
    /// No request is sent here; call [`S3ObjectStore::ensure_bucket_exists`]
    /// to provision the bucket.
    pub fn new(config: &AwsConfig) -> StoreResult<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::ObjectStore(format!("Failed to create S3 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket_name, region.clone(), credentials.clone())
            .map_err(|e| StoreError::ObjectStore(format!("Failed to create S3 bucket: {}", e)))?;

        // http://endpoint/bucket instead of http://bucket.endpoint
        bucket.set_path_style();

        info!(
            "S3 client initialized for endpoint: {}, bucket: {}, public endpoint: {}",
            config.endpoint, config.bucket_name, config.public_endpoint
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            public_endpoint: config.public_endpoint.clone(),
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> StoreResult<()> {
        let name = self.bucket.name();

        match Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", name);
                Ok(())
            }
            // 409 BucketAlreadyOwnedByYou / BucketAlreadyExists
            Ok(response) if response.response_code == 409 => {
                debug!("Bucket '{}' already exists", name);
                Ok(())
            }
            Ok(response) => Err(StoreError::ObjectStore(format!(
                "Failed to create bucket '{}': {} - {}",
                name, response.response_code, response.response_text
            ))),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", name);
                    Ok(())
                } else {
                    warn!("Could not create bucket '{}': {}", name, e);
                    Err(StoreError::ObjectStore(format!(
                        "Failed to create bucket '{}': {}",
                        name, e
                    )))
                }
            }
        }
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StoreResult<String> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| StoreError::ObjectStore(format!("Failed to upload '{}': {}", key, e)))?;

        ensure_success(response.status_code(), "upload", key)?;

        debug!(
            "Uploaded object '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(object_url(&self.public_endpoint, &self.bucket.name(), key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StoreError::ObjectStore(format!("Failed to delete '{}': {}", key, e)))?;

        // S3 answers 204 for missing keys too
        ensure_success(response.status_code(), "delete", key)?;

        debug!(
            "Deleted object '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}

/// Build the client-facing URL of an object (path-style)
pub fn object_url(public_endpoint: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        public_endpoint.trim_end_matches('/'),
        bucket,
        urlencoding::encode(key)
    )
}

fn ensure_success(status: u16, action: &str, key: &str) -> StoreResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StoreError::ObjectStore(format!(
            "Failed to {} '{}': unexpected status {}",
            action, key, status
        )))
    }
}
