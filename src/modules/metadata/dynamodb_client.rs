//! DynamoDB-compatible metadata store client
//!
//! One item per image in a table whose hash key is the string attribute
//! `id`. Works against AWS DynamoDB and LocalStack alike.

use async_trait::async_trait;
use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::AwsConfig;
use crate::features::images::models::{ImageRecord, ATTR_ID};
use crate::modules::metadata::MetadataStore;
use crate::modules::{StoreError, StoreResult};

/// Upper bound on waiting for a newly created table to become ACTIVE
const TABLE_ACTIVE_TIMEOUT: Duration = Duration::from_secs(60);

/// DynamoDB-backed store for image records
pub struct DynamoDbMetadataStore {
    client: Client,
    table_name: String,
}

impl DynamoDbMetadataStore {
    /// Create a new client from configuration
    pub fn new(config: &AwsConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "image-upload-service",
        );

        let sdk_config = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint.clone())
            .build();

        info!(
            "DynamoDB client initialized for endpoint: {}, table: {}",
            config.endpoint, config.table_name
        );

        Self::from_client(Client::from_conf(sdk_config), config.table_name.clone())
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Ensure the table exists, create it with `id` as hash key if not
    pub async fn ensure_table_exists(&self) -> StoreResult<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                debug!("Table '{}' already exists", self.table_name);
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                debug!("Table '{}' not found, creating it", self.table_name);
            }
            Err(err) => {
                return Err(metadata_error("describe table", &self.table_name, err));
            }
        }

        let key_schema = KeySchemaElement::builder()
            .attribute_name(ATTR_ID)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| StoreError::MetadataStore(format!("Invalid key schema: {}", e)))?;

        let attribute = AttributeDefinition::builder()
            .attribute_name(ATTR_ID)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| {
                StoreError::MetadataStore(format!("Invalid attribute definition: {}", e))
            })?;

        match self
            .client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
        {
            Ok(_) => {
                info!("Table '{}' creation requested", self.table_name);
            }
            // Another instance created it between describe and create
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_in_use_exception()) =>
            {
                debug!("Table '{}' is already being created", self.table_name);
            }
            Err(err) => return Err(metadata_error("create table", &self.table_name, err)),
        }

        // New tables stay CREATING for a while and reject item writes
        self.client
            .wait_until_table_exists()
            .table_name(&self.table_name)
            .wait(TABLE_ACTIVE_TIMEOUT)
            .await
            .map_err(|e| metadata_error("wait for table", &self.table_name, e))?;

        info!("Table '{}' is active", self.table_name);
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for DynamoDbMetadataStore {
    async fn put(&self, record: &ImageRecord) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record.to_item()))
            .send()
            .await
            .map_err(|e| metadata_error("put item", &record.id, e))?;

        debug!("Put record '{}' into table '{}'", record.id, self.table_name);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| metadata_error("get item", id, e))?;

        output.item().map(ImageRecord::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| metadata_error("delete item", id, e))?;

        debug!("Deleted record '{}' from table '{}'", id, self.table_name);
        Ok(())
    }

    async fn scan_all(&self) -> StoreResult<Vec<StoreResult<ImageRecord>>> {
        let mut records = Vec::new();
        let mut exclusive_start_key = None;
        let mut pages = 0usize;

        // A single Scan returns at most 1 MB; follow the cursor to the end
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| metadata_error("scan", &self.table_name, e))?;

            pages += 1;
            records.extend(output.items().iter().map(ImageRecord::try_from));

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(
            "Scanned {} items from table '{}' in {} page(s)",
            records.len(),
            self.table_name,
            pages
        );
        Ok(records)
    }
}

fn metadata_error<E>(action: &str, target: &str, err: E) -> StoreError
where
    E: std::error::Error + 'static,
{
    StoreError::MetadataStore(format!(
        "Failed to {} '{}': {}",
        action,
        target,
        DisplayErrorContext(&err)
    ))
}
