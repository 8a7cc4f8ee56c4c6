use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::StoreError;

/// Metadata of one uploaded image
///
/// Serialized with the same camelCase names both on the wire and as
/// DynamoDB attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Unique identifier assigned at upload
    #[schema(example = "3f2b8c9e-4d1a-4b7e-9c53-1f0e2a6d8b47")]
    pub id: String,
    /// Original filename as uploaded
    #[schema(example = "cat.png")]
    pub filename: String,
    /// MIME type declared by the client
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Payload size in bytes
    pub size: u64,
    /// Upload timestamp (ISO-8601, millisecond precision)
    #[serde(with = "iso8601_millis")]
    #[schema(value_type = String, example = "2024-05-01T12:00:00.123Z")]
    pub uploaded_at: DateTime<Utc>,
    /// Location of the payload in the object store
    pub url: String,
}

impl ImageRecord {
    /// Build a record stamped with the current time
    pub fn new(
        id: String,
        filename: String,
        content_type: String,
        size: u64,
        url: String,
    ) -> Self {
        Self {
            id,
            filename,
            content_type,
            size,
            uploaded_at: now_millis(),
            url,
        }
    }

    /// Key of the payload in the object store
    pub fn storage_key(&self) -> String {
        storage_key(&self.id, &self.filename)
    }

    /// Convert into a DynamoDB item
    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (ATTR_ID.to_string(), AttributeValue::S(self.id.clone())),
            (
                ATTR_FILENAME.to_string(),
                AttributeValue::S(self.filename.clone()),
            ),
            (
                ATTR_CONTENT_TYPE.to_string(),
                AttributeValue::S(self.content_type.clone()),
            ),
            (ATTR_SIZE.to_string(), AttributeValue::N(self.size.to_string())),
            (
                ATTR_UPLOADED_AT.to_string(),
                AttributeValue::S(format_timestamp(&self.uploaded_at)),
            ),
            (ATTR_URL.to_string(), AttributeValue::S(self.url.clone())),
        ])
    }
}

impl TryFrom<&HashMap<String, AttributeValue>> for ImageRecord {
    type Error = StoreError;

    fn try_from(item: &HashMap<String, AttributeValue>) -> Result<Self, Self::Error> {
        let size = number_attr(item, ATTR_SIZE)?
            .parse::<u64>()
            .map_err(|e| StoreError::MalformedRecord(format!("invalid `{}`: {}", ATTR_SIZE, e)))?;

        let uploaded_at = DateTime::parse_from_rfc3339(string_attr(item, ATTR_UPLOADED_AT)?)
            .map_err(|e| {
                StoreError::MalformedRecord(format!("invalid `{}`: {}", ATTR_UPLOADED_AT, e))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: string_attr(item, ATTR_ID)?.to_string(),
            filename: string_attr(item, ATTR_FILENAME)?.to_string(),
            content_type: string_attr(item, ATTR_CONTENT_TYPE)?.to_string(),
            size,
            uploaded_at,
            url: string_attr(item, ATTR_URL)?.to_string(),
        })
    }
}

/// Partition key attribute of the metadata table
pub const ATTR_ID: &str = "id";
const ATTR_FILENAME: &str = "filename";
const ATTR_CONTENT_TYPE: &str = "contentType";
const ATTR_SIZE: &str = "size";
const ATTR_UPLOADED_AT: &str = "uploadedAt";
const ATTR_URL: &str = "url";

/// Object store key for an image: `{id}-{filename}`
pub fn storage_key(id: &str, filename: &str) -> String {
    format!("{}-{}", id, filename)
}

fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn string_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &str,
) -> Result<&'a str, StoreError> {
    item.get(name)
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing `{}`", name)))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| StoreError::MalformedRecord(format!("`{}` is not a string", name)))
}

fn number_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &str,
) -> Result<&'a str, StoreError> {
    item.get(name)
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing `{}`", name)))?
        .as_n()
        .map(String::as_str)
        .map_err(|_| StoreError::MalformedRecord(format!("`{}` is not a number", name)))
}

mod iso8601_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ImageRecord {
        ImageRecord {
            id: "abc".to_string(),
            filename: "cat.png".to_string(),
            content_type: "image/png".to_string(),
            size: 42,
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            url: "http://localhost:4566/images-bucket/abc-cat.png".to_string(),
        }
    }

    #[test]
    fn test_storage_key_joins_id_and_filename() {
        assert_eq!(storage_key("abc", "cat.png"), "abc-cat.png");
        assert_eq!(sample().storage_key(), "abc-cat.png");
    }

    #[test]
    fn test_new_record_has_millisecond_precision() {
        let record = ImageRecord::new(
            "id".to_string(),
            "a.png".to_string(),
            "image/png".to_string(),
            1,
            "url".to_string(),
        );
        assert_eq!(record.uploaded_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_json_uses_camel_case_and_iso_millis() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["contentType"], "image/png");
        assert_eq!(json["uploadedAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["size"], 42);
    }

    #[test]
    fn test_item_conversion_preserves_fields() {
        let record = sample();
        let item = record.to_item();
        assert_eq!(item.get("size").unwrap().as_n().unwrap(), "42");
        assert_eq!(
            item.get("uploadedAt").unwrap().as_s().unwrap(),
            "2024-05-01T12:00:00.000Z"
        );

        let decoded = ImageRecord::try_from(&item).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_item_missing_attribute_is_malformed() {
        let mut item = sample().to_item();
        item.remove("filename");

        let err = ImageRecord::try_from(&item).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord(msg) if msg.contains("filename")));
    }

    #[test]
    fn test_item_with_bad_timestamp_is_malformed() {
        let mut item = sample().to_item();
        item.insert(
            "uploadedAt".to_string(),
            AttributeValue::S("yesterday".to_string()),
        );

        assert!(matches!(
            ImageRecord::try_from(&item),
            Err(StoreError::MalformedRecord(_))
        ));
    }
}
