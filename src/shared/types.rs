use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope for every JSON response
///
/// `data` is omitted on failure and `error` is omitted on success.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_without_data_serializes_flag_only() {
        let json = serde_json::to_string(&ApiResponse::<()>::success(None)).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_error_omits_data() {
        let json = serde_json::to_string(&ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"nope"}"#);
    }
}
