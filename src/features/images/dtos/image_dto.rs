use utoipa::ToSchema;

/// Upload image request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Maximum image size in bytes (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Content type assumed when the client does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Check that a MIME type is `image/<subtype>`
///
/// Parameters such as `; charset=...` are ignored.
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some((kind, subtype)) => {
            kind.eq_ignore_ascii_case("image")
                && !subtype.is_empty()
                && !subtype.contains(char::is_whitespace)
        }
        None => false,
    }
}
