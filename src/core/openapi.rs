use utoipa::{Modify, OpenApi};

use crate::features::images::{dtos as images_dtos, handlers as images_handlers, models};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        images_handlers::list_images,
        images_handlers::upload_image,
        images_handlers::delete_image,
    ),
    components(
        schemas(
            models::ImageRecord,
            images_dtos::UploadImageDto,
            ApiResponse<models::ImageRecord>,
            ApiResponse<Vec<models::ImageRecord>>,
        )
    ),
    tags(
        (name = "images", description = "Image upload, listing and deletion"),
    ),
    info(
        title = "Image Upload API",
        version = "0.1.0",
        description = "API documentation for the image upload service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_image_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/images"));
        assert!(doc.paths.paths.contains_key("/api/upload"));
        assert!(doc.paths.paths.contains_key("/api/images/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Images".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Images");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("desc"));
    }
}
