use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::images::dtos::MAX_UPLOAD_SIZE;
use crate::features::images::handlers::{delete_image, list_images, upload_image};
use crate::features::images::services::ImageService;

/// Create routes for the images feature
pub fn routes(image_service: Arc<ImageService>) -> Router {
    Router::new()
        .route("/api/images", get(list_images))
        .route("/api/images/{id}", delete(delete_image))
        .route(
            "/api/upload",
            // Oversized files must reach the size check, so leave room for multipart overhead
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .with_state(image_service)
}
