use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::images::dtos::{UploadImageDto, DEFAULT_CONTENT_TYPE, MAX_UPLOAD_SIZE};
use crate::features::images::models::ImageRecord;
use crate::features::images::services::ImageService;
use crate::shared::types::ApiResponse;

/// List all images
///
/// Returns every stored image, most recently uploaded first.
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "images",
    responses(
        (status = 200, description = "Images listed successfully", body = ApiResponse<Vec<ImageRecord>>),
        (status = 500, description = "Metadata store unavailable")
    )
)]
pub async fn list_images(
    State(service): State<Arc<ImageService>>,
) -> Result<Json<ApiResponse<Vec<ImageRecord>>>, AppError> {
    let images = service.list_images().await?;

    Ok(Json(ApiResponse::success(Some(images))))
}

/// Upload an image
///
/// Accepts multipart/form-data with:
/// - `file`: The image to upload (required, `image/*`)
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "images",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image upload form",
    ),
    responses(
        (status = 200, description = "Image uploaded successfully", body = ApiResponse<ImageRecord>),
        (status = 400, description = "No file selected, empty file, too large or not an image"),
        (status = 413, description = "Request body exceeds the upload limit"),
        (status = 500, description = "Object or metadata store unavailable")
    )
)]
pub async fn upload_image(
    State(service): State<Arc<ImageService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImageRecord>>, AppError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        // A plain text field named `file` is not a file selection
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            debug!("Ignoring `file` field without a filename");
            continue;
        };

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = field.bytes().await.map_err(multipart_error)?;

        // First file part wins, the rest of the body is not read
        file = Some((data.to_vec(), file_name, content_type));
        break;
    }

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::Validation("No file selected".to_string()))?;

    let record = service
        .upload_image(data, &file_name, &content_type)
        .await?;

    Ok(Json(ApiResponse::success(Some(record))))
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);

    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the maximum size of {} MB",
            MAX_UPLOAD_SIZE / 1024 / 1024
        ))
    } else {
        AppError::BadRequest("Failed to read multipart data".to_string())
    }
}

/// Delete an image
///
/// Removes the payload from the object store, then its record.
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted successfully"),
        (status = 404, description = "Image not found"),
        (status = 500, description = "Object or metadata store unavailable")
    )
)]
pub async fn delete_image(
    State(service): State<Arc<ImageService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.delete_image(&id).await?;

    Ok(Json(ApiResponse::success(None)))
}
