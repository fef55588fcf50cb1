//! Product image upload.

use std::path::Path as FsPath;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use chrono::Utc;
use serde_json::{Value, json};

use tech_hub_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::state::AppState;

const REQUIRED_MESSAGE: &str = "Image file and product_id are required.";
const NOT_FOUND_MESSAGE: &str = "Product not found.";

pub fn router() -> Router<AppState> {
    Router::new().route("/upload-image", post(upload_image))
}

/// Accepts a multipart form with an `image` file and a `product_id` text
/// field, stores the file under the upload directory, and rewrites the
/// product's `image_path`.
///
/// The file hits disk before the database row is updated; a failed update
/// leaves an orphaned file behind. Known gap, tracked in DESIGN.md.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let mut image: Option<(String, axum::body::Bytes)> = None;
    let mut product_id_raw: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name() {
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let data = field.bytes().await.map_err(bad_multipart)?;
                image = Some((filename, data));
            }
            Some("product_id") => {
                product_id_raw = Some(field.text().await.map_err(bad_multipart)?);
            }
            _ => {}
        }
    }

    let (Some((original_name, data)), Some(product_id_raw)) = (image, product_id_raw) else {
        return Err(ApiError::Validation(REQUIRED_MESSAGE.to_string()));
    };

    if original_name.is_empty() {
        return Err(ApiError::Validation("No selected file.".to_string()));
    }

    let product_id = product_id_raw
        .trim()
        .parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    let products = ProductRepository::new(state.pool());
    if products.get_by_id(product_id).await?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let filename = format!(
        "product_{}_{}_{}",
        product_id,
        Utc::now().format("%Y%m%d%H%M%S"),
        sanitize_filename(&original_name)
    );
    let destination = state.config().upload_dir.join(&filename);

    tokio::fs::create_dir_all(&state.config().upload_dir)
        .await
        .map_err(store_error)?;
    tokio::fs::write(&destination, &data)
        .await
        .map_err(store_error)?;

    let image_path = destination.to_string_lossy().into_owned();
    products.set_image_path(product_id, &image_path).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Image uploaded successfully.",
            "image_path": image_path,
        })),
    ))
}

/// Keep only the final path component, with separators stripped.
fn sanitize_filename(name: &str) -> String {
    FsPath::new(name)
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned())
        .replace(['/', '\\'], "_")
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("Invalid multipart request: {e}"))
}

fn store_error(e: std::io::Error) -> ApiError {
    ApiError::Internal(format!("failed to store image: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/photo.png"), "photo.png");
    }
}
