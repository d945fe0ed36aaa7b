//! Request handlers of the HTTP surface.

use std::path::Path;

use axum::{
    Json,
    body::Body,
    extract::{Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{
    ApiError, ImageList, InpaintRequest, InpaintResponse, InpaintTool, PathQuery, router::AppState,
};

/// Extensions listed by `GET /api/list-output`, compared in lowercase.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "IOPaint API is running" }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Runs the inpainting tool.
///
/// `POST /api/iopaint`
///
/// A tool that exits with a non-zero code still yields a 200 response with
/// `success: false`; only failures to run it at all become a 500.
pub async fn run_iopaint<T: InpaintTool>(
    State(state): State<AppState<T>>,
    Json(request): Json<InpaintRequest>,
) -> Result<Json<InpaintResponse>, ApiError> {
    if !path_exists(&request.image_path).await {
        return Err(ApiError::InvalidInput(format!(
            "Image path not found: {}",
            request.image_path
        )));
    }

    if !path_exists(&request.mask_path).await {
        return Err(ApiError::InvalidInput(format!(
            "Mask path not found: {}",
            request.mask_path
        )));
    }

    prepare_output_dir(Path::new(&request.output_path), request.clear_output)
        .await
        .map_err(|e| ApiError::internal("Server error", &e))?;

    let output = state
        .tool()
        .run(&request)
        .await
        .map_err(|e| ApiError::internal("Server error", &e))?;

    if !output.success() {
        log::warn!("IOPaint exited with {:?}", output.code);
    }

    Ok(Json(InpaintResponse::from(output)))
}

/// Lists the images directly inside a directory.
///
/// `GET /api/list-output?path=`
pub async fn list_output(Query(query): Query<PathQuery>) -> Result<Json<ImageList>, ApiError> {
    let images = list_images(Path::new(&query.path))
        .await
        .map_err(|e| ApiError::internal("Error listing images", &e))?;

    Ok(Json(ImageList { images }))
}

/// Streams a file back with a content type guessed from its extension.
///
/// `GET /api/serve-image?path=`
pub async fn serve_image(
    Query(query): Query<PathQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = Path::new(&query.path);
    if !path_exists(path).await {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }
    if status.is_server_error() {
        log::error!("Error serving image {}: {}", path.display(), status);
        return Err(ApiError::Internal(format!(
            "Error serving image: {}",
            status.canonical_reason().unwrap_or("unreadable file")
        )));
    }

    Ok(response.map(Body::new).into_response())
}

/// Unreadable paths count as missing.
async fn path_exists(path: impl AsRef<Path>) -> bool {
    matches!(tokio::fs::try_exists(path).await, Ok(true))
}

/// Removes `dir` first when `clear` is set, then makes sure it exists.
pub async fn prepare_output_dir(dir: &Path, clear: bool) -> std::io::Result<()> {
    if clear && path_exists(dir).await {
        log::debug!("Clearing output directory {}", dir.display());
        tokio::fs::remove_dir_all(dir).await?;
    }
    tokio::fs::create_dir_all(dir).await
}

/// Full paths of the image files directly inside `dir`, sorted. A missing
/// directory has no images.
pub async fn list_images(dir: &Path) -> std::io::Result<Vec<String>> {
    if !path_exists(dir).await {
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        // follows symlinks
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file && is_image(&path) {
            images.push(path.to_string_lossy().into_owned());
        }
    }
    images.sort();

    Ok(images)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_image(path: &Path) -> bool {
    lowercase_extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
