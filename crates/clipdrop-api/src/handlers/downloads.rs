use crate::constants::DOWNLOAD_EXPIRED_MESSAGE;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use anyhow::Context;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use clipdrop_core::{AppError, EntryPreview};
use clipdrop_storage::token_prefix;
use std::sync::Arc;

fn content_type_for(label: &str) -> &'static str {
    match label.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}

fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound(DOWNLOAD_EXPIRED_MESSAGE.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v0/downloads/{token}",
    tag = "downloads",
    params(
        ("token" = String, Path, description = "One-time download token")
    ),
    responses(
        (status = 200, description = "Stored video label and size", body = EntryPreview),
        (status = 404, description = "Unknown, used or expired token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, token), fields(token = %token_prefix(&token)))]
pub async fn peek_download(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<EntryPreview>, HttpAppError> {
    let preview = state.store.peek(&token).await.ok_or_else(not_found)?;
    Ok(Json(preview))
}

#[utoipa::path(
    get,
    path = "/api/v0/downloads/{token}/file",
    tag = "downloads",
    params(
        ("token" = String, Path, description = "One-time download token")
    ),
    responses(
        (status = 200, description = "Video file; the link is consumed", content_type = "video/mp4"),
        (status = 404, description = "Unknown, used or expired token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, token), fields(token = %token_prefix(&token)))]
pub async fn take_download(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let entry = state.store.take_once(&token).await.ok_or_else(not_found)?;

    let content_disposition = format!(
        "attachment; filename=\"{}\"",
        entry.label.replace(['"', '\\'], "_")
    );
    let size = entry.payload.len();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&entry.label))
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CONTENT_LENGTH, size)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(entry.payload))
        .context("Failed to build download response")?;

    Ok(response)
}
