use crate::constants::{download_path, DOWNLOAD_EXPIRED_MESSAGE};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::validation::validate_video_url;
use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use clipdrop_core::{AppError, EntryPreview};
use clipdrop_processing::{NoopProgress, ProgressSink};
use clipdrop_storage::token_prefix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Page URL of the video to fetch
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessResponse {
    /// One-time download token
    pub token: String,
    #[schema(example = "youtube-dQw4w9WgXcQ.mp4")]
    pub label: String,
    pub size_bytes: u64,
    #[schema(example = "12.4 MB")]
    pub size_human: String,
    /// Relative URL that serves the video exactly once
    pub download_url: String,
}

impl ProcessResponse {
    fn new(token: String, preview: EntryPreview) -> Self {
        Self {
            download_url: download_path(&token),
            token,
            label: preview.label,
            size_bytes: preview.size_bytes,
            size_human: preview.size_human,
        }
    }
}

/// Validate the request URL, mapping failures to a 400.
pub(crate) fn request_url(request: &ProcessRequest) -> Result<String, HttpAppError> {
    validate_video_url(&request.url).map_err(|e| HttpAppError(AppError::InvalidInput(e)))
}

/// Run one `process` call under the job limiter and describe the stored result.
pub(crate) async fn run_job(
    state: &AppState,
    url: &str,
    progress: &dyn ProgressSink,
) -> Result<ProcessResponse, HttpAppError> {
    let _permit = state
        .job_limiter
        .acquire()
        .await
        .context("Job limiter closed")?;

    let token = state.coordinator.process(url, progress).await?;

    // Only reachable if the entry expired between insert and this lookup
    let preview = state
        .store
        .peek(&token)
        .await
        .ok_or_else(|| AppError::NotFound(DOWNLOAD_EXPIRED_MESSAGE.to_string()))?;

    tracing::info!(
        token = %token_prefix(&token),
        label = %preview.label,
        size_bytes = preview.size_bytes,
        "Video ready for download"
    );

    Ok(ProcessResponse::new(token, preview))
}

#[utoipa::path(
    post,
    path = "/api/v0/process",
    tag = "process",
    request_body = ProcessRequest,
    responses(
        (status = 201, description = "Video stored, one-time link issued", body = ProcessResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 413, description = "Video exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Unexpected processing failure", body = ErrorResponse),
        (status = 502, description = "Fetch or download failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "process_video"))]
pub async fn process_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ProcessRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = request_url(&request)?;
    let response = run_job(&state, &url, &NoopProgress).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
