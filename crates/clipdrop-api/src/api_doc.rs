//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipdrop_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipdrop API",
        version = "0.1.0",
        description = "Submit a video URL, receive a one-time download link. Stored videos are held in memory and expire after a short TTL. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::process::process_video,
        handlers::process_stream::process_video_stream,
        handlers::downloads::peek_download,
        handlers::downloads::take_download,
        handlers::stats::store_stats,
    ),
    components(schemas(
        handlers::process::ProcessRequest,
        handlers::process::ProcessResponse,
        models::EntryPreview,
        models::EntrySummary,
        models::StoreStats,
        error::ErrorResponse,
    )),
    tags(
        (name = "process", description = "Fetch a video and issue a one-time link"),
        (name = "downloads", description = "Preview and consume one-time links"),
        (name = "monitoring", description = "Ephemeral store visibility")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
