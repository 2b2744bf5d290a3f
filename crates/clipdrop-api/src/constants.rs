//! API constants

/// Versioned prefix for every API route
pub const API_PREFIX: &str = "/api/v0";

/// Message returned when a download token is unknown, consumed or evicted
pub const DOWNLOAD_EXPIRED_MESSAGE: &str = "Download link has expired or was already used";

/// Upper bound for JSON request bodies
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// In-flight HTTP requests across all routes. Processing jobs are further
/// bounded by `MAX_CONCURRENT_JOBS`.
pub const HTTP_CONCURRENCY_LIMIT: usize = 256;

/// Path of the one-time retrieval endpoint for `token`.
pub fn download_path(token: &str) -> String {
    format!("{}/downloads/{}/file", API_PREFIX, token)
}
