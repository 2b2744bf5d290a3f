//! The external media fetcher capability.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

/// Metadata reported by the fetcher for a single video.
///
/// Only the fields used for labelling and the size check are kept; everything
/// else in the fetcher's JSON is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_id: Option<String>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

impl VideoInfo {
    /// Reported size in bytes: `filesize`, else `filesize_approx`, else 0.
    /// A zero or non-finite value counts as missing.
    pub fn reported_size(&self) -> u64 {
        let usable = |size: &f64| size.is_finite() && *size > 0.0;
        self.filesize
            .filter(usable)
            .or(self.filesize_approx.filter(usable))
            .map(|size| size as u64)
            .unwrap_or(0)
    }
}

/// Failure of a fetcher invocation, carrying the diagnostic text to surface.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Black-box capability that resolves and downloads videos.
///
/// The coordinator depends only on this trait, so the subprocess-backed
/// implementation can be swapped for a fake in tests.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Resolve metadata for `url` without downloading anything.
    async fn fetch_info(&self, url: &str, format_selector: &str) -> Result<VideoInfo, FetchError>;

    /// Download `url` into `workspace` as `video.<ext>`, merged into `merge_format`.
    async fn download(
        &self,
        url: &str,
        format_selector: &str,
        merge_format: &str,
        workspace: &Path,
    ) -> Result<(), FetchError>;
}
