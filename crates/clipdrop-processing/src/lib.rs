//! Clipdrop Processing Library
//!
//! This crate turns a video URL into a token in the ephemeral store. It provides:
//! - The `MediaFetcher` capability and its yt-dlp subprocess implementation
//! - The processing coordinator (fetch info, size check, download, load, store)
//! - Progress sinks that relay human-readable status strings to the caller
//! - The classified `ProcessingError` taxonomy

pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod label;
pub mod progress;
pub mod ytdlp;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use coordinator::{CoordinatorConfig, ProcessingCoordinator, Stage};
pub use error::{ProcessingError, ProcessingErrorKind};
pub use fetcher::{FetchError, MediaFetcher, VideoInfo};
pub use label::build_label;
pub use progress::{ChannelProgress, FnProgress, NoopProgress, ProgressSink};
pub use ytdlp::{YtDlpConfig, YtDlpFetcher};
