//! Classified processing failures.

use clipdrop_core::human_size;

fn human(bytes: &u64) -> String {
    human_size(*bytes)
}

/// Stable classification of a [`ProcessingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingErrorKind {
    FetchInfo,
    SizeLimitExceeded,
    Download,
    Internal,
}

impl ProcessingErrorKind {
    /// Machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            ProcessingErrorKind::FetchInfo => "FETCH_FAILED",
            ProcessingErrorKind::SizeLimitExceeded => "PAYLOAD_TOO_LARGE",
            ProcessingErrorKind::Download => "DOWNLOAD_FAILED",
            ProcessingErrorKind::Internal => "PROCESSING_FAILED",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessingError {
    /// The fetcher failed or its metadata could not be parsed.
    #[error("Failed to fetch video info: {message}")]
    FetchInfo { message: String },

    /// Reported size is above the configured maximum.
    #[error(
        "Video is too large ({}), maximum allowed is {}",
        human(.size),
        human(.max)
    )]
    SizeLimitExceeded { size: u64, max: u64 },

    /// The download failed or did not leave exactly one output file.
    #[error("Download failed: {message}")]
    Download { message: String },

    /// Unexpected fault; details are only logged.
    #[error("Processing failed unexpectedly")]
    Internal,
}

impl ProcessingError {
    pub fn fetch_info(message: impl Into<String>) -> Self {
        ProcessingError::FetchInfo {
            message: message.into(),
        }
    }

    pub fn download(message: impl Into<String>) -> Self {
        ProcessingError::Download {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ProcessingErrorKind {
        match self {
            ProcessingError::FetchInfo { .. } => ProcessingErrorKind::FetchInfo,
            ProcessingError::SizeLimitExceeded { .. } => ProcessingErrorKind::SizeLimitExceeded,
            ProcessingError::Download { .. } => ProcessingErrorKind::Download,
            ProcessingError::Internal => ProcessingErrorKind::Internal,
        }
    }

    /// Original diagnostic text for optional display.
    pub fn detail(&self) -> Option<String> {
        match self {
            ProcessingError::FetchInfo { message } | ProcessingError::Download { message } => {
                Some(message.clone())
            }
            ProcessingError::SizeLimitExceeded { .. } => Some(self.to_string()),
            ProcessingError::Internal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_message_quotes_both_sizes() {
        let err = ProcessingError::SizeLimitExceeded {
            size: 150 * 1024 * 1024,
            max: 100 * 1024 * 1024,
        };
        let message = err.to_string();
        assert!(message.contains("150.0 MB"), "{message}");
        assert!(message.contains("100.0 MB"), "{message}");
        assert_eq!(err.kind().code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_internal_has_no_detail() {
        let err = ProcessingError::Internal;
        assert_eq!(err.detail(), None);
        assert_eq!(err.kind(), ProcessingErrorKind::Internal);
        assert_eq!(err.to_string(), "Processing failed unexpectedly");
    }

    #[test]
    fn test_fetch_and_download_keep_original_detail() {
        let fetch = ProcessingError::fetch_info("ERROR: Unsupported URL: https://x");
        assert_eq!(fetch.kind(), ProcessingErrorKind::FetchInfo);
        assert_eq!(
            fetch.detail().as_deref(),
            Some("ERROR: Unsupported URL: https://x")
        );

        let download = ProcessingError::download("No output file was produced");
        assert_eq!(download.kind().code(), "DOWNLOAD_FAILED");
        assert!(download.to_string().starts_with("Download failed:"));
    }
}
