//! HTTP error response conversion
//!
//! This module renders `AppError` as HTTP responses and maps processing failures
//! onto the HTTP taxonomy.
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and use `?`
//! on `AppError` or `ProcessingError` values so every failure renders the same way.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clipdrop_core::{AppError, ErrorMetadata, LogLevel};
use clipdrop_processing::ProcessingError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::friendly::friendly_summary;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from clipdrop-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Classified pipeline failures become client-facing errors. Fetch and download
/// messages get a friendly summary while the raw fetcher output stays in `details`.
impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app_error = match err {
            ProcessingError::FetchInfo { message } => AppError::FetchFailed {
                summary: friendly_summary(&message)
                    .unwrap_or("Could not fetch video info")
                    .to_string(),
                detail: message,
            },
            ProcessingError::Download { message } => AppError::DownloadFailed {
                summary: friendly_summary(&message)
                    .unwrap_or("Video download failed")
                    .to_string(),
                detail: message,
            },
            err @ ProcessingError::SizeLimitExceeded { .. } => {
                AppError::PayloadTooLarge(err.to_string())
            }
            ProcessingError::Internal => AppError::ProcessingFailed,
        };
        HttpAppError(app_error)
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Client-facing body. Details are hidden in production and for sensitive errors.
    pub fn body(&self) -> ErrorResponse {
        let app_error = &self.0;
        let show_details = !is_production_env() && !app_error.is_sensitive();

        ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_gets_friendly_summary_and_raw_detail() {
        let raw = "ERROR: [youtube] abc: Private video. Sign in if you've been granted access";
        let err = HttpAppError::from(ProcessingError::fetch_info(raw));

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let body = err.body();
        assert_eq!(body.code, "FETCH_FAILED");
        assert_eq!(body.error, "This video is private or unavailable");
        assert!(body.details.unwrap().contains("Private video"));
    }

    #[test]
    fn test_unmatched_fetch_failure_uses_generic_summary() {
        let err = HttpAppError::from(ProcessingError::fetch_info("something odd happened"));
        assert_eq!(err.body().error, "Could not fetch video info");
    }

    #[test]
    fn test_size_limit_maps_to_413_with_both_sizes() {
        let err = HttpAppError::from(ProcessingError::SizeLimitExceeded {
            size: 150 * 1024 * 1024,
            max: 100 * 1024 * 1024,
        });
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = err.body();
        assert_eq!(body.code, "PAYLOAD_TOO_LARGE");
        assert!(body.error.contains("150.0 MB"));
        assert!(body.error.contains("100.0 MB"));
    }

    #[test]
    fn test_internal_fault_is_generic_and_hides_details() {
        let err = HttpAppError::from(ProcessingError::Internal);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.code, "PROCESSING_FAILED");
        assert_eq!(body.error, "Processing failed unexpectedly");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_closed_job_limiter_renders_as_internal_error() {
        use anyhow::Context;

        let limiter = tokio::sync::Semaphore::new(1);
        limiter.close();

        let err: HttpAppError = limiter
            .acquire()
            .await
            .context("Job limiter closed")
            .map(|_| ())
            .unwrap_err()
            .into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());
        assert!(err.0.detailed_message().contains("Job limiter closed"));
    }
}
