//! Clipdrop API Library
//!
//! This crate provides the HTTP handlers, error rendering and application setup
//! for submitting videos and retrieving them through one-time download links.

// Module declarations
mod api_doc;
pub mod constants;
mod friendly;
mod handlers;
pub mod setup;
mod telemetry;
mod validation;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::process::{ProcessRequest, ProcessResponse};
pub use state::AppState;
