//! Clipdrop Core Library
//!
//! This crate provides configuration, error types, size formatting and the
//! monitoring models shared across all Clipdrop components.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::human_size;
pub use models::{EntryPreview, EntrySummary, StoreStats};
