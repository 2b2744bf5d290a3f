use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::format::human_size;

/// Non-destructive view of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntryPreview {
    /// Display filename the payload will be served under
    #[schema(example = "youtube-dQw4w9WgXcQ.mp4")]
    pub label: String,
    pub size_bytes: u64,
    #[schema(example = "12.4 MB")]
    pub size_human: String,
}

impl EntryPreview {
    pub fn new(label: String, size_bytes: u64) -> Self {
        Self {
            label,
            size_human: human_size(size_bytes),
            size_bytes,
        }
    }
}

/// One row of the monitoring snapshot. Carries only a token prefix.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntrySummary {
    #[schema(example = "3f9a1c0b...")]
    pub token_prefix: String,
    pub label: String,
    pub size_mb: f64,
    pub age_seconds: u64,
}

/// Monitoring snapshot of the ephemeral store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StoreStats {
    pub count: usize,
    pub total_bytes: u64,
    pub entries: Vec<EntrySummary>,
}
