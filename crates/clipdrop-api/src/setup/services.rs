//! Fetcher and state construction

use crate::state::AppState;
use anyhow::{Context, Result};
use clipdrop_core::Config;
use clipdrop_processing::{YtDlpConfig, YtDlpFetcher};
use std::sync::Arc;

/// Build the yt-dlp fetcher and the shared application state.
pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    std::fs::create_dir_all(config.scratch_dir()).with_context(|| {
        format!(
            "Failed to create scratch directory {}",
            config.scratch_dir().display()
        )
    })?;

    let fetcher = YtDlpFetcher::new(YtDlpConfig::from(config))
        .context("Failed to initialize yt-dlp fetcher")?;

    tracing::info!(
        ytdlp_path = %config.ytdlp_path(),
        fetcher_timeout_secs = config.fetcher_timeout().map(|t| t.as_secs()),
        scratch_dir = %config.scratch_dir().display(),
        "Fetcher initialized"
    );

    Ok(AppState::new(config.clone(), Arc::new(fetcher)))
}
