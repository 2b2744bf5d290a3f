//! Processing coordinator: URL in, store token out.
//!
//! One `process` call runs these stages strictly in sequence, each inside a
//! private scratch workspace:
//!
//! 1. fetch metadata
//! 2. enforce the size limit on the reported size
//! 3. download into the workspace
//! 4. load the single output file into memory
//! 5. insert into the ephemeral store
//!
//! The workspace is removed on every exit path, panics included. Panics inside
//! the pipeline are caught here and surface as [`ProcessingError::Internal`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clipdrop_core::config::{DEFAULT_FORMAT_SELECTOR, DEFAULT_MERGE_OUTPUT_FORMAT};
use clipdrop_core::{human_size, Config};
use clipdrop_storage::{token_prefix, EphemeralStore};
use futures::FutureExt;

use crate::error::ProcessingError;
use crate::fetcher::MediaFetcher;
use crate::label::build_label;
use crate::progress::{emit, ProgressSink};
use crate::ytdlp::OUTPUT_STEM;

const WORKSPACE_PREFIX: &str = "clipdrop-";

/// Settings for the pipeline
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub max_video_size_bytes: u64,
    pub format_selector: String,
    pub merge_output_format: String,
    /// Base directory for per-call scratch workspaces
    pub scratch_dir: PathBuf,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_video_size_bytes: 100 * 1024 * 1024,
            format_selector: DEFAULT_FORMAT_SELECTOR.to_string(),
            merge_output_format: DEFAULT_MERGE_OUTPUT_FORMAT.to_string(),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl From<&Config> for CoordinatorConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_video_size_bytes: config.max_video_size_bytes(),
            format_selector: config.format_selector().to_string(),
            merge_output_format: config.merge_output_format().to_string(),
            scratch_dir: config.scratch_dir().clone(),
        }
    }
}

/// Pipeline stages reported to the progress sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingInfo,
    Downloading,
    Loading,
}

impl Stage {
    pub fn message(&self) -> &'static str {
        match self {
            Stage::FetchingInfo => "Fetching video info...",
            Stage::Downloading => "Downloading...",
            Stage::Loading => "Loading into memory...",
        }
    }
}

pub struct ProcessingCoordinator {
    fetcher: Arc<dyn MediaFetcher>,
    store: Arc<EphemeralStore>,
    config: CoordinatorConfig,
}

impl ProcessingCoordinator {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        store: Arc<EphemeralStore>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<EphemeralStore> {
        &self.store
    }

    /// Turn `url` into a store token, reporting stage changes to `progress`.
    ///
    /// Every progress message is delivered before this returns.
    #[tracing::instrument(skip(self, progress))]
    pub async fn process(
        &self,
        url: &str,
        progress: &dyn ProgressSink,
    ) -> Result<String, ProcessingError> {
        let start = std::time::Instant::now();

        let result = match AssertUnwindSafe(self.run_in_workspace(url, progress))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                tracing::error!(
                    panic = %panic_message(panic.as_ref()),
                    "Processing pipeline panicked"
                );
                Err(ProcessingError::Internal)
            }
        };

        match &result {
            Ok(token) => tracing::info!(
                token = %token_prefix(token),
                duration_ms = start.elapsed().as_millis(),
                "Processing completed"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                error_code = e.kind().code(),
                duration_ms = start.elapsed().as_millis(),
                "Processing failed"
            ),
        }

        result
    }

    async fn run_in_workspace(
        &self,
        url: &str,
        progress: &dyn ProgressSink,
    ) -> Result<String, ProcessingError> {
        let workspace = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&self.config.scratch_dir)
            .with_context(|| {
                format!(
                    "Failed to create scratch workspace in {}",
                    self.config.scratch_dir.display()
                )
            })
            .map_err(internal)?;

        tracing::debug!(workspace = %workspace.path().display(), "Created scratch workspace");

        let result = self.run_stages(url, progress, workspace.path()).await;

        let path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            tracing::warn!(
                error = %e,
                workspace = %path.display(),
                "Failed to remove scratch workspace"
            );
        }

        result
    }

    async fn run_stages(
        &self,
        url: &str,
        progress: &dyn ProgressSink,
        workspace: &Path,
    ) -> Result<String, ProcessingError> {
        let config = &self.config;

        self.enter(Stage::FetchingInfo, progress);
        let info = self
            .fetcher
            .fetch_info(url, &config.format_selector)
            .await
            .map_err(|e| ProcessingError::fetch_info(e.message))?;

        let reported_size = info.reported_size();
        tracing::info!(
            extractor = ?info.extractor,
            id = ?info.id,
            reported_size = %human_size(reported_size),
            "Video info fetched"
        );

        if reported_size > config.max_video_size_bytes {
            return Err(ProcessingError::SizeLimitExceeded {
                size: reported_size,
                max: config.max_video_size_bytes,
            });
        }

        self.enter(Stage::Downloading, progress);
        self.fetcher
            .download(
                url,
                &config.format_selector,
                &config.merge_output_format,
                workspace,
            )
            .await
            .map_err(|e| ProcessingError::download(e.message))?;

        let output = find_output(workspace).await?;

        self.enter(Stage::Loading, progress);
        let payload = tokio::fs::read(&output)
            .await
            .with_context(|| format!("Failed to read downloaded file {}", output.display()))
            .map_err(internal)?;

        let label = build_label(&info, &config.merge_output_format);
        Ok(self.store.insert(label, Bytes::from(payload)).await)
    }

    fn enter(&self, stage: Stage, progress: &dyn ProgressSink) {
        tracing::info!(stage = ?stage, "{}", stage.message());
        emit(progress, stage.message());
    }
}

/// The single `video.*` file the download left in `workspace`.
async fn find_output(workspace: &Path) -> Result<PathBuf, ProcessingError> {
    let prefix = format!("{}.", OUTPUT_STEM);
    let mut matches = Vec::new();

    let mut entries = tokio::fs::read_dir(workspace)
        .await
        .context("Failed to list scratch workspace")
        .map_err(internal)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .context("Failed to list scratch workspace")
        .map_err(internal)?
    {
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            matches.push(entry.path());
        }
    }

    match matches.len() {
        0 => Err(ProcessingError::download(
            "Download finished but no output file was produced",
        )),
        1 => Ok(matches.remove(0)),
        n => Err(ProcessingError::download(format!(
            "Download produced {} output files, expected exactly one",
            n
        ))),
    }
}

/// Log an unexpected fault in full and hide it behind the generic classification.
fn internal(err: anyhow::Error) -> ProcessingError {
    tracing::error!(error = %format!("{:#}", err), "Unexpected processing fault");
    ProcessingError::Internal
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
