//! yt-dlp backed [`MediaFetcher`].

use std::io::ErrorKind;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clipdrop_core::Config;
use tokio::process::Command;

use crate::fetcher::{FetchError, MediaFetcher, VideoInfo};

/// Characters of diagnostic output kept in error messages.
const ERROR_DETAIL_CHARS: usize = 200;

/// Output template; the coordinator looks for `video.*` in the workspace.
pub const OUTPUT_STEM: &str = "video";

/// Validate that a binary path doesn't contain shell metacharacters or dangerous sequences
fn validate_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(anyhow!("Fetcher path is empty"));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    pub binary: String,
    /// Upper bound per invocation; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl From<&Config> for YtDlpConfig {
    fn from(config: &Config) -> Self {
        Self {
            binary: config.ytdlp_path().to_string(),
            timeout: config.fetcher_timeout(),
        }
    }
}

/// Runs yt-dlp as a subprocess for metadata and downloads.
pub struct YtDlpFetcher {
    config: YtDlpConfig,
}

impl YtDlpFetcher {
    pub fn new(config: YtDlpConfig) -> Result<Self> {
        validate_path(&config.binary).map_err(|e| anyhow!("Invalid yt-dlp path: {}", e))?;
        Ok(Self { config })
    }

    async fn run(&self, args: &[&str]) -> Result<Output, FetchError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.config.binary);
        command.args(args).kill_on_drop(true);

        let output = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    FetchError::new(format!(
                        "yt-dlp timed out after {} seconds",
                        limit.as_secs()
                    ))
                })?,
            None => command.output().await,
        }
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FetchError::new(format!(
                    "yt-dlp binary not found at '{}'",
                    self.config.binary
                ))
            } else {
                FetchError::new(format!("Failed to execute yt-dlp: {}", e))
            }
        })?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis(),
            exit_code = ?output.status.code(),
            "yt-dlp exited"
        );

        Ok(output)
    }
}

/// First `ERROR_DETAIL_CHARS` characters of stderr, falling back to stdout.
fn error_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let text = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };

    if text.is_empty() {
        return format!("yt-dlp exited with {}", output.status);
    }
    text.chars().take(ERROR_DETAIL_CHARS).collect()
}

/// Span from the first `{` to the last `}` of `text`, if any.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    #[tracing::instrument(skip(self, format_selector), fields(
        process.executable.name = "yt-dlp",
        process.executable.path = %self.config.binary,
        ytdlp.operation = "info"
    ))]
    async fn fetch_info(&self, url: &str, format_selector: &str) -> Result<VideoInfo, FetchError> {
        let output = self
            .run(&[
                "--dump-json",
                "--no-playlist",
                "--no-warnings",
                "-f",
                format_selector,
                url,
            ])
            .await?;

        if !output.status.success() {
            return Err(FetchError::new(error_detail(&output)));
        }

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let json = json_span(&combined)
            .ok_or_else(|| FetchError::new("yt-dlp returned no video metadata"))?;

        serde_json::from_str::<VideoInfo>(json)
            .map_err(|e| FetchError::new(format!("Failed to parse yt-dlp metadata: {}", e)))
    }

    #[tracing::instrument(skip(self, format_selector), fields(
        process.executable.name = "yt-dlp",
        process.executable.path = %self.config.binary,
        ytdlp.operation = "download"
    ))]
    async fn download(
        &self,
        url: &str,
        format_selector: &str,
        merge_format: &str,
        workspace: &Path,
    ) -> Result<(), FetchError> {
        let template = workspace
            .join(format!("{}.%(ext)s", OUTPUT_STEM))
            .to_string_lossy()
            .into_owned();

        let output = self
            .run(&[
                "-f",
                format_selector,
                "--merge-output-format",
                merge_format,
                "--no-playlist",
                "--no-warnings",
                "--no-progress",
                "-o",
                template.as_str(),
                url,
            ])
            .await?;

        if !output.status.success() {
            return Err(FetchError::new(error_detail(&output)));
        }

        Ok(())
    }
}
