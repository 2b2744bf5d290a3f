//! Scriptable [`MediaFetcher`] for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::fetcher::{FetchError, MediaFetcher, VideoInfo};

/// What [`FakeFetcher::download`] does with the workspace.
#[derive(Debug, Clone)]
pub enum DownloadBehavior {
    /// Write these `(file name, contents)` pairs
    WriteFiles(Vec<(String, Vec<u8>)>),
    /// Succeed without writing anything
    WriteNothing,
    /// Fail with this message
    Fail(String),
    /// Panic mid-download
    Panic,
}

pub struct FakeFetcher {
    info: Result<VideoInfo, FetchError>,
    download: DownloadBehavior,
    delay: Option<Duration>,
    workspaces: Mutex<Vec<PathBuf>>,
}

impl FakeFetcher {
    /// Reports `info` and downloads `payload` as `video.mp4`.
    pub fn new(info: VideoInfo, payload: Vec<u8>) -> Self {
        Self {
            info: Ok(info),
            download: DownloadBehavior::WriteFiles(vec![("video.mp4".to_string(), payload)]),
            delay: None,
            workspaces: Mutex::new(Vec::new()),
        }
    }

    /// Fails the metadata step with `message`.
    pub fn failing_info(message: impl Into<String>) -> Self {
        Self {
            info: Err(FetchError::new(message)),
            download: DownloadBehavior::WriteNothing,
            delay: None,
            workspaces: Mutex::new(Vec::new()),
        }
    }

    pub fn with_download(mut self, behavior: DownloadBehavior) -> Self {
        self.download = behavior;
        self
    }

    /// Sleep this long inside each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Workspaces passed to `download`, in call order.
    pub fn workspaces(&self) -> Vec<PathBuf> {
        self.workspaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch_info(&self, _url: &str, _format_selector: &str) -> Result<VideoInfo, FetchError> {
        self.pause().await;
        self.info.clone()
    }

    async fn download(
        &self,
        _url: &str,
        _format_selector: &str,
        _merge_format: &str,
        workspace: &Path,
    ) -> Result<(), FetchError> {
        self.workspaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(workspace.to_path_buf());
        self.pause().await;

        match &self.download {
            DownloadBehavior::WriteFiles(files) => {
                for (name, contents) in files {
                    tokio::fs::write(workspace.join(name), contents)
                        .await
                        .map_err(|e| FetchError::new(e.to_string()))?;
                }
                Ok(())
            }
            DownloadBehavior::WriteNothing => Ok(()),
            DownloadBehavior::Fail(message) => Err(FetchError::new(message.clone())),
            DownloadBehavior::Panic => panic!("fake fetcher panicked during download"),
        }
    }
}
