//! Test helpers: build AppState and router around a scripted fetcher.
//!
//! Run from workspace root: `cargo test -p clipdrop-api`.

use axum_test::TestServer;
use clipdrop_api::constants;
use clipdrop_api::setup::routes;
use clipdrop_api::state::AppState;
use clipdrop_core::{Config, ServiceConfig};
use clipdrop_processing::testing::FakeFetcher;
use clipdrop_processing::VideoInfo;
use std::sync::Arc;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state and the scratch directory it owns.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path())
            .unwrap()
            .next()
            .is_none()
    }
}

/// Metadata the fake fetcher reports for a small YouTube video.
pub fn youtube_info(filesize: Option<f64>) -> VideoInfo {
    VideoInfo {
        extractor: Some("youtube".to_string()),
        id: Some("dQw4w9WgXcQ".to_string()),
        filesize,
        ..Default::default()
    }
}

/// Setup a test app whose pipeline is driven by `fetcher`.
pub async fn setup_test_app(fetcher: FakeFetcher) -> TestApp {
    let scratch = tempfile::tempdir().unwrap();
    let config = Config::new(ServiceConfig {
        scratch_dir: scratch.path().to_path_buf(),
        ..Default::default()
    });

    let state = AppState::new(config.clone(), Arc::new(fetcher));
    let router = routes::setup_routes(&config, state.clone()).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        state,
        scratch,
    }
}

/// Test app whose fetcher succeeds with `payload`.
pub async fn setup_ok_app(payload: Vec<u8>) -> TestApp {
    let size = payload.len() as f64;
    setup_test_app(FakeFetcher::new(youtube_info(Some(size)), payload)).await
}
