//! Peek, one-time retrieval and monitoring integration tests.
//!
//! Run with: `cargo test -p clipdrop-api --test downloads_test`

mod helpers;

use bytes::Bytes;
use clipdrop_api::ErrorResponse;
use clipdrop_core::{EntryPreview, StoreStats};
use helpers::{api_path, setup_ok_app};

#[tokio::test]
async fn test_peek_does_not_consume() {
    let app = setup_ok_app(vec![]).await;
    let token = app
        .state
        .store
        .insert("youtube-abc.mp4", Bytes::from(vec![3u8; 1536]))
        .await;

    for _ in 0..2 {
        let response = app
            .client()
            .get(&api_path(&format!("/downloads/{}", token)))
            .await;
        assert_eq!(response.status_code(), 200);
        let preview: EntryPreview = response.json();
        assert_eq!(preview.label, "youtube-abc.mp4");
        assert_eq!(preview.size_bytes, 1536);
        assert_eq!(preview.size_human, "1.5 KB");
    }

    assert_eq!(app.state.store.len().await, 1);
}

#[tokio::test]
async fn test_file_is_served_exactly_once() {
    let app = setup_ok_app(vec![]).await;
    let payload = b"\x00\x00\x00\x18ftypmp42 fake video".to_vec();
    let token = app
        .state
        .store
        .insert("youtube-abc.mp4", Bytes::from(payload.clone()))
        .await;
    let path = api_path(&format!("/downloads/{}/file", token));

    let first = app.client().get(&path).await;
    assert_eq!(first.status_code(), 200);
    assert_eq!(first.header("content-type"), "video/mp4");
    assert_eq!(
        first.header("content-disposition"),
        "attachment; filename=\"youtube-abc.mp4\""
    );
    assert_eq!(
        first.header("content-length"),
        payload.len().to_string().as_str()
    );
    assert_eq!(first.header("cache-control"), "no-store");
    assert_eq!(first.as_bytes().as_ref(), payload.as_slice());

    let second = app.client().get(&path).await;
    assert_eq!(second.status_code(), 404);
    let body: ErrorResponse = second.json();
    assert_eq!(body.code, "NOT_FOUND");
    assert_eq!(body.error, "Download link has expired or was already used");

    let peek = app
        .client()
        .get(&api_path(&format!("/downloads/{}", token)))
        .await;
    assert_eq!(peek.status_code(), 404);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = setup_ok_app(vec![]).await;

    let response = app
        .client()
        .get(&api_path("/downloads/0123456789abcdef0123456789abcdef/file"))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_process_then_download_round_trip() {
    let payload = vec![9u8; 4096];
    let app = setup_ok_app(payload.clone()).await;

    let created = app
        .client()
        .post(&api_path("/process"))
        .json(&serde_json::json!({ "url": "https://youtu.be/dQw4w9WgXcQ" }))
        .await;
    assert_eq!(created.status_code(), 201);
    let download_url = created.json::<serde_json::Value>()["download_url"]
        .as_str()
        .unwrap()
        .to_string();

    let file = app.client().get(&download_url).await;
    assert_eq!(file.status_code(), 200);
    assert_eq!(file.as_bytes().len(), payload.len());
    assert!(app.state.store.is_empty().await);
}

#[tokio::test]
async fn test_stats_show_prefixes_only() {
    let app = setup_ok_app(vec![]).await;
    let token = app
        .state
        .store
        .insert("vimeo-1.mp4", Bytes::from(vec![0u8; 1024 * 1024]))
        .await;

    let response = app.client().get(&api_path("/stats")).await;
    assert_eq!(response.status_code(), 200);
    assert!(!response.text().contains(&token));

    let stats: StoreStats = response.json();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.total_bytes, 1024 * 1024);
    assert_eq!(stats.entries[0].label, "vimeo-1.mp4");
    assert_eq!(stats.entries[0].size_mb, 1.0);
    assert_eq!(stats.entries[0].token_prefix, format!("{}...", &token[..8]));
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_ok_app(vec![]).await;

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: serde_json::Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stored_entries"], 0);

    let live = app.client().get("/health/live").await;
    assert_eq!(live.status_code(), 200);

    let spec = app.client().get(&api_path("/openapi.json")).await;
    assert_eq!(spec.status_code(), 200);
    let spec: serde_json::Value = spec.json();
    assert!(spec["paths"]["/api/v0/downloads/{token}/file"].is_object());
}
