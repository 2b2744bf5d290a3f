//! Minimal HTTP client for the Clipdrop API.

use anyhow::{Context, Result};
use bytes::Bytes;
use clipdrop_core::StoreStats;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const API_PREFIX: &str = "/api/v0";

/// Processing waits on yt-dlp, so requests get a generous timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    url: &'a str,
}

/// Body returned by `POST /api/v0/process`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessResponse {
    pub token: String,
    pub label: String,
    pub size_bytes: u64,
    pub size_human: String,
    pub download_url: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from CLIPDROP_API_URL, falling back to the local default.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("CLIPDROP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path. Paths already carrying the API prefix are kept as is.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with(API_PREFIX) {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}{}", self.base_url, API_PREFIX, path)
        }
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let response = self
            .client
            .get(self.build_url("/stats"))
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(response).await
    }

    pub async fn process(&self, url: &str) -> Result<ProcessResponse> {
        let response = self
            .client
            .post(self.build_url("/process"))
            .json(&ProcessRequest { url })
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(response).await
    }

    /// Fetch a one-time download. The link is spent once this returns.
    pub async fn download(&self, download_url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(self.build_url(download_url))
            .send()
            .await
            .context("Failed to send request")?;
        let response = ensure_success(response).await?;
        response
            .bytes()
            .await
            .context("Failed to read download body")
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(anyhow::anyhow!(
        "API request failed with status {}: {}",
        status,
        error_text
    ))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    ensure_success(response)
        .await?
        .json()
        .await
        .context("Failed to parse response as JSON")
}
