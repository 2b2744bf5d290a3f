//! Validation utilities for API handlers

/// Validate a submitted video URL and return it trimmed.
///
/// Only absolute http(s) URLs with a host are accepted; anything else would be
/// handed to the fetcher as an option or a local path.
pub fn validate_video_url(url: &str) -> Result<String, String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("URL is required".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    let parsed = reqwest::Url::parse(url).map_err(|e| format!("Invalid URL format: {}", e))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err("URL must include a host".to_string());
    }

    Ok(url.to_string())
}
