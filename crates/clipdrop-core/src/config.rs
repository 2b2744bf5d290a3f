//! Configuration module
//!
//! This module provides the startup configuration for the API and the processing
//! pipeline: HTTP settings, store TTL/eviction cadence, payload limits and the
//! external fetcher invocation.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 8080;
const MAX_VIDEO_SIZE_MB: u64 = 100;
const ENTRY_TTL_SECS: u64 = 600;
const EVICTION_INTERVAL_SECS: u64 = 60;
const FETCHER_TIMEOUT_SECS: u64 = 600;
const MAX_CONCURRENT_JOBS: usize = 4;

/// Format-selection expression: best video+audio capped at 720p height, then 720p
/// width (portrait), then the best single file under the same caps, then anything.
pub const DEFAULT_FORMAT_SELECTOR: &str =
    "bestvideo[height<=720]+bestaudio/bestvideo[width<=720]+bestaudio/best[height<=720]/best[width<=720]/best";

/// Container the fetcher is asked to merge streams into.
pub const DEFAULT_MERGE_OUTPUT_FORMAT: &str = "mp4";

/// Base configuration shared by the HTTP surface
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }
}

/// Service configuration: store, pipeline and fetcher settings
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    // Ephemeral store
    pub entry_ttl_secs: u64,
    pub eviction_interval_secs: u64,
    // Processing pipeline
    pub max_video_size_bytes: u64,
    pub format_selector: String,
    pub merge_output_format: String,
    pub scratch_dir: PathBuf,
    pub max_concurrent_jobs: usize,
    // External fetcher
    pub ytdlp_path: String,
    /// Upper bound for a single fetcher invocation. 0 = unbounded.
    pub fetcher_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            entry_ttl_secs: ENTRY_TTL_SECS,
            eviction_interval_secs: EVICTION_INTERVAL_SECS,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            format_selector: DEFAULT_FORMAT_SELECTOR.to_string(),
            merge_output_format: DEFAULT_MERGE_OUTPUT_FORMAT.to_string(),
            scratch_dir: env::temp_dir(),
            max_concurrent_jobs: MAX_CONCURRENT_JOBS,
            ytdlp_path: "yt-dlp".to_string(),
            fetcher_timeout_secs: FETCHER_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    pub fn new(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }

    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().entry_ttl_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.inner().eviction_interval_secs)
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.inner().max_video_size_bytes
    }

    pub fn format_selector(&self) -> &str {
        &self.inner().format_selector
    }

    pub fn merge_output_format(&self) -> &str {
        &self.inner().merge_output_format
    }

    pub fn scratch_dir(&self) -> &PathBuf {
        &self.inner().scratch_dir
    }

    pub fn max_concurrent_jobs(&self) -> usize {
        self.inner().max_concurrent_jobs
    }

    pub fn ytdlp_path(&self) -> &str {
        &self.inner().ytdlp_path
    }

    pub fn fetcher_timeout(&self) -> Option<Duration> {
        match self.inner().fetcher_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl ServiceConfig {
    /// Build the configuration from a key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let max_video_size_mb = parse_or(lookup("MAX_VIDEO_SIZE_MB"), MAX_VIDEO_SIZE_MB);
        let max_video_size_bytes = max_video_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_VIDEO_SIZE_MB ({}) is too large to express in bytes",
                    max_video_size_mb
                )
            })?;

        Ok(ServiceConfig {
            base,
            entry_ttl_secs: parse_or(lookup("ENTRY_TTL_SECS"), ENTRY_TTL_SECS),
            eviction_interval_secs: parse_or(
                lookup("EVICTION_INTERVAL_SECS"),
                EVICTION_INTERVAL_SECS,
            ),
            max_video_size_bytes,
            format_selector: lookup("FORMAT_SELECTOR")
                .unwrap_or_else(|| DEFAULT_FORMAT_SELECTOR.to_string()),
            merge_output_format: lookup("MERGE_OUTPUT_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_MERGE_OUTPUT_FORMAT.to_string()),
            scratch_dir: lookup("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_concurrent_jobs: parse_or(lookup("MAX_CONCURRENT_JOBS"), MAX_CONCURRENT_JOBS),
            ytdlp_path: lookup("YTDLP_PATH").unwrap_or_else(|| "yt-dlp".to_string()),
            fetcher_timeout_secs: parse_or(lookup("FETCHER_TIMEOUT_SECS"), FETCHER_TIMEOUT_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than 0"));
        }

        if self.entry_ttl_secs == 0 {
            return Err(anyhow::anyhow!("ENTRY_TTL_SECS must be greater than 0"));
        }

        if self.eviction_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "EVICTION_INTERVAL_SECS must be greater than 0"
            ));
        }

        if self.eviction_interval_secs > self.entry_ttl_secs {
            return Err(anyhow::anyhow!(
                "EVICTION_INTERVAL_SECS ({}) must not exceed ENTRY_TTL_SECS ({})",
                self.eviction_interval_secs,
                self.entry_ttl_secs
            ));
        }

        if self.format_selector.trim().is_empty() {
            return Err(anyhow::anyhow!("FORMAT_SELECTOR must not be empty"));
        }

        if self.merge_output_format.is_empty()
            || !self
                .merge_output_format
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(anyhow::anyhow!(
                "MERGE_OUTPUT_FORMAT must be a plain container name (e.g. mp4)"
            ));
        }

        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if self.ytdlp_path.trim().is_empty()
            || self.ytdlp_path.chars().any(|c| dangerous_chars.contains(&c))
        {
            return Err(anyhow::anyhow!(
                "YTDLP_PATH must be a plain executable path without shell metacharacters"
            ));
        }

        if self.max_concurrent_jobs == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_JOBS must be greater than 0"));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }
}
