//! Token-addressed ephemeral store.
//!
//! Entries are immutable once inserted and leave the store through exactly one
//! of two paths: a successful [`EphemeralStore::take_once`], or the evictor once
//! the entry is older than the TTL. Every removal happens under the write lock
//! with a single `HashMap::remove`, so a take racing another take (or a sweep)
//! has exactly one winner.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use clipdrop_core::{Config, EntryPreview, EntrySummary, StoreStats};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::token::{generate_token, token_prefix};

/// Default TTL for unclaimed entries (10 minutes)
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Default interval between eviction sweeps (1 minute)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Configuration for the ephemeral store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum age of an unclaimed entry
    pub ttl: Duration,

    /// Interval between eviction sweeps
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl From<&Config> for StoreConfig {
    fn from(config: &Config) -> Self {
        Self {
            ttl: config.entry_ttl(),
            sweep_interval: config.eviction_interval(),
        }
    }
}

#[derive(Debug)]
struct StoreEntry {
    label: String,
    payload: Bytes,
    created_at: Instant,
}

impl StoreEntry {
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}

/// Payload handed to the single winner of [`EphemeralStore::take_once`].
#[derive(Debug, Clone)]
pub struct TakenEntry {
    pub label: String,
    pub payload: Bytes,
}

/// Concurrent-safe in-memory store mapping one-time tokens to video payloads.
pub struct EphemeralStore {
    config: StoreConfig,
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl EphemeralStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Store a payload under a freshly generated token and return the token.
    pub async fn insert(&self, label: impl Into<String>, payload: Bytes) -> String {
        let label = label.into();
        let size = payload.len();

        let mut entries = self.entries.write().await;
        let mut token = generate_token();
        while entries.contains_key(&token) {
            token = generate_token();
        }
        entries.insert(
            token.clone(),
            StoreEntry {
                label: label.clone(),
                payload,
                created_at: Instant::now(),
            },
        );
        let count = entries.len();
        drop(entries);

        tracing::info!(
            token = %token_prefix(&token),
            label = %label,
            size_bytes = size,
            entries = count,
            "Stored video"
        );

        token
    }

    /// Atomically remove and return the entry for `token`.
    ///
    /// At most one caller ever receives a given entry; every later call (and every
    /// racing loser) gets `None`.
    pub async fn take_once(&self, token: &str) -> Option<TakenEntry> {
        let entry = self.entries.write().await.remove(token)?;

        tracing::info!(
            token = %token_prefix(token),
            label = %entry.label,
            size_bytes = entry.payload.len(),
            age_secs = entry.age(Instant::now()).as_secs(),
            "Video taken"
        );

        Some(TakenEntry {
            label: entry.label,
            payload: entry.payload,
        })
    }

    /// Label and size of an entry without consuming it.
    pub async fn peek(&self, token: &str) -> Option<EntryPreview> {
        let entries = self.entries.read().await;
        entries
            .get(token)
            .map(|entry| EntryPreview::new(entry.label.clone(), entry.payload.len() as u64))
    }

    /// Monitoring snapshot. Tokens are truncated to a display prefix.
    pub async fn stats(&self) -> StoreStats {
        let now = Instant::now();
        let entries = self.entries.read().await;

        let mut summaries: Vec<(Duration, EntrySummary)> = entries
            .iter()
            .map(|(token, entry)| {
                let age = entry.age(now);
                (
                    age,
                    EntrySummary {
                        token_prefix: token_prefix(token),
                        label: entry.label.clone(),
                        size_mb: clipdrop_core::format::mebibytes(entry.payload.len() as u64),
                        age_seconds: age.as_secs(),
                    },
                )
            })
            .collect();
        summaries.sort_by(|a, b| b.0.cmp(&a.0));

        StoreStats {
            count: entries.len(),
            total_bytes: entries.values().map(|e| e.payload.len() as u64).sum(),
            entries: summaries.into_iter().map(|(_, summary)| summary).collect(),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every entry older than the TTL and return how many were evicted.
    ///
    /// Candidates are collected under the read lock; each one is then removed under
    /// its own short write lock after re-checking that it is still present and
    /// still expired, so a concurrent `take_once` either wins outright or finds
    /// nothing.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.ttl;

        let candidates: Vec<String> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|(_, entry)| entry.is_expired(now, ttl))
                .map(|(token, _)| token.clone())
                .collect()
        };

        let mut evicted = 0;
        for token in candidates {
            let removed = {
                let mut entries = self.entries.write().await;
                match entries.get(&token) {
                    Some(entry) if entry.is_expired(now, ttl) => entries.remove(&token),
                    _ => None,
                }
            };

            if let Some(entry) = removed {
                evicted += 1;
                tracing::info!(
                    token = %token_prefix(&token),
                    label = %entry.label,
                    size_bytes = entry.payload.len(),
                    age_secs = entry.age(now).as_secs(),
                    "Evicted expired video"
                );
            }
        }

        evicted
    }
}

impl Default for EphemeralStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_with_ttl(ttl_secs: u64) -> EphemeralStore {
        EphemeralStore::new(StoreConfig {
            ttl: Duration::from_secs(ttl_secs),
            sweep_interval: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let store = EphemeralStore::default();
        assert!(store.take_once("does-not-exist").await.is_none());
        assert!(store.peek("does-not-exist").await.is_none());
    }

    #[tokio::test]
    async fn test_take_once_returns_payload_exactly_once() {
        let store = EphemeralStore::default();
        let token = store
            .insert("youtube-abc.mp4", Bytes::from_static(b"video-bytes"))
            .await;

        let taken = store.take_once(&token).await.expect("first take succeeds");
        assert_eq!(taken.label, "youtube-abc.mp4");
        assert_eq!(&taken.payload[..], b"video-bytes");

        assert!(store.take_once(&token).await.is_none());
        assert!(store.peek(&token).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_peek_reports_size_and_does_not_consume() {
        let store = EphemeralStore::default();
        let token = store.insert("vimeo-42.mp4", Bytes::from(vec![7u8; 2048])).await;

        for _ in 0..3 {
            let preview = store.peek(&token).await.expect("entry present");
            assert_eq!(preview.label, "vimeo-42.mp4");
            assert_eq!(preview.size_bytes, 2048);
            assert_eq!(preview.size_human, "2.0 KB");
        }

        assert!(store.take_once(&token).await.is_some());
    }

    #[tokio::test]
    async fn test_insert_generates_distinct_tokens() {
        let store = EphemeralStore::default();
        let a = store.insert("a.mp4", Bytes::from_static(b"a")).await;
        let b = store.insert("a.mp4", Bytes::from_static(b"a")).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_take_has_single_winner() {
        let store = Arc::new(EphemeralStore::default());
        let token = store.insert("race.mp4", Bytes::from_static(b"payload")).await;

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                let token = token.clone();
                tokio::spawn(async move { store.take_once(&token).await.is_some() })
            })
            .collect();

        let winners = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.expect("task completes"))
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert!(store.take_once(&token).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_removes_only_entries_older_than_ttl() {
        let store = store_with_ttl(600);
        let old = store.insert("old.mp4", Bytes::from_static(b"old")).await;

        tokio::time::advance(Duration::from_secs(400)).await;
        let young = store.insert("young.mp4", Bytes::from_static(b"young")).await;

        tokio::time::advance(Duration::from_secs(201)).await;
        assert_eq!(store.evict_expired().await, 1);

        assert!(store.peek(&old).await.is_none());
        assert!(store.peek(&young).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_at_exact_ttl_is_kept() {
        let store = store_with_ttl(600);
        let token = store.insert("edge.mp4", Bytes::from_static(b"edge")).await;

        tokio::time::advance(Duration::from_secs(600)).await;
        assert_eq!(store.evict_expired().await, 0);
        assert!(store.peek(&token).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_peek_does_not_refresh_age() {
        let store = store_with_ttl(60);
        let token = store.insert("stale.mp4", Bytes::from_static(b"x")).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(store.peek(&token).await.is_some());
        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(store.evict_expired().await, 1);
        assert!(store.take_once(&token).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_never_expose_full_tokens() {
        let store = store_with_ttl(600);
        let first = store.insert("one.mp4", Bytes::from(vec![0u8; 1024 * 1024])).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = store.insert("two.mp4", Bytes::from(vec![0u8; 512])).await;

        let stats = store.stats().await;
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_bytes, 1024 * 1024 + 512);

        // Oldest first
        assert_eq!(stats.entries[0].label, "one.mp4");
        assert_eq!(stats.entries[0].age_seconds, 30);
        assert_eq!(stats.entries[0].size_mb, 1.0);
        assert_eq!(stats.entries[1].age_seconds, 0);

        let rendered = format!("{:?}", stats);
        assert!(!rendered.contains(&first));
        assert!(!rendered.contains(&second));
        for entry in &stats.entries {
            assert!(entry.token_prefix.len() < first.len());
        }
    }
}
