//! Background TTL eviction for the ephemeral store.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::ephemeral::EphemeralStore;

impl EphemeralStore {
    /// Start the background eviction task.
    ///
    /// Sweeps run sequentially inside one task, so they never overlap; a slow
    /// sweep delays the next tick instead of queueing extra ones.
    /// Returns a JoinHandle so the caller can abort it on shutdown.
    pub fn start_evictor(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = self.config().sweep_interval;
            let mut sweep_interval = interval(period);
            sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = period.as_secs(),
                ttl_secs = self.config().ttl.as_secs(),
                "Store evictor started"
            );

            // The first tick completes immediately
            sweep_interval.tick().await;

            loop {
                sweep_interval.tick().await;

                let evicted = self.evict_expired().await;
                if evicted > 0 {
                    let remaining = self.len().await;
                    tracing::info!(evicted, remaining, "Eviction sweep completed");
                } else {
                    tracing::debug!("Eviction sweep found nothing to remove");
                }
            }
        })
    }
}
