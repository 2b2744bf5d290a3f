//! Application state shared by all handlers.

use std::sync::Arc;

use clipdrop_core::Config;
use clipdrop_processing::{CoordinatorConfig, MediaFetcher, ProcessingCoordinator};
use clipdrop_storage::{EphemeralStore, StoreConfig};
use tokio::sync::Semaphore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<EphemeralStore>,
    pub coordinator: Arc<ProcessingCoordinator>,
    /// Admission control for `process` calls
    pub job_limiter: Arc<Semaphore>,
}

impl AppState {
    /// Build the store, coordinator and job limiter around `fetcher`.
    pub fn new(config: Config, fetcher: Arc<dyn MediaFetcher>) -> Arc<Self> {
        let store = Arc::new(EphemeralStore::new(StoreConfig::from(&config)));
        let coordinator = Arc::new(ProcessingCoordinator::new(
            fetcher,
            store.clone(),
            CoordinatorConfig::from(&config),
        ));
        let job_limiter = Arc::new(Semaphore::new(config.max_concurrent_jobs()));

        Arc::new(Self {
            config,
            store,
            coordinator,
            job_limiter,
        })
    }
}
