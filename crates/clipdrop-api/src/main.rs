use clipdrop_api::setup;
use clipdrop_core::Config;

// Use mimalloc as the global allocator; payloads are large, short-lived buffers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, fetcher, store, routes)
    let (state, router) = setup::initialize_app(config.clone()).await?;

    let evictor = state.store.clone().start_evictor();

    // Start the server
    let result = setup::server::start_server(&config, router).await;

    evictor.abort();
    let remaining_entries = state.store.len().await;
    tracing::info!(remaining_entries, "Store evictor stopped");

    result
}
