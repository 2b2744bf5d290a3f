use crate::state::AppState;
use axum::{extract::State, Json};
use clipdrop_core::StoreStats;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/stats",
    tag = "monitoring",
    responses(
        (status = 200, description = "Ephemeral store snapshot; tokens are truncated", body = StoreStats)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "store_stats"))]
pub async fn store_stats(State(state): State<Arc<AppState>>) -> Json<StoreStats> {
    Json(state.store.stats().await)
}
