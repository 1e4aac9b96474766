use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::library::store;
use crate::state::AppState;
use crate::types::{LibraryPageResponse, SyncStatus};

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    pub refresh: Option<String>,
}

/// The library page payload: ensures freshness first, then returns whatever
/// the store holds. A failing or skipped run still yields the stored items,
/// with the outcome attached for a "sync failed" indicator.
pub async fn get_library(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> AppResult<Json<LibraryPageResponse>> {
    let force = query.refresh.as_deref() == Some("1");
    let sync = state.library.ensure_synced(force).await;
    let items = store::find_all(&state.db).await?;
    let status = state.library.status().await;
    Ok(Json(LibraryPageResponse { items, sync, status }))
}

pub async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.library.status().await)
}
