use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::AppResult,
    extract::{AppJson, AppQuery},
    nutrition::{
        dto::{
            FillRequest, FillResponse, LookupQuery, LookupResponse, PlaceholderRequest,
            PlaceholderResponse,
        },
        services,
    },
    state::AppState,
};

pub fn nutrition_cache_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition_cache", get(lookup).post(create_placeholder))
        .route("/nutrition_cache/fill", post(fill))
}

#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<LookupQuery>,
) -> AppResult<Json<LookupResponse>> {
    let mut conn = state.db.acquire().await?;
    let entry = services::lookup(&mut conn, &q.item).await?;
    Ok(Json(LookupResponse {
        cached: entry.is_some(),
        entry,
    }))
}

#[instrument(skip(state, payload), fields(item = %payload.item))]
pub async fn create_placeholder(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PlaceholderRequest>,
) -> AppResult<(StatusCode, Json<PlaceholderResponse>)> {
    let now = state.clock.now();
    let mut tx = state.db.begin().await?;
    let created = services::create_placeholder_if_missing(&mut tx, &payload.item, now).await?;
    tx.commit().await?;

    let item = services::normalize_item(&payload.item);
    if created {
        info!(%item, "nutrition placeholder created");
    }
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(PlaceholderResponse { item, created })))
}

/// Fill or correct a cache entry, then recompute every date it touches.
#[instrument(skip(state, payload), fields(item = %payload.item))]
pub async fn fill(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FillRequest>,
) -> AppResult<Json<FillResponse>> {
    let now = state.clock.now();
    let mut tx = state.db.begin().await?;
    let (entry, recomputed_dates) =
        services::fill_and_recompute(&mut tx, &payload.item, &payload.patch(), now).await?;
    tx.commit().await?;

    Ok(Json(FillResponse {
        entry,
        recomputed_dates,
    }))
}
