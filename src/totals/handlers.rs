use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use time::Date;
use tracing::{instrument, warn};

use crate::{
    error::{AppError, AppResult},
    localtime,
    state::AppState,
    totals::{repo_types::DailyTotal, services},
};

pub fn daily_total_routes() -> Router<AppState> {
    Router::new()
        .route("/daily_totals/today", get(get_today))
        .route("/daily_totals/:date", get(get_for_date))
        .route("/daily_totals/:date/recompute", post(recompute_date))
}

fn parse_date_param(raw: &str) -> AppResult<Date> {
    localtime::parse_date(raw).ok_or_else(|| {
        warn!(date = raw, "malformed date");
        AppError::InvalidArgument(format!("expected YYYY-MM-DD, got {raw:?}"))
    })
}

#[instrument(skip(state))]
pub async fn get_today(State(state): State<AppState>) -> AppResult<Json<DailyTotal>> {
    let date = localtime::today(state.clock.now());
    let mut conn = state.db.acquire().await?;
    Ok(Json(services::get_total(&mut conn, date).await?))
}

#[instrument(skip(state))]
pub async fn get_for_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<DailyTotal>> {
    let date = parse_date_param(&date)?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(services::get_total(&mut conn, date).await?))
}

#[instrument(skip(state))]
pub async fn recompute_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<DailyTotal>> {
    let date = parse_date_param(&date)?;
    let mut tx = state.db.begin().await?;
    let total = services::recompute(&mut tx, date).await?;
    tx.commit().await?;
    Ok(Json(total))
}
