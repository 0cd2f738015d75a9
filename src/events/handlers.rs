use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{instrument, warn};

use crate::{
    error::{AppError, AppResult},
    events::{
        dto::{CreateFoodEventRequest, FoodEventResponse},
        services,
    },
    extract::AppJson,
    state::AppState,
};

pub fn food_event_routes() -> Router<AppState> {
    Router::new().route("/food_events", get(list_food_events).post(create_food_event))
}

#[instrument(skip(state, payload), fields(raw_text = %payload.raw_text))]
pub async fn create_food_event(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFoodEventRequest>,
) -> AppResult<(StatusCode, Json<FoodEventResponse>)> {
    let now = state.clock.now();
    let mut tx = state.db.begin().await?;
    let event = match services::ingest(&mut tx, &payload, now).await {
        Ok(e) => e,
        Err(e) => {
            if let AppError::InvalidArgument(ref msg) = e {
                warn!(%msg, "food event rejected");
            }
            return Err(e);
        }
    };
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

#[instrument(skip(state))]
pub async fn list_food_events(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FoodEventResponse>>> {
    let mut conn = state.db.acquire().await?;
    let events = services::list_events(&mut conn).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}
