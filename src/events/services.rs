use sqlx::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::events::{dto::CreateFoodEventRequest, repo, repo_types::FoodEvent};
use crate::localtime;
use crate::nutrition::services::{check_amount, resolve_or_seed};
use crate::totals::services::on_event_ingested;

/// Ingest a food event: resolve its calories through the nutrition cache,
/// persist it and bump the running total of its local date.
///
/// All writes go through `conn`; run it inside a transaction so the event,
/// the cache seed and the total commit or roll back together.
pub async fn ingest(
    conn: &mut SqliteConnection,
    req: &CreateFoodEventRequest,
    now: OffsetDateTime,
) -> AppResult<FoodEvent> {
    let ts = localtime::parse_instant(&req.ts)
        .ok_or_else(|| AppError::InvalidArgument(format!("malformed timestamp {:?}", req.ts)))?;
    let raw_text = req.raw_text.trim();
    if raw_text.is_empty() {
        return Err(AppError::InvalidArgument("raw_text must not be empty".into()));
    }
    check_amount("calories", req.calories)?;

    let resolved = resolve_or_seed(conn, raw_text, req.calories, now).await?;
    if resolved != req.calories {
        debug!(raw_text, submitted = req.calories, resolved, "cached calories override submitted value");
    }

    let event = repo::insert(conn, ts, raw_text, resolved, now).await?;
    let total = on_event_ingested(conn, &event, resolved).await?;

    info!(
        event_id = event.id,
        date = %total.date_local,
        calories = resolved,
        items_count = total.items_count,
        "food event ingested"
    );
    Ok(event)
}

/// All events, most recent timestamp first.
pub async fn list_events(conn: &mut SqliteConnection) -> AppResult<Vec<FoodEvent>> {
    let mut events = repo::list_all(conn).await?;
    // stored timestamp text does not sort chronologically across differing
    // subsecond precision, so order on the decoded values
    events.sort_by(|a, b| b.ts.cmp(&a.ts).then(b.id.cmp(&a.id)));
    Ok(events)
}
