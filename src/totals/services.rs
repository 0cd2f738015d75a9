use std::collections::{BTreeSet, HashMap};

use sqlx::SqliteConnection;
use time::Date;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::events::{repo as events_repo, repo_types::FoodEvent};
use crate::localtime::{local_date, TZ_LABEL};
use crate::nutrition::{repo as nutrition_repo, repo_types::NutritionEntry, services::normalize_item};
use crate::totals::{repo, repo_types::DailyTotal};

/// Add a freshly ingested event to its local date's total. Only calories and
/// the item count move here; macro sums are left for `recompute`.
pub async fn on_event_ingested(
    conn: &mut SqliteConnection,
    event: &FoodEvent,
    resolved_calories: f64,
) -> AppResult<DailyTotal> {
    let date = local_date(event.ts);
    let total = repo::add_event(conn, date, TZ_LABEL, resolved_calories).await?;
    debug!(%date, calories = total.calories, items_count = total.items_count, "daily total incremented");
    Ok(total)
}

/// Stored total for `date`, or an unsaved zero total when none exists.
pub async fn get_total(conn: &mut SqliteConnection, date: Date) -> AppResult<DailyTotal> {
    Ok(repo::find(conn, date, TZ_LABEL)
        .await?
        .unwrap_or_else(|| DailyTotal::empty(date)))
}

/// Re-derive `date`'s total from every stored event and the current cache.
pub async fn recompute(conn: &mut SqliteConnection, date: Date) -> AppResult<DailyTotal> {
    let events = events_repo::list_all(conn).await?;
    let mut cache = HashMap::new();
    recompute_from(conn, date, &events, &mut cache).await
}

/// Recompute every local date that has an event whose text normalizes to
/// the same key as `text`. Returns the dates touched, ascending.
pub async fn recompute_affected(conn: &mut SqliteConnection, text: &str) -> AppResult<Vec<Date>> {
    let key = normalize_item(text);
    let events = events_repo::list_all(conn).await?;
    let dates: BTreeSet<Date> = events
        .iter()
        .filter(|e| normalize_item(&e.raw_text) == key)
        .map(|e| local_date(e.ts))
        .collect();

    let mut cache = HashMap::new();
    for date in &dates {
        recompute_from(conn, *date, &events, &mut cache).await?;
    }
    Ok(dates.into_iter().collect())
}

async fn recompute_from(
    conn: &mut SqliteConnection,
    date: Date,
    events: &[FoodEvent],
    cache: &mut HashMap<String, Option<NutritionEntry>>,
) -> AppResult<DailyTotal> {
    let mut total = DailyTotal::empty(date);
    for event in events.iter().filter(|e| local_date(e.ts) == date) {
        let key = normalize_item(&event.raw_text);
        if !cache.contains_key(&key) {
            let entry = nutrition_repo::find(conn, &key).await?;
            cache.insert(key.clone(), entry);
        }
        let macros = cache.get(&key).and_then(Option::as_ref);

        total.calories += event.calories;
        total.protein_g += macros.and_then(|m| m.protein_g).unwrap_or(0.0);
        total.carbs_g += macros.and_then(|m| m.carbs_g).unwrap_or(0.0);
        total.fat_g += macros.and_then(|m| m.fat_g).unwrap_or(0.0);
        total.fiber_g += macros.and_then(|m| m.fiber_g).unwrap_or(0.0);
        total.items_count += 1;
    }

    let stored = repo::store(conn, &total).await?;
    info!(%date, items_count = stored.items_count, calories = stored.calories, "daily total recomputed");
    Ok(stored)
}
