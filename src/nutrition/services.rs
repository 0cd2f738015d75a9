use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqliteConnection;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::nutrition::{
    repo,
    repo_types::{NutritionEntry, NutritionPatch},
};
use crate::totals::services::recompute_affected;

/// Cache key for a piece of food text: trimmed, whitespace collapsed, lowercased.
pub fn normalize_item(text: &str) -> String {
    lazy_static! {
        static ref WS_RE: Regex = Regex::new(r"\s+").unwrap();
    }
    WS_RE.replace_all(text.trim(), " ").to_lowercase()
}

pub(crate) fn check_amount(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

fn check_item(text: &str) -> AppResult<String> {
    let key = normalize_item(text);
    if key.is_empty() {
        return Err(AppError::InvalidArgument("item must not be empty".into()));
    }
    Ok(key)
}

pub async fn lookup(conn: &mut SqliteConnection, text: &str) -> AppResult<Option<NutritionEntry>> {
    Ok(repo::find(conn, &normalize_item(text)).await?)
}

/// Calories to record for an event with this text. A cached calorie value
/// wins over the submitted one; otherwise the submitted value seeds the cache.
pub async fn resolve_or_seed(
    conn: &mut SqliteConnection,
    text: &str,
    submitted_calories: f64,
    now: OffsetDateTime,
) -> AppResult<f64> {
    let key = check_item(text)?;
    check_amount("calories", submitted_calories)?;

    let seed = NutritionPatch {
        calories: Some(submitted_calories),
        ..NutritionPatch::default()
    };
    match repo::find(conn, &key).await? {
        Some(NutritionEntry {
            calories: Some(cached),
            ..
        }) => Ok(cached),
        Some(_) => {
            // placeholder without calories yet
            repo::apply_patch(conn, &key, &seed, now).await?;
            debug!(item = %key, calories = submitted_calories, "seeded placeholder calories");
            Ok(submitted_calories)
        }
        None => {
            repo::insert(conn, &key, &seed, now).await?;
            debug!(item = %key, calories = submitted_calories, "seeded nutrition cache");
            Ok(submitted_calories)
        }
    }
}

/// Register a text with zeroed macros and unknown calories. Idempotent;
/// returns whether a new entry was created.
pub async fn create_placeholder_if_missing(
    conn: &mut SqliteConnection,
    text: &str,
    now: OffsetDateTime,
) -> AppResult<bool> {
    let key = check_item(text)?;
    let zeroed = NutritionPatch {
        calories: None,
        protein_g: Some(0.0),
        carbs_g: Some(0.0),
        fat_g: Some(0.0),
        fiber_g: Some(0.0),
    };
    Ok(repo::insert_if_missing(conn, &key, &zeroed, now).await?)
}

/// Overwrite the supplied fields of an existing entry.
pub async fn fill(
    conn: &mut SqliteConnection,
    text: &str,
    patch: &NutritionPatch,
    now: OffsetDateTime,
) -> AppResult<NutritionEntry> {
    let key = check_item(text)?;
    for (field, value) in patch.fields() {
        if let Some(v) = value {
            check_amount(field, v)?;
        }
    }
    repo::apply_patch(conn, &key, patch, now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no cached nutrition for {key:?}")))
}

/// `fill`, then recompute every local date that has an event with this text.
pub async fn fill_and_recompute(
    conn: &mut SqliteConnection,
    text: &str,
    patch: &NutritionPatch,
    now: OffsetDateTime,
) -> AppResult<(NutritionEntry, Vec<Date>)> {
    let entry = fill(conn, text, patch, now).await?;
    let dates = recompute_affected(conn, &entry.item).await?;
    info!(item = %entry.item, dates = dates.len(), "nutrition cache filled");
    Ok((entry, dates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2024-01-01 09:00 UTC);
    const T1: OffsetDateTime = datetime!(2024-01-05 18:30 UTC);

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_item("  Greek   Yogurt\t"), "greek yogurt");
        assert_eq!(normalize_item("apple"), "apple");
        assert_eq!(normalize_item(" \n "), "");
    }

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        assert!(check_amount("calories", 0.0).is_ok());
        assert!(check_amount("calories", -0.5).is_err());
        assert!(check_amount("fat_g", f64::NAN).is_err());
        assert!(check_amount("fat_g", f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn resolve_or_seed_is_sticky_after_first_sighting() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        assert!(lookup(&mut conn, "apple").await.unwrap().is_none());
        assert_eq!(resolve_or_seed(&mut conn, "apple", 95.0, T0).await.unwrap(), 95.0);
        assert_eq!(resolve_or_seed(&mut conn, "Apple ", 999.0, T1).await.unwrap(), 95.0);

        let entry = lookup(&mut conn, "APPLE").await.unwrap().unwrap();
        assert_eq!(entry.item, "apple");
        assert_eq!(entry.calories, Some(95.0));
        assert_eq!(entry.protein_g, None);
        assert_eq!(entry.updated_at, T0);
    }

    #[tokio::test]
    async fn placeholder_is_idempotent_and_seedable() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        assert!(create_placeholder_if_missing(&mut conn, "oat milk", T0).await.unwrap());
        assert!(!create_placeholder_if_missing(&mut conn, "Oat  Milk", T1).await.unwrap());

        let entry = lookup(&mut conn, "oat milk").await.unwrap().unwrap();
        assert_eq!(entry.calories, None);
        assert_eq!(entry.protein_g, Some(0.0));
        assert_eq!(entry.updated_at, T0);

        // no calories cached yet, so the caller's value is used and stored
        assert_eq!(resolve_or_seed(&mut conn, "oat milk", 60.0, T1).await.unwrap(), 60.0);
        assert_eq!(resolve_or_seed(&mut conn, "oat milk", 80.0, T1).await.unwrap(), 60.0);
    }

    #[tokio::test]
    async fn placeholder_rejects_empty_text() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let err = create_placeholder_if_missing(&mut conn, "  ", T0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn fill_touches_only_supplied_fields() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        resolve_or_seed(&mut conn, "egg", 78.0, T0).await.unwrap();
        let first = NutritionPatch {
            protein_g: Some(6.0),
            fat_g: Some(5.0),
            ..NutritionPatch::default()
        };
        let entry = fill(&mut conn, "egg", &first, T1).await.unwrap();
        assert_eq!(entry.calories, Some(78.0));
        assert_eq!(entry.protein_g, Some(6.0));
        assert_eq!(entry.fat_g, Some(5.0));
        assert_eq!(entry.carbs_g, None);
        assert_eq!(entry.updated_at, T1);

        let second = NutritionPatch {
            calories: Some(72.0),
            ..NutritionPatch::default()
        };
        let entry = fill(&mut conn, "egg", &second, T1).await.unwrap();
        assert_eq!(entry.calories, Some(72.0));
        assert_eq!(entry.protein_g, Some(6.0));
        assert_eq!(entry.fat_g, Some(5.0));
    }

    #[tokio::test]
    async fn empty_fill_still_refreshes_timestamp() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        resolve_or_seed(&mut conn, "egg", 78.0, T0).await.unwrap();
        let entry = fill(&mut conn, "egg", &NutritionPatch::default(), T1).await.unwrap();
        assert_eq!(entry.calories, Some(78.0));
        assert_eq!(entry.updated_at, T1);
    }

    #[tokio::test]
    async fn fill_unknown_item_is_not_found() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let patch = NutritionPatch {
            protein_g: Some(1.0),
            ..NutritionPatch::default()
        };
        let err = fill(&mut conn, "dragonfruit", &patch, T0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn fill_rejects_negative_fields() {
        let db = test_pool().await;
        let mut conn = db.acquire().await.unwrap();

        resolve_or_seed(&mut conn, "egg", 78.0, T0).await.unwrap();
        let patch = NutritionPatch {
            fiber_g: Some(-2.0),
            ..NutritionPatch::default()
        };
        let err = fill(&mut conn, "egg", &patch, T1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        let entry = lookup(&mut conn, "egg").await.unwrap().unwrap();
        assert_eq!(entry.fiber_g, None);
        assert_eq!(entry.updated_at, T0);
    }
}
