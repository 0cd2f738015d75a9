use sqlx::SqliteConnection;
use time::{OffsetDateTime, UtcOffset};

use crate::nutrition::repo_types::{NutritionEntry, NutritionPatch};

pub async fn find(conn: &mut SqliteConnection, item: &str) -> sqlx::Result<Option<NutritionEntry>> {
    sqlx::query_as::<_, NutritionEntry>(
        r#"
        SELECT item, calories, protein_g, carbs_g, fat_g, fiber_g, updated_at
          FROM nutrition_cache
         WHERE item = ?1
        "#,
    )
    .bind(item)
    .fetch_optional(&mut *conn)
    .await
}

/// Insert a new entry with the given fields; macros not in `fields` stay NULL.
pub async fn insert(
    conn: &mut SqliteConnection,
    item: &str,
    fields: &NutritionPatch,
    now: OffsetDateTime,
) -> sqlx::Result<NutritionEntry> {
    sqlx::query_as::<_, NutritionEntry>(
        r#"
        INSERT INTO nutrition_cache (item, calories, protein_g, carbs_g, fat_g, fiber_g, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING item, calories, protein_g, carbs_g, fat_g, fiber_g, updated_at
        "#,
    )
    .bind(item)
    .bind(fields.calories)
    .bind(fields.protein_g)
    .bind(fields.carbs_g)
    .bind(fields.fat_g)
    .bind(fields.fiber_g)
    .bind(now.to_offset(UtcOffset::UTC))
    .fetch_one(&mut *conn)
    .await
}

/// Insert unless `item` already exists. Returns whether a row was created.
pub async fn insert_if_missing(
    conn: &mut SqliteConnection,
    item: &str,
    fields: &NutritionPatch,
    now: OffsetDateTime,
) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO nutrition_cache (item, calories, protein_g, carbs_g, fat_g, fiber_g, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(item) DO NOTHING
        "#,
    )
    .bind(item)
    .bind(fields.calories)
    .bind(fields.protein_g)
    .bind(fields.carbs_g)
    .bind(fields.fat_g)
    .bind(fields.fiber_g)
    .bind(now.to_offset(UtcOffset::UTC))
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected() == 1)
}

/// Overwrite only the fields present in `patch` and stamp `updated_at`.
/// `None` when no entry exists for `item`.
pub async fn apply_patch(
    conn: &mut SqliteConnection,
    item: &str,
    patch: &NutritionPatch,
    now: OffsetDateTime,
) -> sqlx::Result<Option<NutritionEntry>> {
    sqlx::query_as::<_, NutritionEntry>(
        r#"
        UPDATE nutrition_cache
           SET calories   = COALESCE(?2, calories),
               protein_g  = COALESCE(?3, protein_g),
               carbs_g    = COALESCE(?4, carbs_g),
               fat_g      = COALESCE(?5, fat_g),
               fiber_g    = COALESCE(?6, fiber_g),
               updated_at = ?7
         WHERE item = ?1
        RETURNING item, calories, protein_g, carbs_g, fat_g, fiber_g, updated_at
        "#,
    )
    .bind(item)
    .bind(patch.calories)
    .bind(patch.protein_g)
    .bind(patch.carbs_g)
    .bind(patch.fat_g)
    .bind(patch.fiber_g)
    .bind(now.to_offset(UtcOffset::UTC))
    .fetch_optional(&mut *conn)
    .await
}
