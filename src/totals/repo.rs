use sqlx::SqliteConnection;
use time::Date;

use crate::totals::repo_types::DailyTotal;

pub async fn find(
    conn: &mut SqliteConnection,
    date_local: Date,
    tz: &str,
) -> sqlx::Result<Option<DailyTotal>> {
    sqlx::query_as::<_, DailyTotal>(
        r#"
        SELECT date_local, tz, calories, protein_g, carbs_g, fat_g, fiber_g, items_count
          FROM daily_totals
         WHERE date_local = ?1 AND tz = ?2
        "#,
    )
    .bind(date_local)
    .bind(tz)
    .fetch_optional(&mut *conn)
    .await
}

/// Add one event's calories to the date's total, creating the row on first use.
pub async fn add_event(
    conn: &mut SqliteConnection,
    date_local: Date,
    tz: &str,
    calories: f64,
) -> sqlx::Result<DailyTotal> {
    sqlx::query_as::<_, DailyTotal>(
        r#"
        INSERT INTO daily_totals (date_local, tz, calories, items_count)
        VALUES (?1, ?2, ?3, 1)
        ON CONFLICT(date_local, tz) DO UPDATE SET
            calories = daily_totals.calories + excluded.calories,
            items_count = daily_totals.items_count + 1
        RETURNING date_local, tz, calories, protein_g, carbs_g, fat_g, fiber_g, items_count
        "#,
    )
    .bind(date_local)
    .bind(tz)
    .bind(calories)
    .fetch_one(&mut *conn)
    .await
}

/// Replace every summed field of the date's total.
pub async fn store(conn: &mut SqliteConnection, total: &DailyTotal) -> sqlx::Result<DailyTotal> {
    sqlx::query_as::<_, DailyTotal>(
        r#"
        INSERT INTO daily_totals
            (date_local, tz, calories, protein_g, carbs_g, fat_g, fiber_g, items_count)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(date_local, tz) DO UPDATE SET
            calories = excluded.calories,
            protein_g = excluded.protein_g,
            carbs_g = excluded.carbs_g,
            fat_g = excluded.fat_g,
            fiber_g = excluded.fiber_g,
            items_count = excluded.items_count
        RETURNING date_local, tz, calories, protein_g, carbs_g, fat_g, fiber_g, items_count
        "#,
    )
    .bind(total.date_local)
    .bind(total.tz.as_str())
    .bind(total.calories)
    .bind(total.protein_g)
    .bind(total.carbs_g)
    .bind(total.fat_g)
    .bind(total.fiber_g)
    .bind(total.items_count)
    .fetch_one(&mut *conn)
    .await
}
