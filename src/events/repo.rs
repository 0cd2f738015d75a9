use sqlx::SqliteConnection;
use time::{OffsetDateTime, UtcOffset};

use crate::events::repo_types::FoodEvent;

/// Insert a food event. Timestamps are stored in UTC.
pub async fn insert(
    conn: &mut SqliteConnection,
    ts: OffsetDateTime,
    raw_text: &str,
    calories: f64,
    created_at: OffsetDateTime,
) -> sqlx::Result<FoodEvent> {
    sqlx::query_as::<_, FoodEvent>(
        r#"
        INSERT INTO food_events (ts, raw_text, calories, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, ts, raw_text, calories, created_at
        "#,
    )
    .bind(ts.to_offset(UtcOffset::UTC))
    .bind(raw_text)
    .bind(calories)
    .bind(created_at.to_offset(UtcOffset::UTC))
    .fetch_one(&mut *conn)
    .await
}

/// Every stored event, in insertion order.
pub async fn list_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<FoodEvent>> {
    sqlx::query_as::<_, FoodEvent>(
        r#"
        SELECT id, ts, raw_text, calories, created_at
          FROM food_events
         ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
}
