use sqlx::FromRow;
use time::OffsetDateTime;

/// A logged food entry. Never updated or deleted once written.
#[derive(Debug, Clone, FromRow)]
pub struct FoodEvent {
    pub id: i64,
    pub ts: OffsetDateTime,
    pub raw_text: String,
    pub calories: f64,
    pub created_at: OffsetDateTime,
}
