use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::events::repo_types::FoodEvent;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateFoodEventRequest {
    #[serde(alias = "timestamp")]
    pub ts: String,
    pub raw_text: String,
    #[serde(alias = "submitted_calories")]
    pub calories: f64,
}

#[derive(Debug, Serialize)]
pub struct FoodEventResponse {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub raw_text: String,
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FoodEvent> for FoodEventResponse {
    fn from(e: FoodEvent) -> Self {
        Self {
            id: e.id,
            ts: e.ts,
            raw_text: e.raw_text,
            calories: e.calories,
            created_at: e.created_at,
        }
    }
}
