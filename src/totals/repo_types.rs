use serde::Serialize;
use sqlx::FromRow;
use time::Date;

use crate::localtime::TZ_LABEL;

/// Running nutrition total for one local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailyTotal {
    pub date_local: Date,
    pub tz: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub items_count: i64,
}

impl DailyTotal {
    /// Zero-valued total for a date with nothing recorded.
    pub fn empty(date_local: Date) -> Self {
        Self {
            date_local,
            tz: TZ_LABEL.to_string(),
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            fiber_g: 0.0,
            items_count: 0,
        }
    }
}
