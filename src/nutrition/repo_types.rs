use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Cached nutrition for one normalized food text. `None` means unknown.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct NutritionEntry {
    pub item: String,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update of a cache entry; only `Some` fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionPatch {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
}

impl NutritionPatch {
    pub fn fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
            ("fiber_g", self.fiber_g),
        ]
    }
}
