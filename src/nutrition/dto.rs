use serde::{Deserialize, Serialize};
use time::Date;

use crate::nutrition::repo_types::{NutritionEntry, NutritionPatch};

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub item: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<NutritionEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PlaceholderRequest {
    pub item: String,
}

#[derive(Debug, Serialize)]
pub struct PlaceholderResponse {
    pub item: String,
    pub created: bool,
}

/// Partial update: only send the fields you want to change.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FillRequest {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
}

impl FillRequest {
    pub fn patch(&self) -> NutritionPatch {
        NutritionPatch {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FillResponse {
    pub entry: NutritionEntry,
    pub recomputed_dates: Vec<Date>,
}
