use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated review statistics for one property. Emitted for every business
/// in the system, including those without a single review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyStats {
    pub property_id: String,
    pub property_name: String,
    /// Rounded to one decimal; `None` when the property has no reviews.
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
    pub approved_reviews: i64,
    pub category_averages: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub property_id: String,
    pub property_name: String,
    pub categories: Option<String>,
}
