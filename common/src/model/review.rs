use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A review flattened for clients: business and user fields are folded in,
/// category ratings become a label -> rating map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    pub id: i64,
    pub property_id: String,
    pub property_name: String,
    pub channel: String,
    #[serde(rename = "type")]
    pub review_type: String,
    pub overall_rating: f64,
    pub categories: BTreeMap<String, f64>,
    pub comment: String,
    pub guest_name: String,
    /// ISO-8601, UTC.
    pub submitted_at: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}
