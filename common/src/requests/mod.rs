//! Request-side types for the review listing endpoints: filter criteria,
//! sort specification and page selection. Handlers build these from raw
//! query parameters; the query layer turns them into SQL.

use chrono::{DateTime, Utc};

/// Optional filter criteria for review listings. All present criteria are
/// combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilters {
    /// Exact match on the business source id.
    pub listing_id: Option<String>,
    /// Set membership on business source ids.
    pub listing_ids: Option<Vec<String>>,
    /// Case-insensitive substring match.
    pub property_name: Option<String>,
    pub property_city: Option<String>,
    pub property_state: Option<String>,
    /// Exact match.
    pub property_postal_code: Option<String>,
    /// Inclusive bounds on the overall star rating.
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    /// Reviews carrying a category rating with this label.
    pub category: Option<String>,
    pub channel: Option<String>,
    pub review_type: Option<String>,
    /// Inclusive bounds on the review timestamp.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub approved: Option<bool>,
    /// Exact match on the author's user source id. Not exposed as a query
    /// parameter; set by the per-user listing endpoint.
    pub user_source_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    SubmittedAt,
    OverallRating,
    PropertyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// A page selection with the invariants `page >= 1` and
/// `1 <= limit <= MAX_LIMIT` already enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Builds a page request, silently clamping `page` to at least 1 and
    /// `limit` into `[1, MAX_LIMIT]`.
    pub fn clamped(page: i64, limit: i64) -> Self {
        PageRequest {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
