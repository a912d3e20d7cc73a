//! # Review Service Module
//!
//! Aggregates every API endpoint for review management under the
//! `/api/reviews` path: the filtered manager listing, per-property
//! statistics, the public approved-review pages and the approval toggle.
//!
//! ## Sub-modules:
//! - `params`: query-string parsing into typed filter/sort/page values.
//! - `query`: the filtered review query, pagination and page fetch.
//! - `normalize`: flattening joined rows into the client-facing shape.
//! - `stats`: per-property aggregation (counts, averages, category averages).
//! - one thin handler module per endpoint (`list`, `properties`, `channels`,
//!   `property`, `users`, `approved`, `approve`).

mod approve;
mod approved;
mod channels;
mod list;
mod normalize;
mod params;
mod properties;
mod property;
mod query;
mod stats;
mod users;

use crate::logging::{RequestLog, TRACE_HEADER};
use actix_web::web::{get, patch, scope};
use actix_web::{HttpResponse, Scope};
use common::model::review::{NormalizedReview, Paginated};
use serde_json::json;

/// The base path for all review-related API endpoints.
const API_PATH: &str = "/api/reviews";

/// Configures and returns the Actix `Scope` for all review-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /hostaway`**:
///     - **Handler**: `list::process`
///     - **Description**: Normalized reviews with optional filtering,
///       sorting and pagination.
///
/// *   **`GET /properties`**:
///     - **Handler**: `properties::process`
///     - **Description**: Statistics for every property, optionally scoped
///       by `channel`. The full set is returned, unpaginated.
///
/// *   **`GET /channels`**:
///     - **Handler**: `channels::process`
///     - **Description**: Sorted distinct channel labels present in the
///       review data.
///
/// *   **`GET /property/{property_id}`**:
///     - **Handler**: `property::process`
///     - **Description**: Property identity and metadata lookup by external
///       source id.
///
/// *   **`GET /user/{user_id}`** and **`GET /user/{user_id}/reviews`**:
///     - **Handlers**: `users::process`, `users::process_reviews`
///     - **Description**: User lookup, and that user's reviews paginated.
///
/// *   **`GET /approved`** and **`GET /approved/{property_id}`**:
///     - **Handlers**: `approved::process`, `approved::process_for_property`
///     - **Description**: Approved-only reviews for public display,
///       optionally scoped to one property.
///
/// *   **`PATCH /{review_id}/approve`**:
///     - **Handler**: `approve::process`
///     - **Description**: Toggles the approval flag of a review and returns
///       the new state.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/hostaway", get().to(list::process))
        .route("/properties", get().to(properties::process))
        .route("/channels", get().to(channels::process))
        .route("/property/{property_id}", get().to(property::process))
        .route("/user/{user_id}", get().to(users::process))
        .route("/user/{user_id}/reviews", get().to(users::process_reviews))
        .route("/approved", get().to(approved::process))
        .route(
            "/approved/{property_id}",
            get().to(approved::process_for_property),
        )
        .route("/{review_id}/approve", patch().to(approve::process))
}

/// The shared success body for paginated review listings.
fn paginated_response(log: &RequestLog, page: Paginated<NormalizedReview>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((TRACE_HEADER, log.trace_id()))
        .json(json!({
            "status": "success",
            "count": page.data.len(),
            "reviews": page.data,
            "pagination": page.pagination,
            "traceId": log.trace_id(),
        }))
}
