//! Flattens a joined review row into the client-facing shape.

use crate::services::reviews::query::ReviewRow;
use common::model::review::NormalizedReview;
use std::collections::BTreeMap;

/// Builds the flat review representation. Missing business/user relations
/// fall back to synthetic values; `categories` must be in insertion order so
/// a later row for the same label overwrites an earlier one.
pub(crate) fn review(row: ReviewRow, categories: Vec<(String, f64)>) -> NormalizedReview {
    let property_id = row
        .property_source_id
        .unwrap_or_else(|| format!("business-{}", row.business_id));

    let mut category_ratings = BTreeMap::new();
    for (label, rating) in categories {
        category_ratings.insert(label, rating);
    }

    NormalizedReview {
        id: row.id,
        property_id,
        property_name: row
            .property_name
            .unwrap_or_else(|| "Unknown Business".to_string()),
        channel: row.channel,
        review_type: row.review_type,
        overall_rating: row.stars,
        categories: category_ratings,
        comment: row.text,
        guest_name: row.guest_name.unwrap_or_else(|| "Anonymous".to_string()),
        submitted_at: row.date,
        approved: row.approved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_row() -> ReviewRow {
        ReviewRow {
            id: 7,
            property_source_id: None,
            property_name: None,
            business_id: 42,
            channel: "hostaway".to_string(),
            review_type: "guest-to-host".to_string(),
            stars: 4.5,
            text: "Nice.".to_string(),
            guest_name: None,
            date: "2023-06-01T10:00:00Z".to_string(),
            approved: true,
        }
    }

    #[test]
    fn missing_relations_fall_back_to_synthetic_values() {
        let normalized = review(bare_row(), Vec::new());
        assert_eq!(normalized.property_id, "business-42");
        assert_eq!(normalized.property_name, "Unknown Business");
        assert_eq!(normalized.guest_name, "Anonymous");
        assert!(normalized.categories.is_empty());
    }

    #[test]
    fn later_category_rows_overwrite_earlier_ones() {
        let normalized = review(
            bare_row(),
            vec![
                ("cleanliness".to_string(), 5.0),
                ("value".to_string(), 3.0),
                ("cleanliness".to_string(), 2.0),
            ],
        );
        assert_eq!(normalized.categories["cleanliness"], 2.0);
        assert_eq!(normalized.categories["value"], 3.0);
    }

    #[test]
    fn serializes_with_the_wire_field_names() {
        let normalized = review(bare_row(), vec![("check_in".to_string(), 4.0)]);
        let json = serde_json::to_value(&normalized).unwrap();
        assert_eq!(json["propertyId"], "business-42");
        assert_eq!(json["guestName"], "Anonymous");
        assert_eq!(json["overallRating"], 4.5);
        assert_eq!(json["type"], "guest-to-host");
        assert_eq!(json["submittedAt"], "2023-06-01T10:00:00Z");
        assert_eq!(json["categories"]["check_in"], 4.0);
    }
}
