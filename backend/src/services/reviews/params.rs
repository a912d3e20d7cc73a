//! Query-parameter parsing for the review endpoints.
//!
//! Handlers receive the raw query as an ordered list of key/value pairs so
//! that repeated keys (`listingIds=a&listingIds=b`) survive; this module
//! turns that list into the typed filter/sort/page structs. Empty values are
//! treated as absent, unknown keys are ignored, and anything malformed is a
//! `VALIDATION_ERROR`.

use crate::error::ApiError;
use crate::time;
use chrono::{DateTime, Utc};
use common::requests::{PageRequest, ReviewFilters, ReviewSort, SortDirection, SortField};

pub(crate) struct ReviewListingParams {
    pub filters: ReviewFilters,
    pub sort: Option<ReviewSort>,
    pub page: PageRequest,
}

pub(crate) fn parse_listing_params(
    pairs: &[(String, String)],
) -> Result<ReviewListingParams, ApiError> {
    let mut filters = ReviewFilters::default();
    let mut listing_ids: Vec<String> = Vec::new();
    let mut sort_by: Option<SortField> = None;
    let mut sort_dir: Option<SortDirection> = None;
    let mut page: Option<i64> = None;
    let mut limit: Option<i64> = None;

    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "listingId" => filters.listing_id = Some(value.to_string()),
            // Comma-separated and repeated forms are equivalent.
            "listingIds" => listing_ids.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            ),
            "propertyName" => filters.property_name = Some(value.to_string()),
            "propertyCity" => filters.property_city = Some(value.to_string()),
            "propertyState" => filters.property_state = Some(value.to_string()),
            "propertyPostalCode" => filters.property_postal_code = Some(value.to_string()),
            "minRating" => filters.min_rating = Some(parse_number(key, value)?),
            "maxRating" => filters.max_rating = Some(parse_number(key, value)?),
            "category" => filters.category = Some(value.to_string()),
            "channel" => filters.channel = Some(value.to_string()),
            "type" => filters.review_type = Some(value.to_string()),
            "from" => filters.from = Some(parse_date(key, value)?),
            "to" => filters.to = Some(parse_date(key, value)?),
            "approved" => filters.approved = Some(parse_bool(key, value)?),
            "sortBy" => sort_by = Some(parse_sort_field(value)?),
            "sortDir" => sort_dir = Some(parse_sort_direction(value)?),
            "page" => page = Some(parse_integer(key, value)?),
            "limit" => limit = Some(parse_integer(key, value)?),
            _ => {}
        }
    }

    if !listing_ids.is_empty() {
        filters.listing_ids = Some(listing_ids);
    }

    let sort = sort_by.map(|field| ReviewSort {
        field,
        direction: sort_dir.unwrap_or(SortDirection::Desc),
    });

    Ok(ReviewListingParams {
        filters,
        sort,
        page: PageRequest::clamped(
            page.unwrap_or(1),
            limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        ),
    })
}

/// Parses only `page`/`limit`, for endpoints that take no filters.
pub(crate) fn parse_page_params(pairs: &[(String, String)]) -> Result<PageRequest, ApiError> {
    let mut page: Option<i64> = None;
    let mut limit: Option<i64> = None;

    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "page" => page = Some(parse_integer(key, value)?),
            "limit" => limit = Some(parse_integer(key, value)?),
            _ => {}
        }
    }

    Ok(PageRequest::clamped(
        page.unwrap_or(1),
        limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
    ))
}

fn parse_number(key: &str, value: &str) -> Result<f64, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{} must be a number", key)))
}

fn parse_integer(key: &str, value: &str) -> Result<i64, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{} must be an integer", key)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ApiError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ApiError::validation(format!(
            "{} must be 'true' or 'false'",
            key
        ))),
    }
}

fn parse_date(key: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    time::parse_timestamp(value).ok_or_else(|| {
        ApiError::validation(format!(
            "{} must be an ISO date or date-time, got '{}'",
            key, value
        ))
    })
}

fn parse_sort_field(value: &str) -> Result<SortField, ApiError> {
    match value {
        "submittedAt" => Ok(SortField::SubmittedAt),
        "overallRating" => Ok(SortField::OverallRating),
        "propertyName" => Ok(SortField::PropertyName),
        _ => Err(ApiError::validation(format!(
            "sortBy must be one of submittedAt, overallRating, propertyName; got '{}'",
            value
        ))),
    }
}

fn parse_sort_direction(value: &str) -> Result<SortDirection, ApiError> {
    match value {
        "asc" => Ok(SortDirection::Asc),
        "desc" => Ok(SortDirection::Desc),
        _ => Err(ApiError::validation(format!(
            "sortDir must be 'asc' or 'desc', got '{}'",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn comma_separated_and_repeated_listing_ids_are_equivalent() {
        let comma = parse_listing_params(&pairs(&[("listingIds", "a, b,c")])).unwrap();
        let repeated = parse_listing_params(&pairs(&[
            ("listingIds", "a"),
            ("listingIds", "b"),
            ("listingIds", "c"),
        ]))
        .unwrap();
        assert_eq!(comma.filters, repeated.filters);
        assert_eq!(
            comma.filters.listing_ids,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn empty_listing_ids_value_is_absent() {
        let parsed = parse_listing_params(&pairs(&[("listingIds", " , ,")])).unwrap();
        assert_eq!(parsed.filters.listing_ids, None);
    }

    #[test]
    fn parses_the_full_filter_set() {
        let parsed = parse_listing_params(&pairs(&[
            ("listingId", "prop-1"),
            ("propertyName", "harbor"),
            ("propertyCity", "brighton"),
            ("propertyState", "uk"),
            ("propertyPostalCode", "BN1"),
            ("minRating", "2.5"),
            ("maxRating", "4.5"),
            ("category", "cleanliness"),
            ("channel", "hostaway"),
            ("type", "guest-to-host"),
            ("from", "2023-01-01"),
            ("to", "2023-12-31T23:00:00Z"),
            ("approved", "true"),
            ("sortBy", "overallRating"),
            ("sortDir", "asc"),
            ("page", "2"),
            ("limit", "10"),
        ]))
        .unwrap();

        assert_eq!(parsed.filters.listing_id.as_deref(), Some("prop-1"));
        assert_eq!(parsed.filters.min_rating, Some(2.5));
        assert_eq!(parsed.filters.approved, Some(true));
        assert_eq!(
            parsed.sort,
            Some(ReviewSort {
                field: SortField::OverallRating,
                direction: SortDirection::Asc,
            })
        );
        assert_eq!(parsed.page, PageRequest { page: 2, limit: 10 });
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        let parsed = parse_listing_params(&pairs(&[("sortBy", "submittedAt")])).unwrap();
        assert_eq!(
            parsed.sort.unwrap().direction,
            SortDirection::Desc
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_listing_params(&pairs(&[("minRating", "high")])).is_err());
        assert!(parse_listing_params(&pairs(&[("approved", "yes")])).is_err());
        assert!(parse_listing_params(&pairs(&[("from", "last tuesday")])).is_err());
        assert!(parse_listing_params(&pairs(&[("sortBy", "stars")])).is_err());
        assert!(parse_listing_params(&pairs(&[("page", "one")])).is_err());
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        let parsed = parse_listing_params(&pairs(&[("limit", "500")])).unwrap();
        assert_eq!(parsed.page.limit, 100);
        let parsed = parse_listing_params(&pairs(&[("limit", "-1")])).unwrap();
        assert_eq!(parsed.page.limit, 1);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let parsed = parse_listing_params(&pairs(&[("utm_source", "mail")])).unwrap();
        assert_eq!(parsed.filters, ReviewFilters::default());
    }
}
