//! Bulk ingestion of source data.
//!
//! Reads a JSON file holding businesses, users and reviews (with their
//! nested category ratings) and loads it into an empty database inside one
//! transaction. Reviews referencing an unknown business or user source id
//! are skipped with a warning rather than aborting the run; every review
//! starts out unapproved. Category rows are inserted in source order, so
//! when a review carries several ratings for the same label the last one
//! seeded is the one normalization surfaces.

use crate::db::Database;
use crate::error::ApiError;
use crate::time;
use rusqlite::params;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct SeedData {
    pub businesses: Vec<SeedBusiness>,
    pub users: Vec<SeedUser>,
    pub reviews: Vec<SeedReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedBusiness {
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub stars: Option<f64>,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default = "default_is_open")]
    pub is_open: bool,
    #[serde(default)]
    pub categories: Option<String>,
}

fn default_is_open() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub average_stars: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReview {
    pub source_id: String,
    pub source_user_id: String,
    pub source_business_id: String,
    pub stars: f64,
    pub channel: String,
    pub text: String,
    pub date: String,
    #[serde(rename = "type", default = "default_review_type")]
    pub review_type: String,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

fn default_review_type() -> String {
    "guest-to-host".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub stars: f64,
}

#[derive(Debug)]
pub struct SeedSummary {
    pub businesses: usize,
    pub users: usize,
    pub reviews: usize,
    pub categories: usize,
    pub skipped: usize,
}

/// Loads the seed file at `path` and applies it.
pub async fn run(db: &Database, path: &str) -> Result<SeedSummary, ApiError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Unexpected(format!("failed to read seed file {}: {}", path, e)))?;
    let data: SeedData = serde_json::from_str(&raw)
        .map_err(|e| ApiError::Unexpected(format!("failed to parse seed file {}: {}", path, e)))?;
    apply(db, &data).await
}

/// Applies seed data to an empty database. Refuses to touch a database that
/// already contains reviews.
pub async fn apply(db: &Database, data: &SeedData) -> Result<SeedSummary, ApiError> {
    let mut conn = db.lock().await;

    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?;
    if existing > 0 {
        return Err(ApiError::InvalidOperation(format!(
            "seeding requires an empty database ({} reviews present)",
            existing
        )));
    }

    let tx = conn.transaction()?;

    let mut business_ids: HashMap<&str, i64> = HashMap::new();
    for business in &data.businesses {
        tx.execute(
            "INSERT INTO businesses
                (source_id, name, address, city, state, postal_code,
                 latitude, longitude, stars, review_count, is_open, categories)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                business.source_id,
                business.name,
                business.address,
                business.city,
                business.state,
                business.postal_code,
                business.latitude,
                business.longitude,
                business.stars,
                business.review_count,
                business.is_open,
                business.categories,
            ],
        )?;
        business_ids.insert(&business.source_id, tx.last_insert_rowid());
    }

    let mut user_ids: HashMap<&str, i64> = HashMap::new();
    for user in &data.users {
        tx.execute(
            "INSERT INTO users (source_id, name, review_count, average_stars)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.source_id,
                user.name,
                user.review_count,
                user.average_stars
            ],
        )?;
        user_ids.insert(&user.source_id, tx.last_insert_rowid());
    }

    let mut reviews = 0;
    let mut categories = 0;
    let mut skipped = 0;
    for review in &data.reviews {
        let (Some(&business_id), Some(&user_id)) = (
            business_ids.get(review.source_business_id.as_str()),
            user_ids.get(review.source_user_id.as_str()),
        ) else {
            log::warn!(
                "Skipping review {}: business or user not found",
                review.source_id
            );
            skipped += 1;
            continue;
        };

        let Some(date) = time::parse_timestamp(&review.date) else {
            log::warn!(
                "Skipping review {}: unparseable date '{}'",
                review.source_id,
                review.date
            );
            skipped += 1;
            continue;
        };

        tx.execute(
            "INSERT INTO reviews
                (source_id, business_id, user_id, type, stars, text, date, approved, channel)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                review.source_id,
                business_id,
                user_id,
                review.review_type,
                review.stars,
                review.text,
                time::format_timestamp(&date),
                false,
                review.channel,
            ],
        )?;
        let review_id = tx.last_insert_rowid();
        reviews += 1;

        for category in &review.categories {
            tx.execute(
                "INSERT INTO review_categories (review_id, category, rating) VALUES (?1, ?2, ?3)",
                params![review_id, category.name, category.stars],
            )?;
            categories += 1;
        }
    }

    tx.commit()?;

    Ok(SeedSummary {
        businesses: data.businesses.len(),
        users: data.users.len(),
        reviews,
        categories,
        skipped,
    })
}
