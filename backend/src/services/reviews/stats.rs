//! Per-property statistics.
//!
//! Enumeration starts from the businesses table, not from reviews, so a
//! property with no reviews still shows up with zero counts. Review totals
//! and category averages come from two separate GROUP BY queries; a single
//! reviews x review_categories join would inflate the review counts.

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::RequestLog;
use common::model::property::PropertyStats;
use rusqlite::params_from_iter;
use std::collections::{BTreeMap, HashMap};

/// Rounds half-up to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes one statistics record per business, sorted by business name
/// ascending, optionally restricted to reviews from `channel`.
pub(crate) async fn property_stats(
    db: &Database,
    channel: Option<&str>,
    log: &RequestLog,
) -> Result<Vec<PropertyStats>, ApiError> {
    log.debug("Computing property statistics");
    let conn = db.lock().await;

    let mut stmt = conn.prepare("SELECT id, source_id, name FROM businesses ORDER BY name ASC")?;
    let businesses: Vec<(i64, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<_, _>>()?;

    // The channel restriction lives in the join condition so businesses
    // keep their group row even when nothing matches.
    let channel_condition = if channel.is_some() {
        " AND r.channel = ?1"
    } else {
        ""
    };

    let sql = format!(
        "SELECT b.source_id, COUNT(r.id), \
                SUM(CASE WHEN r.approved = 1 THEN 1 ELSE 0 END), AVG(r.stars) \
         FROM businesses b \
         LEFT JOIN reviews r ON r.business_id = b.id{} \
         GROUP BY b.source_id",
        channel_condition
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut review_stats: HashMap<String, (i64, i64, Option<f64>)> = HashMap::new();
    let mapped = stmt.query_map(params_from_iter(channel.iter()), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Option<i64>>(2)?,
            row.get::<_, Option<f64>>(3)?,
        ))
    })?;
    for item in mapped {
        let (source_id, total, approved, average) = item?;
        review_stats.insert(source_id, (total, approved.unwrap_or(0), average));
    }

    let sql = format!(
        "SELECT b.source_id, c.category, AVG(c.rating) \
         FROM businesses b \
         LEFT JOIN reviews r ON r.business_id = b.id{} \
         LEFT JOIN review_categories c ON c.review_id = r.id \
         WHERE c.id IS NOT NULL \
         GROUP BY b.source_id, c.category",
        channel_condition
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut category_averages: HashMap<String, BTreeMap<String, f64>> = HashMap::new();
    let mapped = stmt.query_map(params_from_iter(channel.iter()), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;
    for item in mapped {
        let (source_id, category, average) = item?;
        category_averages
            .entry(source_id)
            .or_default()
            .insert(category, round1(average));
    }

    let stats = businesses
        .into_iter()
        .map(|(_, source_id, name)| {
            let (total, approved, average) = review_stats
                .get(&source_id)
                .cloned()
                .unwrap_or((0, 0, None));
            PropertyStats {
                property_name: name,
                average_rating: average.map(round1),
                total_reviews: total,
                approved_reviews: approved,
                category_averages: category_averages.remove(&source_id).unwrap_or_default(),
                property_id: source_id,
            }
        })
        .collect();

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::Database;

    /// Harbor House: 5.0 and 4.0 on hostaway, 3.0 on google. Garden Flat has
    /// one review, Attic Studio none.
    async fn fixture() -> Database {
        let db = memory_db().await;
        {
            let conn = db.lock().await;
            let harbor = insert_business(&conn, "prop-1", "Harbor House");
            let garden = insert_business(&conn, "prop-2", "Garden Flat");
            insert_business(&conn, "prop-3", "Attic Studio");
            let maya = insert_user(&conn, "guest-1", "Maya");

            let r1 = insert_review(
                &conn, "rev-1", harbor, maya, 5.0, "2023-06-03T10:00:00Z", "hostaway", true,
            );
            insert_category(&conn, r1, "cleanliness", 4.25);
            insert_category(&conn, r1, "location", 5.0);

            let r2 = insert_review(
                &conn, "rev-2", harbor, maya, 4.0, "2023-06-02T10:00:00Z", "hostaway", false,
            );
            insert_category(&conn, r2, "cleanliness", 4.0);

            insert_review(
                &conn, "rev-3", harbor, maya, 3.0, "2023-06-01T10:00:00Z", "google", false,
            );
            insert_review(
                &conn, "rev-4", garden, maya, 2.0, "2023-05-20T10:00:00Z", "hostaway", true,
            );
        }
        db
    }

    fn log() -> RequestLog {
        RequestLog::new("test")
    }

    #[tokio::test]
    async fn includes_every_business_sorted_by_name() {
        let db = fixture().await;
        let stats = property_stats(&db, None, &log()).await.unwrap();

        let names: Vec<&str> = stats.iter().map(|s| s.property_name.as_str()).collect();
        assert_eq!(names, vec!["Attic Studio", "Garden Flat", "Harbor House"]);
    }

    #[tokio::test]
    async fn zero_review_business_reports_empty_stats() {
        let db = fixture().await;
        let stats = property_stats(&db, None, &log()).await.unwrap();

        let attic = &stats[0];
        assert_eq!(attic.property_id, "prop-3");
        assert_eq!(attic.total_reviews, 0);
        assert_eq!(attic.approved_reviews, 0);
        assert_eq!(attic.average_rating, None);
        assert!(attic.category_averages.is_empty());
    }

    #[tokio::test]
    async fn averages_are_rounded_to_one_decimal() {
        let db = fixture().await;
        let stats = property_stats(&db, None, &log()).await.unwrap();

        let harbor = &stats[2];
        assert_eq!(harbor.total_reviews, 3);
        assert_eq!(harbor.approved_reviews, 1);
        // (5 + 4 + 3) / 3 = 4.0
        assert_eq!(harbor.average_rating, Some(4.0));
        // (4.25 + 4.0) / 2 = 4.125 -> 4.1
        assert_eq!(harbor.category_averages["cleanliness"], 4.1);
        assert_eq!(harbor.category_averages["location"], 5.0);
    }

    #[tokio::test]
    async fn channel_filter_scopes_both_aggregates() {
        let db = fixture().await;
        let stats = property_stats(&db, Some("hostaway"), &log()).await.unwrap();

        let harbor = &stats[2];
        assert_eq!(harbor.total_reviews, 2);
        // (5 + 4) / 2 = 4.5
        assert_eq!(harbor.average_rating, Some(4.5));

        // The google-only channel leaves Harbor House with zero matches but
        // still present.
        let stats = property_stats(&db, Some("google"), &log()).await.unwrap();
        let garden = &stats[1];
        assert_eq!(garden.property_id, "prop-2");
        assert_eq!(garden.total_reviews, 0);
        assert_eq!(garden.average_rating, None);
        assert!(garden.category_averages.is_empty());
    }

    #[test]
    fn round1_is_half_up() {
        assert_eq!(round1(4.125), 4.1);
        assert_eq!(round1(4.15), 4.2);
        assert_eq!(round1(4.04), 4.0);
        assert_eq!(round1(3.999), 4.0);
    }
}
