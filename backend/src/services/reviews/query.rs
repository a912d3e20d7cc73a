//! Filtered review queries.
//!
//! `ReviewQuery` holds the WHERE fragments and bind parameters built from a
//! `ReviewFilters`, unexecuted, so the same description serves both the
//! total count and the ordered, paginated page fetch. Category rows for the
//! fetched page are pulled in one batch query afterwards; joining them into
//! the main statement would multiply review rows per category.

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::RequestLog;
use crate::services::reviews::normalize;
use crate::time;
use common::model::review::{NormalizedReview, Paginated, PaginationMeta};
use common::requests::{PageRequest, ReviewFilters, ReviewSort, SortDirection, SortField};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::collections::HashMap;

const BASE_SELECT: &str = "SELECT r.id, b.source_id, b.name, r.business_id, r.channel, r.type, \
     r.stars, r.text, u.name, r.date, r.approved \
     FROM reviews r \
     LEFT JOIN businesses b ON b.id = r.business_id \
     LEFT JOIN users u ON u.id = r.user_id";

const BASE_COUNT: &str = "SELECT COUNT(*) \
     FROM reviews r \
     LEFT JOIN businesses b ON b.id = r.business_id \
     LEFT JOIN users u ON u.id = r.user_id";

/// One review row as selected by `BASE_SELECT`. Business and user columns
/// are nullable because of the left joins.
pub(crate) struct ReviewRow {
    pub id: i64,
    pub property_source_id: Option<String>,
    pub property_name: Option<String>,
    pub business_id: i64,
    pub channel: String,
    pub review_type: String,
    pub stars: f64,
    pub text: String,
    pub guest_name: Option<String>,
    pub date: String,
    pub approved: bool,
}

pub(crate) struct ReviewQuery {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql + Send + Sync>>,
}

impl ReviewQuery {
    pub fn from_filters(filters: &ReviewFilters) -> Self {
        let mut query = ReviewQuery {
            conditions: Vec::new(),
            params: Vec::new(),
        };

        if let Some(id) = &filters.listing_id {
            query.push("b.source_id = ?", Box::new(id.clone()));
        }
        if let Some(ids) = &filters.listing_ids {
            if !ids.is_empty() {
                let placeholders = vec!["?"; ids.len()].join(", ");
                query
                    .conditions
                    .push(format!("b.source_id IN ({})", placeholders));
                for id in ids {
                    query.params.push(Box::new(id.clone()));
                }
            }
        }
        // SQLite LIKE is case-insensitive for ASCII, matching the original's
        // ILIKE matches.
        if let Some(name) = &filters.property_name {
            query.push("b.name LIKE '%' || ? || '%'", Box::new(name.clone()));
        }
        if let Some(city) = &filters.property_city {
            query.push("b.city LIKE '%' || ? || '%'", Box::new(city.clone()));
        }
        if let Some(state) = &filters.property_state {
            query.push("b.state LIKE '%' || ? || '%'", Box::new(state.clone()));
        }
        if let Some(postal_code) = &filters.property_postal_code {
            query.push("b.postal_code = ?", Box::new(postal_code.clone()));
        }
        if let Some(min) = filters.min_rating {
            query.push("r.stars >= ?", Box::new(min));
        }
        if let Some(max) = filters.max_rating {
            query.push("r.stars <= ?", Box::new(max));
        }
        // EXISTS keeps the review row unique even when it carries several
        // rows for the same category label.
        if let Some(category) = &filters.category {
            query.push(
                "EXISTS (SELECT 1 FROM review_categories rc \
                 WHERE rc.review_id = r.id AND rc.category = ?)",
                Box::new(category.clone()),
            );
        }
        if let Some(channel) = &filters.channel {
            query.push("r.channel = ?", Box::new(channel.clone()));
        }
        if let Some(review_type) = &filters.review_type {
            query.push("r.type = ?", Box::new(review_type.clone()));
        }
        if let Some(from) = &filters.from {
            query.push("r.date >= ?", Box::new(time::format_timestamp(from)));
        }
        if let Some(to) = &filters.to {
            query.push("r.date <= ?", Box::new(time::format_timestamp(to)));
        }
        if let Some(approved) = filters.approved {
            query.push("r.approved = ?", Box::new(approved));
        }
        if let Some(user_source_id) = &filters.user_source_id {
            query.push("u.source_id = ?", Box::new(user_source_id.clone()));
        }

        query
    }

    fn push(&mut self, condition: &str, param: Box<dyn ToSql + Send + Sync>) {
        self.conditions.push(condition.to_string());
        self.params.push(param);
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn count(&self, conn: &Connection) -> rusqlite::Result<i64> {
        let sql = format!("{}{}", BASE_COUNT, self.where_clause());
        conn.query_row(&sql, params_from_iter(self.params.iter()), |row| row.get(0))
    }

    pub fn fetch_rows(
        &self,
        conn: &Connection,
        sort: Option<&ReviewSort>,
        page: &PageRequest,
    ) -> rusqlite::Result<Vec<ReviewRow>> {
        let sql = format!(
            "{}{} ORDER BY {} LIMIT {} OFFSET {}",
            BASE_SELECT,
            self.where_clause(),
            order_clause(sort),
            page.limit,
            page.offset()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(self.params.iter()), |row| {
            Ok(ReviewRow {
                id: row.get(0)?,
                property_source_id: row.get(1)?,
                property_name: row.get(2)?,
                business_id: row.get(3)?,
                channel: row.get(4)?,
                review_type: row.get(5)?,
                stars: row.get(6)?,
                text: row.get(7)?,
                guest_name: row.get(8)?,
                date: row.get(9)?,
                approved: row.get(10)?,
            })
        })?;
        rows.collect()
    }
}

fn order_clause(sort: Option<&ReviewSort>) -> String {
    let (column, direction) = match sort {
        Some(sort) => {
            let column = match sort.field {
                SortField::SubmittedAt => "r.date",
                SortField::OverallRating => "r.stars",
                SortField::PropertyName => "b.name",
            };
            let direction = match sort.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            (column, direction)
        }
        None => ("r.date", "DESC"),
    };
    // Tie-break on the row id so equal sort keys page deterministically.
    format!("{} {}, r.id ASC", column, direction)
}

/// Runs a filtered, sorted, paginated listing and normalizes the page.
pub(crate) async fn fetch_page(
    db: &Database,
    filters: &ReviewFilters,
    sort: Option<&ReviewSort>,
    page: &PageRequest,
    log: &RequestLog,
) -> Result<Paginated<NormalizedReview>, ApiError> {
    log.debug("Fetching reviews from database");
    let conn = db.lock().await;

    let query = ReviewQuery::from_filters(filters);
    let total = query.count(&conn)?;
    let rows = query.fetch_rows(&conn, sort, page)?;
    let mut categories = fetch_categories(&conn, &rows)?;

    let data: Vec<NormalizedReview> = rows
        .into_iter()
        .map(|row| {
            let row_categories = categories.remove(&row.id).unwrap_or_default();
            normalize::review(row, row_categories)
        })
        .collect();

    let total_pages = (total + page.limit - 1) / page.limit;
    Ok(Paginated {
        data,
        pagination: PaginationMeta {
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
        },
    })
}

/// Batch-loads the category rows for a page of reviews, in insertion order
/// per review.
fn fetch_categories(
    conn: &Connection,
    rows: &[ReviewRow],
) -> rusqlite::Result<HashMap<i64, Vec<(String, f64)>>> {
    if rows.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; rows.len()].join(", ");
    let sql = format!(
        "SELECT review_id, category, rating FROM review_categories \
         WHERE review_id IN ({}) ORDER BY id ASC",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt.query_map(params_from_iter(rows.iter().map(|r| r.id)), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;

    let mut by_review: HashMap<i64, Vec<(String, f64)>> = HashMap::new();
    for item in mapped {
        let (review_id, category, rating) = item?;
        by_review
            .entry(review_id)
            .or_default()
            .push((category, rating));
    }
    Ok(by_review)
}
