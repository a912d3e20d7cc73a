//! Handlers for the per-user endpoints: `GET /api/reviews/user/{user_id}`
//! (identity lookup) and `GET /api/reviews/user/{user_id}/reviews` (that
//! user's reviews, paginated, default ordering).

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::{RequestLog, TRACE_HEADER};
use crate::services::reviews::{paginated_response, params, query};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::user::UserInfo;
use common::requests::ReviewFilters;
use rusqlite::{params, OptionalExtension};
use serde_json::json;

pub(crate) async fn process(
    req: HttpRequest,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);
    let user_id = path.into_inner();

    match user_by_source_id(&db, &user_id).await {
        Ok(Some(user)) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "success",
                "user": user,
                "traceId": log.trace_id(),
            })),
        Ok(None) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "error",
                "message": "User not found",
                "traceId": log.trace_id(),
            })),
        Err(e) => e.to_response(&log),
    }
}

pub(crate) async fn process_reviews(
    req: HttpRequest,
    path: web::Path<String>,
    raw_query: web::Query<Vec<(String, String)>>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);
    let user_id = path.into_inner();

    let page = match params::parse_page_params(&raw_query) {
        Ok(page) => page,
        Err(e) => return e.to_response(&log),
    };

    let filters = ReviewFilters {
        user_source_id: Some(user_id),
        ..Default::default()
    };

    match query::fetch_page(&db, &filters, None, &page, &log).await {
        Ok(result) => paginated_response(&log, result),
        Err(e) => e.to_response(&log),
    }
}

async fn user_by_source_id(db: &Database, source_id: &str) -> Result<Option<UserInfo>, ApiError> {
    let conn = db.lock().await;
    let user = conn
        .query_row(
            "SELECT source_id, name, review_count, average_stars FROM users WHERE source_id = ?1",
            params![source_id],
            |row| {
                Ok(UserInfo {
                    user_id: row.get(0)?,
                    user_name: row.get(1)?,
                    review_count: row.get(2)?,
                    average_stars: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}
