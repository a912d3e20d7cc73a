//! Handler for `PATCH /api/reviews/{review_id}/approve`: flips the approval
//! flag of one review and returns the new state. The only mutating
//! operation in the service, and the only query path that 404s on a missing
//! id.

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::{RequestLog, TRACE_HEADER};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use rusqlite::params;
use serde_json::json;

pub(crate) async fn process(
    req: HttpRequest,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);

    let review_id: i64 = match path.into_inner().parse() {
        Ok(id) => id,
        Err(_) => return ApiError::validation("reviewId must be an integer").to_response(&log),
    };

    match toggle_approval(&db, review_id, &log).await {
        Ok(approved) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "success",
                "reviewId": review_id,
                "approved": approved,
                "traceId": log.trace_id(),
            })),
        Err(e) => e.to_response(&log),
    }
}

/// Read-modify-write on the approval flag; last write wins between
/// concurrent togglers.
pub(crate) async fn toggle_approval(
    db: &Database,
    review_id: i64,
    log: &RequestLog,
) -> Result<bool, ApiError> {
    let conn = db.lock().await;

    let approved: bool = match conn.query_row(
        "SELECT approved FROM reviews WHERE id = ?1",
        [review_id],
        |row| row.get(0),
    ) {
        Ok(value) => value,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(ApiError::not_found("Review", review_id.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let approved = !approved;
    conn.execute(
        "UPDATE reviews SET approved = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
        params![approved, review_id],
    )?;

    log.info(&format!(
        "Review {} {}",
        review_id,
        if approved { "approved" } else { "unapproved" }
    ));
    Ok(approved)
}
