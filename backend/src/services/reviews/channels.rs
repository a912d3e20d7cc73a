//! Handler for `GET /api/reviews/channels`: the sorted, distinct channel
//! labels present in the review data.

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::{RequestLog, TRACE_HEADER};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

pub(crate) async fn process(req: HttpRequest, db: web::Data<Database>) -> impl Responder {
    let log = RequestLog::for_request(&req);
    match available_channels(&db).await {
        Ok(channels) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "success",
                "channels": channels,
                "traceId": log.trace_id(),
            })),
        Err(e) => e.to_response(&log),
    }
}

async fn available_channels(db: &Database) -> Result<Vec<String>, ApiError> {
    let conn = db.lock().await;
    let mut stmt = conn.prepare(
        "SELECT DISTINCT channel FROM reviews WHERE channel IS NOT NULL ORDER BY channel ASC",
    )?;
    let channels: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(channels.into_iter().filter(|c| !c.is_empty()).collect())
}
