//! Handler for `GET /api/reviews/properties`: aggregated statistics for
//! every property, optionally scoped to one channel. The full set is
//! returned unpaginated.

use crate::db::Database;
use crate::logging::{RequestLog, TRACE_HEADER};
use crate::services::reviews::stats;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

pub(crate) async fn process(
    req: HttpRequest,
    raw_query: web::Query<Vec<(String, String)>>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);

    let channel = raw_query
        .iter()
        .find(|(key, value)| key == "channel" && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string());

    match stats::property_stats(&db, channel.as_deref(), &log).await {
        Ok(properties) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "success",
                "properties": properties,
                "traceId": log.trace_id(),
            })),
        Err(e) => e.to_response(&log),
    }
}
