//! Handler for `GET /api/reviews/property/{property_id}`: property identity
//! and metadata by external source id. A miss is a success-shaped not-found
//! body, not an error.

use crate::db::Database;
use crate::error::ApiError;
use crate::logging::{RequestLog, TRACE_HEADER};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::property::PropertyInfo;
use rusqlite::{params, OptionalExtension};
use serde_json::json;

pub(crate) async fn process(
    req: HttpRequest,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);
    let property_id = path.into_inner();

    match property_by_source_id(&db, &property_id).await {
        Ok(Some(property)) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "success",
                "property": property,
                "traceId": log.trace_id(),
            })),
        Ok(None) => HttpResponse::Ok()
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(json!({
                "status": "error",
                "message": "Property not found",
                "traceId": log.trace_id(),
            })),
        Err(e) => e.to_response(&log),
    }
}

async fn property_by_source_id(
    db: &Database,
    source_id: &str,
) -> Result<Option<PropertyInfo>, ApiError> {
    let conn = db.lock().await;
    let property = conn
        .query_row(
            "SELECT source_id, name, categories FROM businesses WHERE source_id = ?1",
            params![source_id],
            |row| {
                Ok(PropertyInfo {
                    property_id: row.get(0)?,
                    property_name: row.get(1)?,
                    categories: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(property)
}
