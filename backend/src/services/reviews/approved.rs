//! Handlers for the public approved-review listings:
//! `GET /api/reviews/approved` and `GET /api/reviews/approved/{property_id}`.
//! Only reviews a manager has approved are visible here, newest first.

use crate::db::Database;
use crate::logging::RequestLog;
use crate::services::reviews::{paginated_response, params, query};
use actix_web::{web, HttpRequest, Responder};
use common::requests::{PageRequest, ReviewFilters, ReviewSort, SortDirection, SortField};

pub(crate) async fn process(
    req: HttpRequest,
    raw_query: web::Query<Vec<(String, String)>>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);
    match params::parse_page_params(&raw_query) {
        Ok(page) => fetch_approved(&db, None, page, &log).await,
        Err(e) => e.to_response(&log),
    }
}

pub(crate) async fn process_for_property(
    req: HttpRequest,
    path: web::Path<String>,
    raw_query: web::Query<Vec<(String, String)>>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);
    let property_id = path.into_inner();
    match params::parse_page_params(&raw_query) {
        Ok(page) => fetch_approved(&db, Some(property_id), page, &log).await,
        Err(e) => e.to_response(&log),
    }
}

async fn fetch_approved(
    db: &Database,
    property_id: Option<String>,
    page: PageRequest,
    log: &RequestLog,
) -> actix_web::HttpResponse {
    let filters = ReviewFilters {
        approved: Some(true),
        listing_id: property_id,
        ..Default::default()
    };
    let sort = ReviewSort {
        field: SortField::SubmittedAt,
        direction: SortDirection::Desc,
    };

    match query::fetch_page(db, &filters, Some(&sort), &page, log).await {
        Ok(result) => paginated_response(log, result),
        Err(e) => e.to_response(log),
    }
}
