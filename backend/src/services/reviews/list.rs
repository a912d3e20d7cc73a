//! Handler for the main review listing, `GET /api/reviews/hostaway`.
//!
//! Accepts the full filter set plus `sortBy`/`sortDir`/`page`/`limit` and
//! returns normalized reviews. The query is taken as a raw pair list so the
//! repeated-key form of `listingIds` reaches the parser intact.

use crate::db::Database;
use crate::logging::RequestLog;
use crate::services::reviews::{paginated_response, params, query};
use actix_web::{web, HttpRequest, Responder};

pub(crate) async fn process(
    req: HttpRequest,
    raw_query: web::Query<Vec<(String, String)>>,
    db: web::Data<Database>,
) -> impl Responder {
    let log = RequestLog::for_request(&req);

    let parsed = match params::parse_listing_params(&raw_query) {
        Ok(parsed) => parsed,
        Err(e) => return e.to_response(&log),
    };

    match query::fetch_page(&db, &parsed.filters, parsed.sort.as_ref(), &parsed.page, &log).await {
        Ok(page) => paginated_response(&log, page),
        Err(e) => e.to_response(&log),
    }
}
