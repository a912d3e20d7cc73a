//! Per-request logging context.
//!
//! A `RequestLog` is built once at the top of every handler from the
//! `x-trace-id` header (generating a fresh UUID when the caller sent none)
//! and passed down explicitly to the functions doing the work. Every line it
//! emits is prefixed with `[<trace-id>]` so concurrent requests can be told
//! apart in the log stream, and the id is echoed back to the caller in both
//! the response body and the `x-trace-id` header.

use actix_web::HttpRequest;
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";

#[derive(Debug, Clone)]
pub struct RequestLog {
    trace_id: String,
}

impl RequestLog {
    pub fn new(trace_id: impl Into<String>) -> Self {
        RequestLog {
            trace_id: trace_id.into(),
        }
    }

    /// Builds the context for an incoming request and logs the request line.
    pub fn for_request(req: &HttpRequest) -> Self {
        let trace_id = req
            .headers()
            .get(TRACE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let log = RequestLog::new(trace_id);
        log.info(&format!("{} {}", req.method(), req.path()));
        log
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn debug(&self, message: &str) {
        log::debug!("[{}] {}", self.trace_id, message);
    }

    pub fn info(&self, message: &str) {
        log::info!("[{}] {}", self.trace_id, message);
    }

    pub fn warn(&self, message: &str) {
        log::warn!("[{}] {}", self.trace_id, message);
    }

    pub fn error(&self, message: &str) {
        log::error!("[{}] {}", self.trace_id, message);
    }
}
