use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, Level, error, info, info_span, warn};

use super::request_id::RequestId;

/// Log each request on entry and on completion, inside a span carrying the
/// request id. Completion is logged at error for 5xx and warn for 4xx.
pub async fn log_request(req: Request, next: Next) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_owned())
        .unwrap_or_default();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    async move {
        info!("started");
        let start = Instant::now();
        let resp = next.run(req).await;

        let status = resp.status();
        let elapsed = start.elapsed();
        let reason = status.canonical_reason().unwrap_or("");
        let level = level_for(status.as_u16());
        if level == Level::ERROR {
            error!(?elapsed, "completed with {} {}", status.as_u16(), reason);
        } else if level == Level::WARN {
            warn!(?elapsed, "completed with {} {}", status.as_u16(), reason);
        } else {
            info!(?elapsed, "completed with {} {}", status.as_u16(), reason);
        }
        resp
    }
    .instrument(span)
    .await
}

fn level_for(status: u16) -> Level {
    match status {
        500.. => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}
