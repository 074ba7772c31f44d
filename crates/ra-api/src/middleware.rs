//! rusty-ads/crates/ra-api/src/middleware.rs Middleware
//!
//! Custom middleware for request normalization and logging.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Uri;
use actix_web::middleware::{Logger, Next};
use actix_web::Error;
use tracing::warn;

// Returns the access logger for the Rusty-Ads API.
pub fn standard_middleware() -> Logger {
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Lowercases the whole query string so `?sortBy=Price` and
/// `?sortby=price` are the same request. The path is left untouched.
///
/// Must be mounted with `middleware::from_fn` on the `App`, before routing.
pub async fn lowercase_query(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(rewritten) = lowered_uri(req.uri()) {
        match rewritten.parse::<Uri>() {
            Ok(uri) => {
                req.match_info_mut().get_mut().update(&uri);
                req.head_mut().uri = uri;
            }
            Err(err) => warn!(error = %err, "could not rebuild lowercased uri"),
        }
    }
    next.call(req).await
}

fn lowered_uri(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    let lowered = query.to_lowercase();
    (lowered != query).then(|| format!("{}?{}", uri.path(), lowered))
}
