//! # ra-api
//!
//! The web routing and orchestration layer for Rusty-Ads.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the ads API.
///
/// # Developer Note
/// Everything is mounted under `/api/v1`. Query-string lowercasing is an
/// `App`-level middleware (see [`middleware::lowercase_query`]) because it
/// has to run before routing.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            // Ad creation
            .route("/ad", web::post().to(handlers::create_ad))
            // Single ad with optional extra fields
            .route("/ads/{ad_id}", web::get().to(handlers::get_ad))
            // Sorted, paginated listing
            .route("/ads", web::get().to(handlers::list_ads)),
    );
}
