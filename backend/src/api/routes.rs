//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::web;

use super::handlers;

/// Configure all API routes.
///
/// ## Route Structure
///
/// ```text
/// /
/// ├── /health      GET  - Health check
/// ├── /state       GET  - Faucet state
/// └── /channels    POST - Open a channel
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint - API information
        .route("/", web::get().to(handlers::api_info))

        // Health check endpoint
        .route("/health", web::get().to(handlers::health_check))

        // Home page state
        .route("/state", web::get().to(handlers::get_state))

        // Funding form submission
        .route("/channels", web::post().to(handlers::open_channel));
}
