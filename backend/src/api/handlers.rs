//! # API Request Handlers
//!
//! This module contains the handler functions for each API endpoint.
//! Each handler:
//! 1. Extracts request data
//! 2. Calls the faucet
//! 3. Returns a formatted response
//!
//! ## Error Handling
//!
//! Daemon failures are returned as JSON:
//!
//! ```json
//! {
//!     "success": false,
//!     "error": {
//!         "code": "STATE_UNAVAILABLE",
//!         "message": "rpc WalletBalance failed: ..."
//!     }
//! }
//! ```

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::models::{
    ApiResponse, HealthResponse, OpenChannelRequest, OpenChannelResponse, StateResponse,
};
use crate::services::FundingForm;
use crate::AppState;

/// API information endpoint (root).
///
/// ## Endpoint
///
/// `GET /`
pub async fn api_info() -> HttpResponse {
    let info = json!({
        "name": "Lightning Faucet API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Opens payment channels to requesting nodes",
        "endpoints": {
            "health": {
                "method": "GET",
                "path": "/health",
                "description": "Health check endpoint"
            },
            "state": {
                "method": "GET",
                "path": "/state",
                "description": "Faucet balance, node address and channels"
            },
            "channels": {
                "method": "POST",
                "path": "/channels",
                "description": "Request a channel with an optional initial balance"
            }
        }
    });

    HttpResponse::Ok()
        .content_type("application/json")
        .json(ApiResponse::success(info))
}

/// Health check endpoint.
///
/// Healthy when the channel daemon answers `GetInfo`.
///
/// ## Endpoint
///
/// `GET /health`
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:8080/health
/// ```
pub async fn health_check(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let daemon_healthy = state.faucet.is_daemon_reachable().await;

    let response = HealthResponse {
        status: if daemon_healthy { "healthy" } else { "unhealthy" }.to_string(),
        daemon: daemon_healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    let status_code = if daemon_healthy {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(ApiResponse::success(response))
}

/// Current faucet state.
///
/// ## Endpoint
///
/// `GET /state`
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "balance": 10.5,
///         "balanceAtoms": 1050000000,
///         "nodeCommitHash": "0123456789abcdef0123456789abcdef01234567",
///         "nodeAddress": "03ab...@10.0.0.9:9735",
///         "numConfs": 3,
///         "network": "decred",
///         "activeChannels": [],
///         "pendingChannels": [],
///         "minChannelSize": 50000,
///         "maxChannelSize": 1073741824,
///         "registeredChannels": [],
///         "minChannelCoins": "0.0005",
///         "maxChannelCoins": "10.73741824"
///     }
/// }
/// ```
pub async fn get_state(state: web::Data<Arc<AppState>>) -> HttpResponse {
    match state.faucet.fetch_state().await {
        Ok(faucet_state) => {
            HttpResponse::Ok().json(ApiResponse::success(StateResponse::from(faucet_state)))
        }
        Err(e) => {
            error!("Fetching faucet state failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("STATE_UNAVAILABLE", &e.to_string()))
        }
    }
}

/// Submit the funding form.
///
/// ## Endpoint
///
/// `POST /channels`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/channels \
///   -H "Content-Type: application/json" \
///   -d '{
///     "node": "02a1b2c3...",
///     "amt": "0.5",
///     "bal": "0.1"
///   }'
/// ```
///
/// Validation failures and failed opens come back with HTTP 200 and the
/// outcome code in `data.outcome`.
pub async fn open_channel(
    state: web::Data<Arc<AppState>>,
    body: web::Json<OpenChannelRequest>,
) -> HttpResponse {
    let form = FundingForm::from(body.into_inner());
    let result = state.faucet.submit_funding(&form).await;

    if let Some(txid) = &result.funding_txid {
        info!("Channel funded in tx {}", txid);
    }

    let response = OpenChannelResponse::new(form, &result, state.faucet.policy());
    HttpResponse::Ok().json(ApiResponse::success(response))
}
