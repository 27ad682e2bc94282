//! # API Response Models
//!
//! Structures for outgoing API response bodies.
//! All responses are wrapped in a standard format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FundingPolicy;
use crate::services::{FaucetState, FundingForm, SubmissionResult};
use crate::utils::format_coins;

/// Standard API response wrapper.
///
/// All API responses follow this format:
///
/// ## Success Response
///
/// ```json
/// {
///     "success": true,
///     "data": { ... },
///     "error": null
/// }
/// ```
///
/// ## Error Response
///
/// ```json
/// {
///     "success": false,
///     "data": null,
///     "error": {
///         "code": "STATE_UNAVAILABLE",
///         "message": "rpc GetInfo failed: ..."
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,

    /// Response data (null on error).
    pub data: Option<T>,

    /// Error information (null on success).
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// API error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error code (e.g., "STATE_UNAVAILABLE").
    pub code: String,

    /// Human-readable error message.
    pub message: String,
}

/// Faucet state, returned by `GET /state`.
///
/// Carries every field of `FaucetState` plus the channel size bounds
/// formatted in coins for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: FaucetState,

    /// e.g. `"0.0005"`
    pub min_channel_coins: String,

    pub max_channel_coins: String,
}

impl From<FaucetState> for StateResponse {
    fn from(state: FaucetState) -> Self {
        Self {
            min_channel_coins: format_coins(state.min_channel_size),
            max_channel_coins: format_coins(state.max_channel_size),
            state,
        }
    }
}

/// Result of a funding submission, returned by `POST /channels`.
///
/// ## Example Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "opened": false,
///         "outcome": "channel-too-small",
///         "message": "Minimum channel size is 0.0005",
///         "node": "02a1b2c3...",
///         "amt": "0.0001",
///         "bal": "0",
///         "channelTxid": null
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenChannelResponse {
    /// True when the funding transaction was broadcast.
    pub opened: bool,

    /// Outcome code, `"none"` on success.
    pub outcome: String,

    /// Message for the user, empty on success.
    pub message: String,

    /// Form fields echoed back so the form can be refilled.
    pub node: String,
    pub amt: String,
    pub bal: String,

    /// Funding transaction id, set only on success.
    pub channel_txid: Option<String>,
}

impl OpenChannelResponse {
    pub fn new(form: FundingForm, result: &SubmissionResult, policy: &FundingPolicy) -> Self {
        Self {
            opened: result.outcome.is_success(),
            outcome: result.outcome.code().to_string(),
            message: result.outcome.message(policy),
            node: form.node,
            amt: form.amt,
            bal: form.bal,
            channel_txid: result.funding_txid.map(|txid| txid.to_string()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status: "healthy" or "unhealthy".
    pub status: String,

    /// Whether the channel daemon answered.
    pub daemon: bool,

    /// Service version.
    pub version: String,

    /// Current timestamp.
    pub timestamp: DateTime<Utc>,
}
