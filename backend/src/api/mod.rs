//! # REST API Module
//!
//! This module defines all HTTP endpoints of the faucet.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | API information |
//! | GET | `/health` | Daemon reachability |
//! | GET | `/state` | Balance, node address and channels |
//! | POST | `/channels` | Request a channel from the faucet |
//!
//! ## Request/Response Format
//!
//! All requests and responses use JSON:
//!
//! ```json
//! // Success response
//! {
//!     "success": true,
//!     "data": { ... }
//! }
//!
//! // Error response
//! {
//!     "success": false,
//!     "error": {
//!         "code": "ERROR_CODE",
//!         "message": "Human readable message"
//!     }
//! }
//! ```
//!
//! A rejected funding request is not an error: `POST /channels` answers
//! `success: true` with the outcome inside `data`.

pub mod handlers;
pub mod routes;

pub use routes::configure_routes;
