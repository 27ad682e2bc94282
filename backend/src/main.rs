//! # Lightning Faucet Backend Service
//!
//! This is the main entry point for the faucet that hands out payment
//! channels from a remote channel daemon. It provides:
//!
//! - JSON API for the faucet page (state, channel requests)
//! - A background sweeper that force-closes abandoned channels
//! - A wipe mode that closes every channel and exits
//! - A single-close mode for one channel point
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        FAUCET SERVICE                         │
//! │                                                               │
//! │  ┌─────────────────────┐       ┌───────────────────────────┐  │
//! │  │  REST API (Actix)   │       │   Background Services     │  │
//! │  │  /state             │       │   • Zombie Sweeper        │  │
//! │  │  /channels          │       │                           │  │
//! │  └─────────────────────┘       └───────────────────────────┘  │
//! │             │                                │                │
//! │             └───────────────┬────────────────┘                │
//! │                             │                                 │
//! │  ┌──────────────────────────┴────────────────────────────┐    │
//! │  │                     SERVICE LAYER                     │    │
//! │  │  LightningFaucet • PolicyValidator • Opener • Closer  │    │
//! │  └───────────────────────────────────────────────────────┘    │
//! │                             │                                 │
//! │                    ┌────────┴────────┐                        │
//! │                    │ Channel daemon  │                        │
//! │                    │ gRPC (tonic)    │                        │
//! │                    └─────────────────┘                        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Run a channel daemon with its gRPC port reachable
//! 2. Copy `.env.example` to `.env` and point it at the daemon's
//!    certificate and admin macaroon
//! 3. Start the server: `cargo run`
//!
//! Set `WIPE_CHANNELS=true` to close every channel instead of serving, or
//! `CLOSE_CHANNEL=<txid>:<index>[,force]` to close one channel and exit.

use std::io;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod api;
mod config;
mod lnd;
mod models;
mod services;
mod utils;

use config::AppConfig;
use lnd::LndGateway;
use services::LightningFaucet;

/// Application state shared across all handlers.
pub struct AppState {
    /// Channel lifecycle operations over the daemon connection.
    pub faucet: LightningFaucet,
}

/// Main entry point for the faucet.
///
/// This function:
/// 1. Loads configuration from environment
/// 2. Initializes logging
/// 3. Connects to the channel daemon
/// 4. Closes one channel, wipes all channels, or starts the sweeper and
///    HTTP server
#[actix_web::main]
async fn main() -> io::Result<()> {
    // =========================================
    // STEP 1: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let config = AppConfig::from_env();

    // =========================================
    // STEP 2: Initialize Logging
    // =========================================
    // Installed before the config result is checked so a bad config is logged
    let log_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&log_level)?;

    let config = config.map_err(startup_error)?;

    info!("Starting Lightning Faucet");
    info!("   Daemon: {}", config.lnd_grpc_host);
    info!("   Network: {}", config.network);

    let policy = config.funding_policy().map_err(startup_error)?;

    // =========================================
    // STEP 3: Connect to the Channel Daemon
    // =========================================
    let gateway = LndGateway::connect(&config).await.map_err(startup_error)?;

    let faucet = LightningFaucet::new(
        Arc::new(gateway),
        policy,
        config.network.clone(),
        config.num_confs,
    );

    // =========================================
    // STEP 4a: Single Close / Wipe Mode
    // =========================================
    if let Some(close) = &config.close_channel {
        return close_single_channel(&faucet, &close.channel_point, close.force).await;
    }

    if config.wipe_channels {
        return wipe_channels(&faucet).await;
    }

    // =========================================
    // STEP 4b: Start Background Services
    // =========================================
    let (shutdown_trigger, shutdown_listener) = triggered::trigger();

    let sweeper = faucet.sweeper();
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run(shutdown_listener).await;
    });

    info!("Zombie sweeper started");

    // =========================================
    // STEP 5: Start HTTP Server
    // =========================================
    let app_state = Arc::new(AppState { faucet });

    let server_host = config.server_host.clone();
    let server_port = config.server_port;

    info!("Starting HTTP server on {}:{}", server_host, server_port);

    let server_result = HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await;

    // =========================================
    // STEP 6: Shutdown
    // =========================================
    info!("HTTP server stopped, shutting down sweeper");
    shutdown_trigger.trigger();
    if let Err(e) = sweeper_handle.await {
        error!("Zombie sweeper task failed: {}", e);
    }

    server_result
}

/// Close every channel once and exit.
async fn wipe_channels(faucet: &LightningFaucet) -> io::Result<()> {
    info!("Wipe mode: closing all channels");

    let attempts = faucet.close_all_channels().await.map_err(startup_error)?;

    let failed = attempts.iter().filter(|a| a.result.is_err()).count();
    for attempt in &attempts {
        if let Ok(txid) = &attempt.result {
            info!(
                "Closed {} (force: {}) in tx {}",
                attempt.channel_point, attempt.force, txid
            );
        }
    }

    info!(
        "Wipe finished: {} closing, {} failed",
        attempts.len() - failed,
        failed
    );
    Ok(())
}

/// Close one channel and exit. Any failure makes the process exit non-zero.
async fn close_single_channel(
    faucet: &LightningFaucet,
    channel_point: &str,
    force: bool,
) -> io::Result<()> {
    info!("Closing channel {} (force: {})", channel_point, force);

    let txid = faucet
        .close_channel(channel_point, force)
        .await
        .map_err(startup_error)?;

    info!("Channel {} closing in tx {}", channel_point, txid);
    Ok(())
}

/// Install the global fmt subscriber. RUST_LOG wins over `log_level`.
fn init_tracing(log_level: &str) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

fn startup_error<E: std::fmt::Display>(e: E) -> io::Error {
    error!("Startup failed: {}", e);
    io::Error::new(io::ErrorKind::Other, e.to_string())
}
