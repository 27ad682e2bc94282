//! # Channel Opener
//!
//! Submits an approved funding request and waits only for the first
//! update, which carries the funding transaction id. Confirmation is not
//! awaited; the stream is dropped once that update arrives.
//!
//! ```text
//! open_channel(request) ──► stream
//!                              │
//!                              ├── first item ChannelPending ──► Ok(channel point)
//!                              ├── first item anything else  ──► Err(UnexpectedUpdate)
//!                              ├── first item error          ──► Err(Gateway)
//!                              └── stream ends               ──► Err(StreamEnded)
//! ```

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tracing::{error, info};

use crate::lnd::{ChannelGateway, FundingRequest, GatewayError, OpenUpdate};
use crate::utils::ChannelPoint;

/// Errors from a single open attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    #[error("channel open failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("open stream ended before the channel was pending")]
    StreamEnded,

    #[error("expected a pending update first, got {0}")]
    UnexpectedUpdate(String),
}

/// Opens channels for validated funding requests.
///
/// An open is never retried: once the daemon has the request the funding
/// transaction may already be broadcast.
///
/// ## Usage
///
/// ```rust,ignore
/// let opener = ChannelOpener::new(gateway);
/// let point = opener.open(&request).await?;
/// info!("Funding tx {}", point.txid);
/// ```
#[derive(Clone)]
pub struct ChannelOpener {
    gateway: Arc<dyn ChannelGateway>,
}

impl ChannelOpener {
    /// Create a new ChannelOpener.
    ///
    /// ## Arguments
    ///
    /// * `gateway` - Channel daemon gateway the open is sent through
    pub fn new(gateway: Arc<dyn ChannelGateway>) -> Self {
        Self { gateway }
    }

    /// Open a channel and return its funding outpoint once pending.
    pub async fn open(&self, request: &FundingRequest) -> Result<ChannelPoint, OpenError> {
        let peer = request.node_pubkey_hex();
        info!(
            "Opening channel with {}: {} atoms, push {}",
            peer, request.local_funding_amount, request.push_amount
        );

        let mut updates = self.gateway.open_channel(request).await.map_err(|e| {
            error!("Open channel call to {} failed: {}", peer, e);
            OpenError::from(e)
        })?;

        let first = match updates.next().await {
            Some(Ok(update)) => update,
            Some(Err(e)) => {
                error!("Open channel stream for {} failed: {}", peer, e);
                return Err(e.into());
            }
            None => {
                error!("Open channel stream for {} closed without updates", peer);
                return Err(OpenError::StreamEnded);
            }
        };

        match first {
            OpenUpdate::ChannelPending {
                funding_txid,
                output_index,
            } => {
                let point = ChannelPoint::new(funding_txid, output_index);
                info!("Channel with {} pending at {}", peer, point);
                Ok(point)
            }
            other => {
                error!("Unexpected first open update for {}: {:?}", peer, other);
                Err(OpenError::UnexpectedUpdate(format!("{:?}", other)))
            }
        }
    }
}
