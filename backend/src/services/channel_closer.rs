//! # Channel Closer
//!
//! Requests a close and returns the closing transaction id from the first
//! update. A cooperative close needs the peer online; a forced close
//! broadcasts the faucet's latest commitment on its own.

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tracing::{error, info};

use crate::lnd::{ChannelGateway, CloseUpdate, GatewayError};
use crate::utils::{ChannelPoint, ChannelPointError, TxId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloseError {
    #[error("invalid channel point: {0}")]
    InvalidChannelPoint(#[from] ChannelPointError),

    #[error("channel close failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("close stream ended before the close was pending")]
    StreamEnded,

    #[error("expected a close pending update first, got {0}")]
    UnexpectedUpdate(String),
}

/// Issues close requests to the daemon.
///
/// The caller picks `force`; the closer never looks at channel state first,
/// so a forced close of a channel that is already closing is passed through
/// to the daemon as is.
///
/// ## Usage
///
/// ```rust,ignore
/// let closer = ChannelCloser::new(gateway);
/// let closing_txid = closer.close(&point, true).await?;
/// ```
#[derive(Clone)]
pub struct ChannelCloser {
    gateway: Arc<dyn ChannelGateway>,
}

impl ChannelCloser {
    /// Create a new ChannelCloser.
    ///
    /// ## Arguments
    ///
    /// * `gateway` - Channel daemon gateway the close is sent through
    pub fn new(gateway: Arc<dyn ChannelGateway>) -> Self {
        Self { gateway }
    }

    /// Close the channel at `point`. Returns the closing transaction id.
    pub async fn close(&self, point: &ChannelPoint, force: bool) -> Result<TxId, CloseError> {
        info!("Closing channel {} (force: {})", point, force);

        let mut updates = self.gateway.close_channel(point, force).await?;

        match updates.next().await {
            Some(Ok(CloseUpdate::ClosePending { closing_txid })) => {
                info!("Channel {} closing in tx {}", point, closing_txid);
                Ok(closing_txid)
            }
            Some(Ok(other)) => {
                error!("Unexpected first close update for {}: {:?}", point, other);
                Err(CloseError::UnexpectedUpdate(format!("{:?}", other)))
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(CloseError::StreamEnded),
        }
    }
}
