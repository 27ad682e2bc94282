//! # Channel Daemon Gateway
//!
//! This module is the faucet's only view of the remote payment-channel
//! daemon. Everything the faucet knows about channels, peers and funds is
//! re-queried through the `ChannelGateway` trait; nothing is cached here.
//!
//! ## Operations
//!
//! | Operation | Daemon RPC | Kind |
//! |-----------|-----------|------|
//! | `get_node_info` | `GetInfo` | unary |
//! | `list_peers` | `ListPeers` | unary |
//! | `list_channels` | `ListChannels` | unary |
//! | `pending_channels` | `PendingChannels` | unary |
//! | `wallet_balance` | `WalletBalance` | unary |
//! | `peer_last_seen` | `GetNodeInfo` | unary |
//! | `open_channel` | `OpenChannel` | server stream |
//! | `close_channel` | `CloseChannel` | server stream |
//!
//! ## Failure Model
//!
//! Every call may fail with a transport or daemon error. Nothing in this
//! layer retries, and no timeout is imposed: a daemon that hangs also hangs
//! the calling task.

pub mod client;
pub mod lnrpc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::Serialize;
use thiserror::Error;

use crate::utils::{ChannelPoint, TxId};

pub use client::LndGateway;

/// Errors returned by the channel daemon gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The connection to the daemon could not be set up.
    #[error("unable to connect to channel daemon: {0}")]
    Connect(String),

    /// A call was rejected by the daemon or failed in transport.
    #[error("rpc {method} failed: {message}")]
    Rpc {
        method: &'static str,
        message: String,
    },

    /// An update stream yielded an error.
    #[error("update stream failed: {0}")]
    Stream(String),

    /// The daemon answered with something the faucet cannot interpret.
    #[error("invalid response from daemon: {0}")]
    InvalidResponse(String),
}

/// Identity and build information of the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub identity_pubkey: String,
    pub version: String,
    /// Advertised `pubkey@host:port` URIs.
    pub uris: Vec<String>,
}

/// A currently connected peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub pubkey: String,
}

/// An open channel as reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    /// Funding outpoint in `<txid>:<index>` form, unparsed.
    pub channel_point: String,
    pub remote_pubkey: String,
    pub active: bool,
    pub capacity: i64,
    pub local_balance: i64,
    pub remote_balance: i64,
}

/// A channel whose funding transaction is not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChannelRecord {
    pub remote_pubkey: String,
    pub channel_point: String,
    pub capacity: i64,
}

/// On-chain wallet balance in atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletBalance {
    pub confirmed_balance: i64,
}

/// A validated request to fund a channel.
///
/// Built by the policy validator for a single open attempt and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRequest {
    /// Raw compressed public key of the peer.
    pub node_pubkey: Vec<u8>,
    /// Channel capacity in atoms.
    pub local_funding_amount: i64,
    /// Atoms credited to the peer's side at open time.
    pub push_amount: i64,
}

impl FundingRequest {
    /// Lowercase hex form of the peer key, as the daemon lists it.
    pub fn node_pubkey_hex(&self) -> String {
        hex::encode(&self.node_pubkey)
    }
}

/// One update from an open-channel stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenUpdate {
    /// Funding transaction broadcast; the channel is pending.
    ChannelPending { funding_txid: TxId, output_index: u32 },
    /// Funding transaction reached the required confirmations.
    ChannelOpen { channel_point: Option<ChannelPoint> },
    /// An update kind the faucet does not handle.
    Other,
}

/// One update from a close-channel stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseUpdate {
    /// Closing transaction broadcast.
    ClosePending { closing_txid: TxId },
    /// Closing transaction confirmed.
    ChannelClosed { closing_txid: TxId },
    Other,
}

/// Stream of decoded updates from a streaming daemon call.
///
/// Dropping the stream cancels the underlying server stream.
pub type UpdateStream<T> = BoxStream<'static, Result<T, GatewayError>>;

/// Capability interface to the remote payment-channel daemon.
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Identity, version and advertised URIs of the daemon.
    async fn get_node_info(&self) -> Result<NodeInfo, GatewayError>;

    /// Peers the daemon is currently connected to.
    async fn list_peers(&self) -> Result<Vec<PeerRecord>, GatewayError>;

    /// All open channels.
    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, GatewayError>;

    /// Channels waiting for their funding transaction to confirm.
    async fn pending_channels(&self) -> Result<Vec<PendingChannelRecord>, GatewayError>;

    async fn wallet_balance(&self) -> Result<WalletBalance, GatewayError>;

    /// Time the peer last announced itself to the network.
    async fn peer_last_seen(&self, pubkey: &str) -> Result<DateTime<Utc>, GatewayError>;

    /// Start funding a channel. The first meaningful update is
    /// `OpenUpdate::ChannelPending`.
    async fn open_channel(
        &self,
        request: &FundingRequest,
    ) -> Result<UpdateStream<OpenUpdate>, GatewayError>;

    /// Start closing a channel, unilaterally when `force` is set. The first
    /// meaningful update is `CloseUpdate::ClosePending`.
    async fn close_channel(
        &self,
        channel_point: &ChannelPoint,
        force: bool,
    ) -> Result<UpdateStream<CloseUpdate>, GatewayError>;
}
