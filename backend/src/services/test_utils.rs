//! Scripted in-memory gateway for service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;

use crate::lnd::{
    ChannelGateway, ChannelRecord, CloseUpdate, FundingRequest, GatewayError, NodeInfo,
    OpenUpdate, PeerRecord, PendingChannelRecord, UpdateStream, WalletBalance,
};
use crate::utils::{ChannelPoint, TxId};

/// 33-byte compressed public key in hex, distinct per `n`.
pub fn pubkey(n: u8) -> String {
    let mut key = vec![n; 33];
    key[0] = 0x02;
    hex::encode(key)
}

/// Transaction id whose every byte is `n`.
pub fn txid(n: u8) -> TxId {
    TxId::from_slice(&[n; 32]).expect("32 bytes")
}

/// Canonical channel point string for `txid(n):0`.
pub fn point_str(n: u8) -> String {
    ChannelPoint::new(txid(n), 0).to_string()
}

pub fn channel(n: u8, remote: &str, active: bool) -> ChannelRecord {
    ChannelRecord {
        channel_point: point_str(n),
        remote_pubkey: remote.to_string(),
        active,
        capacity: 1_000_000,
        local_balance: 900_000,
        remote_balance: 100_000,
    }
}

fn rpc_failure(method: &'static str) -> GatewayError {
    GatewayError::Rpc {
        method,
        message: "daemon unavailable".to_string(),
    }
}

/// What the next `open_channel` call does.
#[derive(Clone)]
pub enum OpenScript {
    /// The call itself fails.
    CallFails,
    /// The call succeeds and the stream yields these items.
    Stream(Vec<Result<OpenUpdate, GatewayError>>),
}

pub struct MockGateway {
    node_info: Mutex<Result<NodeInfo, GatewayError>>,
    peers: Mutex<Result<Vec<PeerRecord>, GatewayError>>,
    channels: Mutex<Result<Vec<ChannelRecord>, GatewayError>>,
    pending: Mutex<Result<Vec<PendingChannelRecord>, GatewayError>>,
    balance: Mutex<Result<WalletBalance, GatewayError>>,
    last_seen: Mutex<HashMap<String, DateTime<Utc>>>,
    open_script: Mutex<OpenScript>,
    close_updates: Mutex<Vec<Result<CloseUpdate, GatewayError>>>,
    failing_closes: Mutex<HashSet<ChannelPoint>>,
    calls: Mutex<Vec<String>>,
    opened: Mutex<Vec<FundingRequest>>,
    closed: Mutex<Vec<(ChannelPoint, bool)>>,
}

impl MockGateway {
    /// A healthy daemon with no peers, no channels and 10 coins.
    pub fn new() -> Self {
        Self {
            node_info: Mutex::new(Ok(NodeInfo {
                identity_pubkey: pubkey(0xfa),
                version: "0.3.0-beta commit=0123456789abcdef0123456789abcdef01234567"
                    .to_string(),
                uris: vec![format!("{}@10.0.0.9:9735", pubkey(0xfa))],
            })),
            peers: Mutex::new(Ok(Vec::new())),
            channels: Mutex::new(Ok(Vec::new())),
            pending: Mutex::new(Ok(Vec::new())),
            balance: Mutex::new(Ok(WalletBalance {
                confirmed_balance: 1_000_000_000,
            })),
            last_seen: Mutex::new(HashMap::new()),
            open_script: Mutex::new(OpenScript::Stream(vec![Ok(OpenUpdate::ChannelPending {
                funding_txid: txid(0xaa),
                output_index: 0,
            })])),
            close_updates: Mutex::new(vec![Ok(CloseUpdate::ClosePending {
                closing_txid: txid(0xcc),
            })]),
            failing_closes: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_peer(self, pubkey: &str) -> Self {
        if let Ok(peers) = self.peers.lock().unwrap().as_mut() {
            peers.push(PeerRecord {
                pubkey: pubkey.to_string(),
            });
        }
        self
    }

    pub fn with_channel(self, record: ChannelRecord) -> Self {
        if let Ok(channels) = self.channels.lock().unwrap().as_mut() {
            channels.push(record);
        }
        self
    }

    pub fn with_pending(self, remote_pubkey: &str) -> Self {
        if let Ok(pending) = self.pending.lock().unwrap().as_mut() {
            pending.push(PendingChannelRecord {
                remote_pubkey: remote_pubkey.to_string(),
                channel_point: point_str(0x99),
                capacity: 500_000,
            });
        }
        self
    }

    pub fn with_last_seen(self, pubkey: &str, at: DateTime<Utc>) -> Self {
        self.last_seen.lock().unwrap().insert(pubkey.to_string(), at);
        self
    }

    pub fn with_open_script(self, script: OpenScript) -> Self {
        *self.open_script.lock().unwrap() = script;
        self
    }

    pub fn with_close_updates(self, updates: Vec<Result<CloseUpdate, GatewayError>>) -> Self {
        *self.close_updates.lock().unwrap() = updates;
        self
    }

    pub fn with_failing_close(self, point: &str) -> Self {
        let point: ChannelPoint = point.parse().expect("valid channel point");
        self.failing_closes.lock().unwrap().insert(point);
        self
    }

    pub fn fail_node_info(self) -> Self {
        *self.node_info.lock().unwrap() = Err(rpc_failure("GetInfo"));
        self
    }

    pub fn fail_list_peers(self) -> Self {
        *self.peers.lock().unwrap() = Err(rpc_failure("ListPeers"));
        self
    }

    pub fn fail_list_channels(self) -> Self {
        *self.channels.lock().unwrap() = Err(rpc_failure("ListChannels"));
        self
    }

    pub fn fail_pending_channels(self) -> Self {
        *self.pending.lock().unwrap() = Err(rpc_failure("PendingChannels"));
        self
    }

    pub fn fail_wallet_balance(self) -> Self {
        *self.balance.lock().unwrap() = Err(rpc_failure("WalletBalance"));
        self
    }

    /// Names of the gateway methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == method)
            .count()
    }

    pub fn opened(&self) -> Vec<FundingRequest> {
        self.opened.lock().unwrap().clone()
    }

    /// Channel points passed to `close_channel`, with their force flag.
    pub fn closed(&self) -> Vec<(ChannelPoint, bool)> {
        self.closed.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl ChannelGateway for MockGateway {
    async fn get_node_info(&self) -> Result<NodeInfo, GatewayError> {
        self.record("get_node_info");
        self.node_info.lock().unwrap().clone()
    }

    async fn list_peers(&self) -> Result<Vec<PeerRecord>, GatewayError> {
        self.record("list_peers");
        self.peers.lock().unwrap().clone()
    }

    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, GatewayError> {
        self.record("list_channels");
        self.channels.lock().unwrap().clone()
    }

    async fn pending_channels(&self) -> Result<Vec<PendingChannelRecord>, GatewayError> {
        self.record("pending_channels");
        self.pending.lock().unwrap().clone()
    }

    async fn wallet_balance(&self) -> Result<WalletBalance, GatewayError> {
        self.record("wallet_balance");
        self.balance.lock().unwrap().clone()
    }

    async fn peer_last_seen(&self, pubkey: &str) -> Result<DateTime<Utc>, GatewayError> {
        self.record("peer_last_seen");
        self.last_seen
            .lock()
            .unwrap()
            .get(pubkey)
            .copied()
            .ok_or_else(|| rpc_failure("GetNodeInfo"))
    }

    async fn open_channel(
        &self,
        request: &FundingRequest,
    ) -> Result<UpdateStream<OpenUpdate>, GatewayError> {
        self.record("open_channel");
        self.opened.lock().unwrap().push(request.clone());
        match self.open_script.lock().unwrap().clone() {
            OpenScript::CallFails => Err(rpc_failure("OpenChannel")),
            OpenScript::Stream(items) => Ok(futures::stream::iter(items).boxed()),
        }
    }

    async fn close_channel(
        &self,
        channel_point: &ChannelPoint,
        force: bool,
    ) -> Result<UpdateStream<CloseUpdate>, GatewayError> {
        self.record("close_channel");
        self.closed.lock().unwrap().push((*channel_point, force));
        if self.failing_closes.lock().unwrap().contains(channel_point) {
            return Err(rpc_failure("CloseChannel"));
        }
        let items = self.close_updates.lock().unwrap().clone();
        Ok(futures::stream::iter(items).boxed())
    }
}

/// A daemon that accepts every call and never answers.
pub struct HangingGateway;

#[async_trait]
impl ChannelGateway for HangingGateway {
    async fn get_node_info(&self) -> Result<NodeInfo, GatewayError> {
        futures::future::pending().await
    }

    async fn list_peers(&self) -> Result<Vec<PeerRecord>, GatewayError> {
        futures::future::pending().await
    }

    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, GatewayError> {
        futures::future::pending().await
    }

    async fn pending_channels(&self) -> Result<Vec<PendingChannelRecord>, GatewayError> {
        futures::future::pending().await
    }

    async fn wallet_balance(&self) -> Result<WalletBalance, GatewayError> {
        futures::future::pending().await
    }

    async fn peer_last_seen(&self, _pubkey: &str) -> Result<DateTime<Utc>, GatewayError> {
        futures::future::pending().await
    }

    async fn open_channel(
        &self,
        _request: &FundingRequest,
    ) -> Result<UpdateStream<OpenUpdate>, GatewayError> {
        futures::future::pending().await
    }

    async fn close_channel(
        &self,
        _channel_point: &ChannelPoint,
        _force: bool,
    ) -> Result<UpdateStream<CloseUpdate>, GatewayError> {
        futures::future::pending().await
    }
}
