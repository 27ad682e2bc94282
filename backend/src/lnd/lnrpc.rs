//! Subset of the `lnrpc` protocol used by the faucet.
//!
//! Message layouts and field tags follow `lightning.proto` of lnd/dcrlnd.
//! Only the fields the faucet reads or writes are declared; prost skips the
//! rest on decode.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetInfoRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetInfoResponse {
    /// The identity pubkey of the current node.
    #[prost(string, tag = "1")]
    pub identity_pubkey: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub alias: ::prost::alloc::string::String,
    #[prost(uint32, tag = "4")]
    pub num_active_channels: u32,
    #[prost(uint32, tag = "5")]
    pub num_peers: u32,
    #[prost(uint32, tag = "6")]
    pub block_height: u32,
    #[prost(bool, tag = "9")]
    pub synced_to_chain: bool,
    /// The URIs of the current node.
    #[prost(string, repeated, tag = "12")]
    pub uris: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// The version of the daemon that is running.
    #[prost(string, tag = "14")]
    pub version: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListPeersRequest {
    #[prost(bool, tag = "1")]
    pub latest_error: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListPeersResponse {
    #[prost(message, repeated, tag = "1")]
    pub peers: ::prost::alloc::vec::Vec<Peer>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Peer {
    /// The identity pubkey of the peer
    #[prost(string, tag = "1")]
    pub pub_key: ::prost::alloc::string::String,
    /// Network address of the peer; eg `127.0.0.1:10011`
    #[prost(string, tag = "3")]
    pub address: ::prost::alloc::string::String,
    #[prost(bool, tag = "8")]
    pub inbound: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListChannelsRequest {
    #[prost(bool, tag = "1")]
    pub active_only: bool,
    #[prost(bool, tag = "2")]
    pub inactive_only: bool,
    #[prost(bool, tag = "3")]
    pub public_only: bool,
    #[prost(bool, tag = "4")]
    pub private_only: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListChannelsResponse {
    /// The list of active channels
    #[prost(message, repeated, tag = "11")]
    pub channels: ::prost::alloc::vec::Vec<Channel>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Channel {
    /// Whether this channel is active or not
    #[prost(bool, tag = "1")]
    pub active: bool,
    /// The identity pubkey of the remote node
    #[prost(string, tag = "2")]
    pub remote_pubkey: ::prost::alloc::string::String,
    ///
    ///The outpoint (txid:index) of the funding transaction. With this value, Bob
    ///will be able to generate a signature for Alice's version of the commitment
    ///transaction.
    #[prost(string, tag = "3")]
    pub channel_point: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub chan_id: u64,
    /// The total amount of funds held in this channel
    #[prost(int64, tag = "5")]
    pub capacity: i64,
    /// This node's current balance in this channel
    #[prost(int64, tag = "6")]
    pub local_balance: i64,
    /// The counterparty's current balance in this channel
    #[prost(int64, tag = "7")]
    pub remote_balance: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingChannelsRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingChannelsResponse {
    /// The balance in atoms encumbered in pending channels
    #[prost(int64, tag = "1")]
    pub total_limbo_balance: i64,
    /// Channels pending opening
    #[prost(message, repeated, tag = "2")]
    pub pending_open_channels:
        ::prost::alloc::vec::Vec<pending_channels_response::PendingOpenChannel>,
}
/// Nested message and enum types in `PendingChannelsResponse`.
pub mod pending_channels_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PendingChannel {
        #[prost(string, tag = "1")]
        pub remote_node_pub: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub channel_point: ::prost::alloc::string::String,
        #[prost(int64, tag = "3")]
        pub capacity: i64,
        #[prost(int64, tag = "4")]
        pub local_balance: i64,
        #[prost(int64, tag = "5")]
        pub remote_balance: i64,
    }
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PendingOpenChannel {
        /// The pending channel
        #[prost(message, optional, tag = "1")]
        pub channel: ::core::option::Option<PendingChannel>,
        /// The height at which this channel will be confirmed
        #[prost(uint32, tag = "2")]
        pub confirmation_height: u32,
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WalletBalanceRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WalletBalanceResponse {
    /// The balance of the wallet
    #[prost(int64, tag = "1")]
    pub total_balance: i64,
    /// The confirmed balance of a wallet(with >= 1 confirmations)
    #[prost(int64, tag = "2")]
    pub confirmed_balance: i64,
    /// The unconfirmed balance of a wallet(with 0 confirmations)
    #[prost(int64, tag = "3")]
    pub unconfirmed_balance: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeInfoRequest {
    /// The 33-byte hex-encoded compressed public of the target node
    #[prost(string, tag = "1")]
    pub pub_key: ::prost::alloc::string::String,
    /// If true, will include all known channels associated with the node.
    #[prost(bool, tag = "2")]
    pub include_channels: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeInfo {
    ///
    ///An individual vertex/node within the channel graph. A node is
    ///connected to other nodes by one or more channel edges emanating from it.
    #[prost(message, optional, tag = "1")]
    pub node: ::core::option::Option<LightningNode>,
    #[prost(uint32, tag = "2")]
    pub num_channels: u32,
    #[prost(int64, tag = "3")]
    pub total_capacity: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LightningNode {
    /// Unix timestamp of the node's last announcement.
    #[prost(uint32, tag = "1")]
    pub last_update: u32,
    #[prost(string, tag = "2")]
    pub pub_key: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub alias: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelPoint {
    /// The index of the output of the funding transaction
    #[prost(uint32, tag = "3")]
    pub output_index: u32,
    #[prost(oneof = "channel_point::FundingTxid", tags = "1, 2")]
    pub funding_txid: ::core::option::Option<channel_point::FundingTxid>,
}
/// Nested message and enum types in `ChannelPoint`.
pub mod channel_point {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum FundingTxid {
        /// Txid of the funding transaction, wire byte order.
        #[prost(bytes, tag = "1")]
        FundingTxidBytes(::prost::alloc::vec::Vec<u8>),
        ///
        ///Hex-encoded string representing the byte-reversed hash of the funding
        ///transaction.
        #[prost(string, tag = "2")]
        FundingTxidStr(::prost::alloc::string::String),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpenChannelRequest {
    /// The pubkey of the node to open a channel with.
    #[prost(bytes = "vec", tag = "2")]
    pub node_pubkey: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "3")]
    pub node_pubkey_string: ::prost::alloc::string::String,
    /// The number of atoms the wallet should commit to the channel
    #[prost(int64, tag = "4")]
    pub local_funding_amount: i64,
    /// The number of atoms to push to the remote side as part of the initial
    /// commitment state
    #[prost(int64, tag = "5")]
    pub push_atoms: i64,
    /// The target number of blocks that the funding transaction should be
    /// confirmed by.
    #[prost(int32, tag = "6")]
    pub target_conf: i32,
    #[prost(bool, tag = "8")]
    pub private: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpenStatusUpdate {
    ///
    ///The pending channel ID of the created channel. This value may be used to
    ///further the funding flow manually via the FundingStateStep method.
    #[prost(bytes = "vec", tag = "4")]
    pub pending_chan_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(oneof = "open_status_update::Update", tags = "1, 3")]
    pub update: ::core::option::Option<open_status_update::Update>,
}
/// Nested message and enum types in `OpenStatusUpdate`.
pub mod open_status_update {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Update {
        ///
        ///Signals that the channel is now fully negotiated and the funding
        ///transaction published.
        #[prost(message, tag = "1")]
        ChanPending(super::PendingUpdate),
        ///
        ///Signals that the channel's funding transaction has now reached the
        ///required number of confirmations on chain and can be used.
        #[prost(message, tag = "3")]
        ChanOpen(super::ChannelOpenUpdate),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingUpdate {
    #[prost(bytes = "vec", tag = "1")]
    pub txid: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub output_index: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelOpenUpdate {
    #[prost(message, optional, tag = "1")]
    pub channel_point: ::core::option::Option<ChannelPoint>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseChannelRequest {
    ///
    ///The outpoint (txid:index) of the funding transaction. With this value, Bob
    ///will be able to generate a signature for Alice's version of the commitment
    ///transaction.
    #[prost(message, optional, tag = "1")]
    pub channel_point: ::core::option::Option<ChannelPoint>,
    /// If true, then the channel will be closed forcibly. This means the
    /// current commitment transaction will be signed and broadcast.
    #[prost(bool, tag = "2")]
    pub force: bool,
    /// The target number of blocks that the closure transaction should be
    /// confirmed by.
    #[prost(int32, tag = "3")]
    pub target_conf: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseStatusUpdate {
    #[prost(oneof = "close_status_update::Update", tags = "1, 3")]
    pub update: ::core::option::Option<close_status_update::Update>,
}
/// Nested message and enum types in `CloseStatusUpdate`.
pub mod close_status_update {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Update {
        #[prost(message, tag = "1")]
        ClosePending(super::PendingUpdate),
        #[prost(message, tag = "3")]
        ChanClose(super::ChannelCloseUpdate),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelCloseUpdate {
    #[prost(bytes = "vec", tag = "1")]
    pub closing_txid: ::prost::alloc::vec::Vec<u8>,
    #[prost(bool, tag = "2")]
    pub success: bool,
}

/// Client for the `lnrpc.Lightning` service.
pub mod lightning_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::codegen::*;

    /// Lightning is the main RPC server of the daemon.
    #[derive(Debug, Clone)]
    pub struct LightningClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> LightningClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        async fn unary<M1, M2>(
            &mut self,
            request: tonic::Request<M1>,
            path: &'static str,
        ) -> std::result::Result<tonic::Response<M2>, tonic::Status>
        where
            M1: prost::Message + Send + Sync + 'static,
            M2: prost::Message + Default + Send + Sync + 'static,
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static(path);
            self.inner.unary(request, path, codec).await
        }

        async fn server_streaming<M1, M2>(
            &mut self,
            request: tonic::Request<M1>,
            path: &'static str,
        ) -> std::result::Result<tonic::Response<tonic::codec::Streaming<M2>>, tonic::Status>
        where
            M1: prost::Message + Send + Sync + 'static,
            M2: prost::Message + Default + Send + Sync + 'static,
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static(path);
            self.inner.server_streaming(request, path, codec).await
        }

        /// GetInfo returns general information concerning the lightning node.
        pub async fn get_info(
            &mut self,
            request: impl tonic::IntoRequest<super::GetInfoRequest>,
        ) -> std::result::Result<tonic::Response<super::GetInfoResponse>, tonic::Status> {
            self.unary(request.into_request(), "/lnrpc.Lightning/GetInfo")
                .await
        }

        /// ListPeers returns a verbose listing of all currently active peers.
        pub async fn list_peers(
            &mut self,
            request: impl tonic::IntoRequest<super::ListPeersRequest>,
        ) -> std::result::Result<tonic::Response<super::ListPeersResponse>, tonic::Status> {
            self.unary(request.into_request(), "/lnrpc.Lightning/ListPeers")
                .await
        }

        /// ListChannels returns a description of all the open channels that
        /// this node is a participant in.
        pub async fn list_channels(
            &mut self,
            request: impl tonic::IntoRequest<super::ListChannelsRequest>,
        ) -> std::result::Result<tonic::Response<super::ListChannelsResponse>, tonic::Status>
        {
            self.unary(request.into_request(), "/lnrpc.Lightning/ListChannels")
                .await
        }

        /// PendingChannels returns a list of all the channels that are
        /// currently considered "pending".
        pub async fn pending_channels(
            &mut self,
            request: impl tonic::IntoRequest<super::PendingChannelsRequest>,
        ) -> std::result::Result<tonic::Response<super::PendingChannelsResponse>, tonic::Status>
        {
            self.unary(request.into_request(), "/lnrpc.Lightning/PendingChannels")
                .await
        }

        /// WalletBalance returns total unspent outputs, confirmed and
        /// unconfirmed, all confirmed unspent outputs and all unconfirmed
        /// unspent outputs under control of the wallet.
        pub async fn wallet_balance(
            &mut self,
            request: impl tonic::IntoRequest<super::WalletBalanceRequest>,
        ) -> std::result::Result<tonic::Response<super::WalletBalanceResponse>, tonic::Status>
        {
            self.unary(request.into_request(), "/lnrpc.Lightning/WalletBalance")
                .await
        }

        /// GetNodeInfo returns the latest advertised, aggregated, and
        /// authenticated channel information for the specified node.
        pub async fn get_node_info(
            &mut self,
            request: impl tonic::IntoRequest<super::NodeInfoRequest>,
        ) -> std::result::Result<tonic::Response<super::NodeInfo>, tonic::Status> {
            self.unary(request.into_request(), "/lnrpc.Lightning/GetNodeInfo")
                .await
        }

        /// OpenChannel attempts to open a singly funded channel specified in
        /// the request to a remote peer.
        pub async fn open_channel(
            &mut self,
            request: impl tonic::IntoRequest<super::OpenChannelRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::OpenStatusUpdate>>,
            tonic::Status,
        > {
            self.server_streaming(request.into_request(), "/lnrpc.Lightning/OpenChannel")
                .await
        }

        /// CloseChannel attempts to close an active channel identified by its
        /// channel outpoint (ChannelPoint).
        pub async fn close_channel(
            &mut self,
            request: impl tonic::IntoRequest<super::CloseChannelRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::CloseStatusUpdate>>,
            tonic::Status,
        > {
            self.server_streaming(request.into_request(), "/lnrpc.Lightning/CloseChannel")
                .await
        }
    }
}
