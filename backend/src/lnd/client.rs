//! # gRPC Gateway
//!
//! `LndGateway` implements `ChannelGateway` against an lnd-compatible daemon
//! over authenticated gRPC.
//!
//! ## Connection Setup
//!
//! ```text
//! 1. Read the daemon's self-signed TLS certificate
//!              ↓
//! 2. Read the admin macaroon
//!              ↓
//! 3. Dial https://<LND_GRPC_HOST> trusting only that certificate
//!              ↓
//! 4. Attach the hex macaroon to every call as `macaroon` metadata
//! ```

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use tonic::codegen::InterceptedService;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use tonic::{Request, Status};
use tracing::{debug, info};

use super::lnrpc::{self, lightning_client::LightningClient};
use super::{
    ChannelGateway, ChannelRecord, CloseUpdate, FundingRequest, GatewayError, NodeInfo,
    OpenUpdate, PeerRecord, PendingChannelRecord, UpdateStream, WalletBalance,
};
use crate::config::AppConfig;
use crate::utils::{ChannelPoint, TxId};

/// Attaches the admin macaroon to every outgoing call.
#[derive(Clone)]
pub struct MacaroonInterceptor {
    macaroon: MetadataValue<Ascii>,
}

impl MacaroonInterceptor {
    /// Build an interceptor from the raw (binary) macaroon file contents.
    pub fn new(macaroon: &[u8]) -> Result<Self, GatewayError> {
        let macaroon = hex::encode(macaroon)
            .parse()
            .map_err(|_| GatewayError::Connect("macaroon is not valid metadata".to_string()))?;
        Ok(Self { macaroon })
    }
}

impl Interceptor for MacaroonInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("macaroon", self.macaroon.clone());
        Ok(request)
    }
}

type AuthedChannel = InterceptedService<Channel, MacaroonInterceptor>;

/// Channel daemon gateway backed by gRPC.
///
/// Cloning is cheap; all clones share one HTTP/2 connection.
#[derive(Clone)]
pub struct LndGateway {
    client: LightningClient<AuthedChannel>,
}

impl LndGateway {
    /// Connect to the daemon described by `config`.
    pub async fn connect(config: &AppConfig) -> Result<Self, GatewayError> {
        let cert = tokio::fs::read(&config.tls_cert_path).await.map_err(|e| {
            GatewayError::Connect(format!(
                "unable to read cert file {}: {}",
                config.tls_cert_path, e
            ))
        })?;
        let macaroon = tokio::fs::read(&config.macaroon_path).await.map_err(|e| {
            GatewayError::Connect(format!(
                "unable to read macaroon {}: {}",
                config.macaroon_path, e
            ))
        })?;

        let tls = ClientTlsConfig::new()
            .ca_certificate(Certificate::from_pem(cert))
            .domain_name(config.tls_domain.clone());

        let channel = Endpoint::from_shared(format!("https://{}", config.lnd_grpc_host))
            .map_err(|e| GatewayError::Connect(format!("invalid daemon address: {}", e)))?
            .tls_config(tls)
            .map_err(|e| GatewayError::Connect(format!("invalid TLS config: {}", e)))?
            .connect()
            .await
            .map_err(|e| {
                GatewayError::Connect(format!(
                    "unable to dial {}: {}",
                    config.lnd_grpc_host, e
                ))
            })?;

        info!("Connected to channel daemon at {}", config.lnd_grpc_host);

        let interceptor = MacaroonInterceptor::new(&macaroon)?;
        Ok(Self {
            client: LightningClient::new(InterceptedService::new(channel, interceptor)),
        })
    }

    fn client(&self) -> LightningClient<AuthedChannel> {
        self.client.clone()
    }
}

fn rpc_error(method: &'static str) -> impl FnOnce(Status) -> GatewayError {
    move |status| GatewayError::Rpc {
        method,
        message: status.message().to_string(),
    }
}

fn stream_error(status: Status) -> GatewayError {
    GatewayError::Stream(status.message().to_string())
}

fn txid_from_rpc(bytes: &[u8]) -> Result<TxId, GatewayError> {
    TxId::from_slice(bytes).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

fn channel_point_from_rpc(point: lnrpc::ChannelPoint) -> Result<ChannelPoint, GatewayError> {
    let txid = match point.funding_txid {
        Some(lnrpc::channel_point::FundingTxid::FundingTxidBytes(bytes)) => txid_from_rpc(&bytes)?,
        Some(lnrpc::channel_point::FundingTxid::FundingTxidStr(s)) => s
            .parse()
            .map_err(|e: crate::utils::ChannelPointError| {
                GatewayError::InvalidResponse(e.to_string())
            })?,
        None => {
            return Err(GatewayError::InvalidResponse(
                "channel point without funding txid".to_string(),
            ))
        }
    };
    Ok(ChannelPoint::new(txid, point.output_index))
}

fn channel_point_to_rpc(point: &ChannelPoint) -> lnrpc::ChannelPoint {
    lnrpc::ChannelPoint {
        output_index: point.output_index,
        funding_txid: Some(lnrpc::channel_point::FundingTxid::FundingTxidBytes(
            point.txid.as_bytes().to_vec(),
        )),
    }
}

pub(crate) fn open_update_from_rpc(
    update: lnrpc::OpenStatusUpdate,
) -> Result<OpenUpdate, GatewayError> {
    use lnrpc::open_status_update::Update;

    Ok(match update.update {
        Some(Update::ChanPending(pending)) => OpenUpdate::ChannelPending {
            funding_txid: txid_from_rpc(&pending.txid)?,
            output_index: pending.output_index,
        },
        Some(Update::ChanOpen(open)) => OpenUpdate::ChannelOpen {
            channel_point: open.channel_point.map(channel_point_from_rpc).transpose()?,
        },
        None => OpenUpdate::Other,
    })
}

pub(crate) fn close_update_from_rpc(
    update: lnrpc::CloseStatusUpdate,
) -> Result<CloseUpdate, GatewayError> {
    use lnrpc::close_status_update::Update;

    Ok(match update.update {
        Some(Update::ClosePending(pending)) => CloseUpdate::ClosePending {
            closing_txid: txid_from_rpc(&pending.txid)?,
        },
        Some(Update::ChanClose(closed)) => CloseUpdate::ChannelClosed {
            closing_txid: txid_from_rpc(&closed.closing_txid)?,
        },
        None => CloseUpdate::Other,
    })
}

fn last_seen_from_rpc(info: lnrpc::NodeInfo, pubkey: &str) -> Result<DateTime<Utc>, GatewayError> {
    let node = info.node.ok_or_else(|| {
        GatewayError::InvalidResponse(format!("no node announcement for {}", pubkey))
    })?;
    Utc.timestamp_opt(i64::from(node.last_update), 0)
        .single()
        .ok_or_else(|| {
            GatewayError::InvalidResponse(format!("bad last_update {}", node.last_update))
        })
}

#[async_trait]
impl ChannelGateway for LndGateway {
    async fn get_node_info(&self) -> Result<NodeInfo, GatewayError> {
        let info = self
            .client()
            .get_info(lnrpc::GetInfoRequest {})
            .await
            .map_err(rpc_error("GetInfo"))?
            .into_inner();

        Ok(NodeInfo {
            identity_pubkey: info.identity_pubkey,
            version: info.version,
            uris: info.uris,
        })
    }

    async fn list_peers(&self) -> Result<Vec<PeerRecord>, GatewayError> {
        let peers = self
            .client()
            .list_peers(lnrpc::ListPeersRequest::default())
            .await
            .map_err(rpc_error("ListPeers"))?
            .into_inner()
            .peers;

        Ok(peers
            .into_iter()
            .map(|peer| PeerRecord {
                pubkey: peer.pub_key,
            })
            .collect())
    }

    async fn list_channels(&self) -> Result<Vec<ChannelRecord>, GatewayError> {
        let channels = self
            .client()
            .list_channels(lnrpc::ListChannelsRequest::default())
            .await
            .map_err(rpc_error("ListChannels"))?
            .into_inner()
            .channels;

        Ok(channels
            .into_iter()
            .map(|channel| ChannelRecord {
                channel_point: channel.channel_point,
                remote_pubkey: channel.remote_pubkey,
                active: channel.active,
                capacity: channel.capacity,
                local_balance: channel.local_balance,
                remote_balance: channel.remote_balance,
            })
            .collect())
    }

    async fn pending_channels(&self) -> Result<Vec<PendingChannelRecord>, GatewayError> {
        let pending = self
            .client()
            .pending_channels(lnrpc::PendingChannelsRequest {})
            .await
            .map_err(rpc_error("PendingChannels"))?
            .into_inner()
            .pending_open_channels;

        Ok(pending
            .into_iter()
            .filter_map(|open| open.channel)
            .map(|channel| PendingChannelRecord {
                remote_pubkey: channel.remote_node_pub,
                channel_point: channel.channel_point,
                capacity: channel.capacity,
            })
            .collect())
    }

    async fn wallet_balance(&self) -> Result<WalletBalance, GatewayError> {
        let balance = self
            .client()
            .wallet_balance(lnrpc::WalletBalanceRequest {})
            .await
            .map_err(rpc_error("WalletBalance"))?
            .into_inner();

        Ok(WalletBalance {
            confirmed_balance: balance.confirmed_balance,
        })
    }

    async fn peer_last_seen(&self, pubkey: &str) -> Result<DateTime<Utc>, GatewayError> {
        let info = self
            .client()
            .get_node_info(lnrpc::NodeInfoRequest {
                pub_key: pubkey.to_string(),
                include_channels: false,
            })
            .await
            .map_err(rpc_error("GetNodeInfo"))?
            .into_inner();

        last_seen_from_rpc(info, pubkey)
    }

    async fn open_channel(
        &self,
        request: &FundingRequest,
    ) -> Result<UpdateStream<OpenUpdate>, GatewayError> {
        let rpc_request = lnrpc::OpenChannelRequest {
            node_pubkey: request.node_pubkey.clone(),
            local_funding_amount: request.local_funding_amount,
            push_atoms: request.push_amount,
            ..Default::default()
        };
        debug!("OpenChannel request: {:?}", rpc_request);

        let stream = self
            .client()
            .open_channel(rpc_request)
            .await
            .map_err(rpc_error("OpenChannel"))?
            .into_inner();

        Ok(stream
            .map(|item| item.map_err(stream_error).and_then(open_update_from_rpc))
            .boxed())
    }

    async fn close_channel(
        &self,
        channel_point: &ChannelPoint,
        force: bool,
    ) -> Result<UpdateStream<CloseUpdate>, GatewayError> {
        let rpc_request = lnrpc::CloseChannelRequest {
            channel_point: Some(channel_point_to_rpc(channel_point)),
            force,
            ..Default::default()
        };

        let stream = self
            .client()
            .close_channel(rpc_request)
            .await
            .map_err(rpc_error("CloseChannel"))?
            .into_inner();

        Ok(stream
            .map(|item| item.map_err(stream_error).and_then(close_update_from_rpc))
            .boxed())
    }
}
