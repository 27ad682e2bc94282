//! # Lightning Faucet
//!
//! Composes the validator, opener, closer and registry into the three
//! operations offered to the outside world:
//!
//! | Operation | Flow |
//! |-----------|------|
//! | `fetch_state` | gateway queries → `FaucetState` |
//! | `submit_funding` | `PolicyValidator` → `ChannelOpener` → registry |
//! | `close_all_channels` | gateway listing → `ChannelCloser` per channel |
//!
//! `close_channel` closes a single channel for administrative callers and,
//! unlike the bulk close, returns its failure.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::FundingPolicy;
use crate::lnd::{ChannelGateway, ChannelRecord, GatewayError, PendingChannelRecord};
use crate::services::channel_closer::{ChannelCloser, CloseError};
use crate::services::channel_opener::ChannelOpener;
use crate::services::channel_registry::{ChannelRegistry, RegistryEntry};
use crate::services::policy::{FundingForm, PolicyValidator, SubmissionOutcome, Verdict};
use crate::services::zombie_sweeper::ZombieSweeper;
use crate::utils::{atoms_to_coins, parse_commit_hash, truncate_string, ChannelPoint, TxId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaucetError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Close(#[from] CloseError),
}

/// Everything the home page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetState {
    /// Confirmed wallet balance in coins.
    pub balance: f64,
    pub balance_atoms: i64,
    pub node_commit_hash: String,
    /// First advertised `pubkey@host:port`, if the daemon advertises any.
    pub node_address: Option<String>,
    pub num_confs: u32,
    pub network: String,
    pub active_channels: Vec<ChannelRecord>,
    pub pending_channels: Vec<PendingChannelRecord>,
    pub min_channel_size: i64,
    pub max_channel_size: i64,
    pub registered_channels: Vec<RegistryEntry>,
}

/// Result of `submit_funding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub outcome: SubmissionOutcome,
    /// Funding transaction id, set only when the outcome is `None`.
    pub funding_txid: Option<TxId>,
}

impl SubmissionResult {
    fn rejected(outcome: SubmissionOutcome) -> Self {
        Self {
            outcome,
            funding_txid: None,
        }
    }
}

/// One attempt made by `close_all_channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseAttempt {
    /// Channel point as listed by the daemon.
    pub channel_point: String,
    pub force: bool,
    pub result: Result<TxId, CloseError>,
}

/// The faucet service.
///
/// Shared by every HTTP worker; each request runs independently and the
/// only mutable state is the registry.
///
/// ## Usage
///
/// ```rust,ignore
/// let faucet = LightningFaucet::new(Arc::new(gateway), policy, "decred", 3);
///
/// let result = faucet.submit_funding(&form).await;
/// if let Some(txid) = result.funding_txid {
///     info!("Funded in {}", txid);
/// }
/// ```
#[derive(Clone)]
pub struct LightningFaucet {
    gateway: Arc<dyn ChannelGateway>,
    validator: PolicyValidator,
    opener: ChannelOpener,
    closer: ChannelCloser,
    registry: ChannelRegistry,
    policy: FundingPolicy,
    network: String,
    num_confs: u32,
}

impl LightningFaucet {
    /// Create a new LightningFaucet.
    ///
    /// ## Arguments
    ///
    /// * `gateway` - Channel daemon gateway
    /// * `policy` - Channel size bounds and sweep settings
    /// * `network` - Network label shown in the state
    /// * `num_confs` - Confirmations shown in the state
    pub fn new(
        gateway: Arc<dyn ChannelGateway>,
        policy: FundingPolicy,
        network: impl Into<String>,
        num_confs: u32,
    ) -> Self {
        Self {
            validator: PolicyValidator::new(gateway.clone(), policy),
            opener: ChannelOpener::new(gateway.clone()),
            closer: ChannelCloser::new(gateway.clone()),
            registry: ChannelRegistry::new(),
            gateway,
            policy,
            network: network.into(),
            num_confs,
        }
    }

    pub fn policy(&self) -> &FundingPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// A sweeper sharing this faucet's gateway, registry and policy.
    pub fn sweeper(&self) -> ZombieSweeper {
        ZombieSweeper::new(self.gateway.clone(), self.registry.clone(), self.policy)
    }

    /// Whether the daemon answers at all.
    pub async fn is_daemon_reachable(&self) -> bool {
        self.gateway.get_node_info().await.is_ok()
    }

    /// Query the daemon for the home-page state.
    pub async fn fetch_state(&self) -> Result<FaucetState, FaucetError> {
        let (info, balance, active_channels, pending_channels) = tokio::try_join!(
            self.gateway.get_node_info(),
            self.gateway.wallet_balance(),
            self.gateway.list_channels(),
            self.gateway.pending_channels(),
        )?;

        let node_address = info.uris.first().cloned();
        if node_address.is_none() {
            warn!("Daemon advertises no URIs; node address unavailable");
        }

        Ok(FaucetState {
            balance: atoms_to_coins(balance.confirmed_balance),
            balance_atoms: balance.confirmed_balance,
            node_commit_hash: parse_commit_hash(&info.version),
            node_address,
            num_confs: self.num_confs,
            network: self.network.clone(),
            active_channels,
            pending_channels,
            min_channel_size: self.policy.min_channel_size,
            max_channel_size: self.policy.max_channel_size,
            registered_channels: self.registry.snapshot().await,
        })
    }

    /// Validate a funding form and, when it passes, open the channel.
    pub async fn submit_funding(&self, form: &FundingForm) -> SubmissionResult {
        let request = match self.validator.validate(form).await {
            Verdict::Approved(request) => request,
            Verdict::Rejected(outcome) => {
                info!(
                    "Funding request for {} rejected: {}",
                    truncate_string(&form.node, 20),
                    outcome.code()
                );
                return SubmissionResult::rejected(outcome);
            }
        };

        match self.opener.open(&request).await {
            Ok(point) => {
                self.registry.register(point, Utc::now()).await;
                SubmissionResult {
                    outcome: SubmissionOutcome::None,
                    funding_txid: Some(point.txid),
                }
            }
            Err(e) => {
                warn!(
                    "Funding request for {} failed: {}",
                    truncate_string(&form.node, 20),
                    e
                );
                SubmissionResult::rejected(SubmissionOutcome::OpenFailed)
            }
        }
    }

    /// Close every open channel, forcing those that are inactive.
    ///
    /// Only a failure to list channels is returned as an error; each close
    /// is reported in its own `CloseAttempt`.
    pub async fn close_all_channels(&self) -> Result<Vec<CloseAttempt>, FaucetError> {
        let channels = self.gateway.list_channels().await?;
        info!("Closing all {} channels", channels.len());

        let mut attempts = Vec::with_capacity(channels.len());
        for channel in channels {
            let force = !channel.active;
            let result = match channel.channel_point.parse::<ChannelPoint>() {
                Ok(point) => self.close_point(&point, force).await,
                Err(e) => Err(CloseError::from(e)),
            };
            if let Err(e) = &result {
                error!("Failed to close channel {}: {}", channel.channel_point, e);
            }
            attempts.push(CloseAttempt {
                channel_point: channel.channel_point,
                force,
                result,
            });
        }

        Ok(attempts)
    }

    /// Close one channel given as `<txid>:<index>`.
    ///
    /// Any failure, including a malformed point, is returned to the caller.
    pub async fn close_channel(&self, point: &str, force: bool) -> Result<TxId, FaucetError> {
        let point: ChannelPoint = point.parse().map_err(CloseError::from)?;
        Ok(self.close_point(&point, force).await?)
    }

    async fn close_point(&self, point: &ChannelPoint, force: bool) -> Result<TxId, CloseError> {
        let closing_txid = self.closer.close(point, force).await?;
        self.registry.remove(point).await;
        Ok(closing_txid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils::{channel, point_str, pubkey, txid, MockGateway, OpenScript};

    fn faucet(gateway: &Arc<MockGateway>) -> LightningFaucet {
        LightningFaucet::new(gateway.clone(), FundingPolicy::default(), "decred", 3)
    }

    fn form(node: &str, amt: &str, bal: &str) -> FundingForm {
        FundingForm {
            node: node.to_string(),
            amt: amt.to_string(),
            bal: bal.to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_submission_opens_and_registers() {
        let peer = pubkey(1);
        let gateway = Arc::new(MockGateway::new().with_peer(&peer));
        let faucet = faucet(&gateway);

        let result = faucet.submit_funding(&form(&peer, "5", "1")).await;

        assert_eq!(result.outcome, SubmissionOutcome::None);
        assert_eq!(result.funding_txid, Some(txid(0xaa)));

        let opened = gateway.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].local_funding_amount, 500_000_000);
        assert_eq!(opened[0].push_amount, 100_000_000);

        let registered = faucet.registry().snapshot().await;
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].channel_point, ChannelPoint::new(txid(0xaa), 0));
    }

    #[tokio::test]
    async fn test_minimum_capacity_is_accepted() {
        let peer = pubkey(2);
        let gateway = Arc::new(MockGateway::new().with_peer(&peer));

        let result = faucet(&gateway)
            .submit_funding(&form(&peer, "0.0005", "0"))
            .await;

        assert_eq!(result.outcome, SubmissionOutcome::None);
    }

    #[tokio::test]
    async fn test_rejections_never_open() {
        let peer = pubkey(3);
        let gateway = Arc::new(MockGateway::new().with_peer(&peer));
        let faucet = faucet(&gateway);

        let small = faucet.submit_funding(&form(&peer, "0.00049", "0")).await;
        let push = faucet.submit_funding(&form(&peer, "10", "10")).await;

        assert_eq!(small.outcome, SubmissionOutcome::ChannelTooSmall);
        assert_eq!(push.outcome, SubmissionOutcome::PushAmountInvalid);
        assert!(small.funding_txid.is_none());
        assert_eq!(gateway.call_count("open_channel"), 0);
    }

    #[tokio::test]
    async fn test_open_failure_maps_to_open_failed() {
        let peer = pubkey(4);
        let gateway = Arc::new(
            MockGateway::new()
                .with_peer(&peer)
                .with_open_script(OpenScript::CallFails),
        );
        let faucet = faucet(&gateway);

        let result = faucet.submit_funding(&form(&peer, "1", "0")).await;

        assert_eq!(result, SubmissionResult::rejected(SubmissionOutcome::OpenFailed));
        assert_eq!(faucet.registry().len().await, 0);
    }

    #[tokio::test]
    async fn test_fetch_state() {
        let peer = pubkey(5);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(1, &peer, true))
                .with_pending(&pubkey(6)),
        );

        let state = faucet(&gateway).fetch_state().await.unwrap();

        assert_eq!(state.balance, 10.0);
        assert_eq!(state.balance_atoms, 1_000_000_000);
        assert_eq!(state.node_commit_hash, "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(
            state.node_address,
            Some(format!("{}@10.0.0.9:9735", pubkey(0xfa)))
        );
        assert_eq!(state.network, "decred");
        assert_eq!(state.num_confs, 3);
        assert_eq!(state.active_channels.len(), 1);
        assert_eq!(state.pending_channels.len(), 1);
        assert_eq!(state.min_channel_size, 50_000);
    }

    #[tokio::test]
    async fn test_fetch_state_fails_when_any_query_fails() {
        let gateway = Arc::new(MockGateway::new().fail_wallet_balance());

        let err = faucet(&gateway).fetch_state().await.unwrap_err();

        assert!(matches!(err, FaucetError::Gateway(GatewayError::Rpc { .. })));
    }

    #[tokio::test]
    async fn test_close_all_forces_inactive_and_continues_past_failures() {
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(1, &pubkey(1), true))
                .with_channel(channel(2, &pubkey(2), false))
                .with_channel(channel(3, &pubkey(3), false))
                .with_failing_close(&point_str(2)),
        );

        let attempts = faucet(&gateway).close_all_channels().await.unwrap();

        assert_eq!(attempts.len(), 3);
        assert!(!attempts[0].force);
        assert!(attempts[1].force);
        assert!(attempts[0].result.is_ok());
        assert!(matches!(attempts[1].result, Err(CloseError::Gateway(_))));
        assert_eq!(attempts[2].result, Ok(txid(0xcc)));
        assert_eq!(
            gateway.closed(),
            vec![
                (ChannelPoint::new(txid(1), 0), false),
                (ChannelPoint::new(txid(2), 0), true),
                (ChannelPoint::new(txid(3), 0), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_close_all_reports_malformed_points() {
        let mut record = channel(1, &pubkey(1), true);
        record.channel_point = "garbage".to_string();
        let gateway = Arc::new(MockGateway::new().with_channel(record));

        let attempts = faucet(&gateway).close_all_channels().await.unwrap();

        assert!(matches!(
            attempts[0].result,
            Err(CloseError::InvalidChannelPoint(_))
        ));
        assert_eq!(gateway.call_count("close_channel"), 0);
    }

    #[tokio::test]
    async fn test_close_all_listing_failure() {
        let gateway = Arc::new(MockGateway::new().fail_list_channels());

        assert!(faucet(&gateway).close_all_channels().await.is_err());
    }

    #[tokio::test]
    async fn test_close_channel_surfaces_errors_and_updates_registry() {
        let gateway = Arc::new(MockGateway::new().with_failing_close(&point_str(8)));
        let faucet = faucet(&gateway);
        let ok_point = ChannelPoint::new(txid(7), 0);
        faucet.registry().register(ok_point, Utc::now()).await;

        let closed = faucet.close_channel(&point_str(7), false).await.unwrap();
        assert_eq!(closed, txid(0xcc));
        assert_eq!(faucet.registry().len().await, 0);

        let err = faucet.close_channel(&point_str(8), true).await.unwrap_err();
        assert!(matches!(err, FaucetError::Close(CloseError::Gateway(_))));

        let err = faucet.close_channel("nope", true).await.unwrap_err();
        assert!(matches!(
            err,
            FaucetError::Close(CloseError::InvalidChannelPoint(_))
        ));
        assert_eq!(gateway.call_count("close_channel"), 2);
    }

    #[tokio::test]
    async fn test_sweeper_shares_registry() {
        let now = Utc::now();
        let quiet = pubkey(1);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(1, &quiet, false))
                .with_last_seen(&quiet, now - chrono::Duration::hours(50)),
        );
        let faucet = faucet(&gateway);
        faucet
            .registry()
            .register(ChannelPoint::new(txid(1), 0), now - chrono::Duration::days(3))
            .await;

        let report = faucet.sweeper().sweep(now).await;

        assert_eq!(report.closed, vec![ChannelPoint::new(txid(1), 0)]);
        assert_eq!(faucet.registry().len().await, 0);
        assert!(faucet.fetch_state().await.unwrap().registered_channels.is_empty());
    }
}
