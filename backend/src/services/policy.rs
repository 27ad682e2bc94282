//! # Funding Policy Validator
//!
//! Decides whether a funding form may turn into a channel open. Checks run
//! in a fixed order and stop at the first failure:
//!
//! ```text
//! 1. peer key is hex                 → invalid-address
//! 2. no open channel with the peer   → channel-already-exists
//! 3. no pending channel with peer    → pending-channel-already-exists
//! 4. peer is connected               → peer-not-connected
//! 5. capacity / push are numbers     → amount-not-numeric / push-amount-invalid
//! 6. min <= capacity <= max          → channel-too-small / channel-too-large
//! 7. 0 <= push < capacity            → push-amount-invalid
//! ```
//!
//! ## Fail-Open Reads
//!
//! Checks 2-4 each need one daemon query. When that query fails the check
//! answers "no" (no channel, no pending channel, not connected) and logs a
//! warning. For 2 and 3 this lets a request through while the daemon is
//! flaky; the daemon itself still refuses a second channel to one peer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FundingPolicy;
use crate::lnd::{ChannelGateway, FundingRequest};
use crate::utils::{coins_to_atoms, format_coins};

/// Result of one funding attempt, shown to the user.
///
/// This is display data, not an error: every caller matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionOutcome {
    /// Nothing went wrong (or nothing was submitted yet).
    None,
    InvalidAddress,
    PeerNotConnected,
    AmountNotNumeric,
    ChannelTooLarge,
    ChannelTooSmall,
    PushAmountInvalid,
    OpenFailed,
    ChannelAlreadyExists,
    PendingChannelAlreadyExists,
}

impl SubmissionOutcome {
    /// Stable kebab-case code, e.g. `"channel-too-small"`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InvalidAddress => "invalid-address",
            Self::PeerNotConnected => "peer-not-connected",
            Self::AmountNotNumeric => "amount-not-numeric",
            Self::ChannelTooLarge => "channel-too-large",
            Self::ChannelTooSmall => "channel-too-small",
            Self::PushAmountInvalid => "push-amount-invalid",
            Self::OpenFailed => "open-failed",
            Self::ChannelAlreadyExists => "channel-already-exists",
            Self::PendingChannelAlreadyExists => "pending-channel-already-exists",
        }
    }

    /// Human readable description for the form.
    pub fn message(&self, policy: &FundingPolicy) -> String {
        match self {
            Self::None => String::new(),
            Self::InvalidAddress => "Not a valid public key".to_string(),
            Self::PeerNotConnected => "Faucet cannot connect to this node".to_string(),
            Self::AmountNotNumeric => "Amount must be a number".to_string(),
            Self::ChannelTooLarge => format!(
                "Amount is too large, maximum channel size is {}",
                format_coins(policy.max_channel_size)
            ),
            Self::ChannelTooSmall => format!(
                "Minimum channel size is {}",
                format_coins(policy.min_channel_size)
            ),
            Self::PushAmountInvalid => "Initial Balance is incorrect".to_string(),
            Self::OpenFailed => {
                "Faucet is not able to open a channel with this node".to_string()
            }
            Self::ChannelAlreadyExists => {
                "Faucet already has an active channel with this node".to_string()
            }
            Self::PendingChannelAlreadyExists => {
                "Faucet already has a pending channel with this node".to_string()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Funding request exactly as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundingForm {
    /// Peer public key, hex.
    pub node: String,
    /// Channel capacity in coins.
    pub amt: String,
    /// Amount to push to the peer, in coins.
    pub bal: String,
}

/// Outcome of validation: either a request ready to open, or the reason not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approved(FundingRequest),
    Rejected(SubmissionOutcome),
}

/// Check capacity and push amount against the policy (steps 5-7).
///
/// Returns `(capacity, push)` in atoms when both pass.
pub fn check_amounts(
    policy: &FundingPolicy,
    amt: &str,
    bal: &str,
) -> Result<(i64, i64), SubmissionOutcome> {
    let capacity = coins_to_atoms(amt).ok_or(SubmissionOutcome::AmountNotNumeric)?;
    let push = coins_to_atoms(bal).ok_or(SubmissionOutcome::PushAmountInvalid)?;

    if capacity < policy.min_channel_size {
        return Err(SubmissionOutcome::ChannelTooSmall);
    }
    if capacity > policy.max_channel_size {
        return Err(SubmissionOutcome::ChannelTooLarge);
    }
    if push < 0 || push >= capacity {
        return Err(SubmissionOutcome::PushAmountInvalid);
    }

    Ok((capacity, push))
}

/// Applies the funding policy, querying the daemon for steps 2-4.
#[derive(Clone)]
pub struct PolicyValidator {
    gateway: Arc<dyn ChannelGateway>,
    policy: FundingPolicy,
}

impl PolicyValidator {
    pub fn new(gateway: Arc<dyn ChannelGateway>, policy: FundingPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Validate a form. No daemon query runs after the first failed check.
    pub async fn validate(&self, form: &FundingForm) -> Verdict {
        let node_pubkey = match hex::decode(&form.node) {
            Ok(key) => key,
            Err(_) => return Verdict::Rejected(SubmissionOutcome::InvalidAddress),
        };
        // The daemon lists keys in lowercase hex.
        let node_hex = hex::encode(&node_pubkey);

        // Only one channel per peer.
        if self.channel_exists_with_node(&node_hex).await {
            return Verdict::Rejected(SubmissionOutcome::ChannelAlreadyExists);
        }
        if self.pending_channel_exists_with_node(&node_hex).await {
            return Verdict::Rejected(SubmissionOutcome::PendingChannelAlreadyExists);
        }

        if !self.connected_to_node(&node_hex).await {
            return Verdict::Rejected(SubmissionOutcome::PeerNotConnected);
        }

        match check_amounts(&self.policy, &form.amt, &form.bal) {
            Ok((local_funding_amount, push_amount)) => {
                debug!(
                    "Funding request for {} passed policy: {} atoms, push {}",
                    node_hex, local_funding_amount, push_amount
                );
                Verdict::Approved(FundingRequest {
                    node_pubkey,
                    local_funding_amount,
                    push_amount,
                })
            }
            Err(outcome) => Verdict::Rejected(outcome),
        }
    }

    /// True if the faucet already has an open channel with the node.
    async fn channel_exists_with_node(&self, node_hex: &str) -> bool {
        match self.gateway.list_channels().await {
            Ok(channels) => channels.iter().any(|c| c.remote_pubkey == node_hex),
            Err(e) => {
                warn!("Duplicate channel check failed, assuming none: {}", e);
                false
            }
        }
    }

    async fn pending_channel_exists_with_node(&self, node_hex: &str) -> bool {
        match self.gateway.pending_channels().await {
            Ok(pending) => pending.iter().any(|c| c.remote_pubkey == node_hex),
            Err(e) => {
                warn!("Pending channel check failed, assuming none: {}", e);
                false
            }
        }
    }

    /// True if the node is in the daemon's live peer list.
    async fn connected_to_node(&self, node_hex: &str) -> bool {
        match self.gateway.list_peers().await {
            Ok(peers) => peers.iter().any(|p| p.pubkey == node_hex),
            Err(e) => {
                warn!("Peer connectivity check failed, assuming disconnected: {}", e);
                false
            }
        }
    }
}
