//! # Zombie Channel Sweeper
//!
//! Background task that force-closes channels whose peer has gone quiet.
//!
//! A channel is a zombie when it is **inactive** and its remote peer has
//! not announced itself for longer than the configured zombie age:
//!
//! ```text
//! zombie  ⇔  !active  &&  last_seen < now - zombie_age
//! ```
//!
//! ## Schedule
//!
//! ```text
//! ZombieSweeper::run (background task)
//!              │
//!              ├── t = 0: sweep once at startup
//!              │
//!              ├── every sweep_interval: sweep again
//!              │
//!              └── shutdown trigger: stop, abandoning a sweep in flight
//! ```
//!
//! Sweeps never overlap: a sweep that runs past the interval delays the
//! next one and missed ticks are skipped. A closed channel is also dropped
//! from the shared `ChannelRegistry`.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::FundingPolicy;
use crate::lnd::{ChannelGateway, ChannelRecord};
use crate::services::channel_closer::ChannelCloser;
use crate::services::channel_registry::ChannelRegistry;
use crate::utils::ChannelPoint;

/// What one sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Channels looked at.
    pub inspected: usize,
    /// Channels a force-close was requested for.
    pub closed: Vec<ChannelPoint>,
    /// Channels skipped because a lookup or the close failed.
    pub failed: usize,
}

/// True when an inactive channel's peer was last seen before the cutoff.
pub fn is_zombie(active: bool, last_seen: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
    !active && last_seen < cutoff
}

/// The zombie sweeper service.
///
/// Runs in the background for the lifetime of the process, one sweep at
/// a time.
///
/// ## Usage
///
/// ```rust,ignore
/// let sweeper = ZombieSweeper::new(gateway, registry, policy);
/// let (trigger, listener) = triggered::trigger();
///
/// let handle = tokio::spawn(async move { sweeper.run(listener).await });
///
/// // later, on shutdown
/// trigger.trigger();
/// handle.await?;
/// ```
#[derive(Clone)]
pub struct ZombieSweeper {
    /// Channel daemon connection.
    gateway: Arc<dyn ChannelGateway>,

    /// Issues the force-closes.
    closer: ChannelCloser,

    /// Outpoints opened by this process; closed ones are removed.
    registry: ChannelRegistry,

    /// Zombie age and sweep interval.
    policy: FundingPolicy,
}

impl ZombieSweeper {
    /// Create a new ZombieSweeper.
    ///
    /// ## Arguments
    ///
    /// * `gateway` - Channel daemon gateway
    /// * `registry` - Registry shared with the faucet
    /// * `policy` - Supplies `zombie_age` and `sweep_interval`
    pub fn new(
        gateway: Arc<dyn ChannelGateway>,
        registry: ChannelRegistry,
        policy: FundingPolicy,
    ) -> Self {
        let closer = ChannelCloser::new(gateway.clone());
        Self {
            gateway,
            closer,
            registry,
            policy,
        }
    }

    /// Sweep on startup and then every `sweep_interval` until `shutdown` fires.
    pub async fn run(&self, shutdown: triggered::Listener) {
        info!(
            "Starting zombie sweeper (interval: {:?}, zombie age: {:?})",
            self.policy.sweep_interval, self.policy.zombie_age
        );

        let mut ticker = interval(self.policy.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.clone() => {
                    info!("Zombie sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    // A hung daemon call must not keep shutdown waiting.
                    let report = tokio::select! {
                        _ = shutdown.clone() => {
                            info!("Zombie sweeper stopping, abandoning sweep in progress");
                            break;
                        }
                        report = self.sweep(Utc::now()) => report,
                    };
                    if !report.closed.is_empty() || report.failed > 0 {
                        info!(
                            "Sweep done: {} inspected, {} closed, {} failed",
                            report.inspected,
                            report.closed.len(),
                            report.failed
                        );
                    }
                }
            }
        }
    }

    /// Inspect every channel once and force-close the zombies.
    ///
    /// A failure on one channel is logged and does not stop the sweep.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let channels = match self.gateway.list_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                error!("Zombie sweep could not list channels: {}", e);
                return report;
            }
        };

        let cutoff = self.cutoff(now);
        debug!("Sweeping {} channels, cutoff {}", channels.len(), cutoff);

        for channel in channels {
            report.inspected += 1;
            match self.inspect(&channel, cutoff).await {
                Ok(Some(point)) => report.closed.push(point),
                Ok(None) => {}
                Err(e) => {
                    error!("Skipping channel {}: {}", channel.channel_point, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Close the channel if it is a zombie. Returns the closed point.
    async fn inspect(
        &self,
        channel: &ChannelRecord,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<ChannelPoint>, String> {
        let last_seen = self
            .gateway
            .peer_last_seen(&channel.remote_pubkey)
            .await
            .map_err(|e| e.to_string())?;

        if !is_zombie(channel.active, last_seen, cutoff) {
            return Ok(None);
        }

        info!(
            "Channel {} is a zombie (peer {} last seen {})",
            channel.channel_point, channel.remote_pubkey, last_seen
        );

        let point: ChannelPoint = channel.channel_point.parse().map_err(|e| {
            format!("malformed channel point: {}", e)
        })?;

        self.closer
            .close(&point, true)
            .await
            .map_err(|e| e.to_string())?;
        self.registry.remove(&point).await;

        Ok(Some(point))
    }

    /// Peers last seen before this instant are stale.
    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        ChronoDuration::from_std(self.policy.zombie_age)
            .ok()
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils::{
        channel, point_str, pubkey, txid, HangingGateway, MockGateway,
    };
    use std::time::Duration;

    fn sweeper(gateway: &Arc<MockGateway>) -> ZombieSweeper {
        ZombieSweeper::new(gateway.clone(), ChannelRegistry::new(), FundingPolicy::default())
    }

    #[test]
    fn test_is_zombie() {
        let now = Utc::now();
        let cutoff = now - ChronoDuration::hours(48);

        assert!(is_zombie(false, now - ChronoDuration::hours(50), cutoff));
        assert!(!is_zombie(true, now - ChronoDuration::hours(50), cutoff));
        assert!(!is_zombie(false, now - ChronoDuration::hours(10), cutoff));
        // exactly at the cutoff is not older than the cutoff
        assert!(!is_zombie(false, cutoff, cutoff));
    }

    #[tokio::test]
    async fn test_inactive_stale_channel_is_force_closed() {
        let now = Utc::now();
        let quiet = pubkey(1);
        let busy = pubkey(2);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(1, &quiet, false))
                .with_channel(channel(2, &busy, true))
                .with_last_seen(&quiet, now - ChronoDuration::hours(50))
                .with_last_seen(&busy, now - ChronoDuration::hours(50)),
        );

        let report = sweeper(&gateway).sweep(now).await;

        let zombie = ChannelPoint::new(txid(1), 0);
        assert_eq!(report.inspected, 2);
        assert_eq!(report.closed, vec![zombie]);
        assert_eq!(report.failed, 0);
        assert_eq!(gateway.closed(), vec![(zombie, true)]);
    }

    #[tokio::test]
    async fn test_recently_seen_inactive_channel_is_kept() {
        let now = Utc::now();
        let peer = pubkey(3);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(3, &peer, false))
                .with_last_seen(&peer, now - ChronoDuration::hours(47)),
        );

        let report = sweeper(&gateway).sweep(now).await;

        assert!(report.closed.is_empty());
        assert_eq!(gateway.call_count("close_channel"), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_skips_only_that_channel() {
        let now = Utc::now();
        let unknown = pubkey(4);
        let stale = pubkey(5);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(4, &unknown, false))
                .with_channel(channel(5, &stale, false))
                .with_last_seen(&stale, now - ChronoDuration::days(30)),
        );

        let report = sweeper(&gateway).sweep(now).await;

        assert_eq!(report.inspected, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.closed, vec![ChannelPoint::new(txid(5), 0)]);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_stop_sweep() {
        let now = Utc::now();
        let first = pubkey(6);
        let second = pubkey(7);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(6, &first, false))
                .with_channel(channel(7, &second, false))
                .with_last_seen(&first, now - ChronoDuration::days(3))
                .with_last_seen(&second, now - ChronoDuration::days(3))
                .with_failing_close(&point_str(6)),
        );

        let report = sweeper(&gateway).sweep(now).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.closed, vec![ChannelPoint::new(txid(7), 0)]);
        assert_eq!(gateway.call_count("close_channel"), 2);
    }

    #[tokio::test]
    async fn test_malformed_point_is_skipped() {
        let now = Utc::now();
        let peer = pubkey(8);
        let mut record = channel(8, &peer, false);
        record.channel_point = "not-a-point".to_string();
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(record)
                .with_last_seen(&peer, now - ChronoDuration::days(3)),
        );

        let report = sweeper(&gateway).sweep(now).await;

        assert_eq!(report.failed, 1);
        assert_eq!(gateway.call_count("close_channel"), 0);
    }

    #[tokio::test]
    async fn test_list_failure_ends_sweep_quietly() {
        let gateway = Arc::new(MockGateway::new().fail_list_channels());

        let report = sweeper(&gateway).sweep(Utc::now()).await;

        assert_eq!(report, SweepReport::default());
        assert_eq!(gateway.calls(), vec!["list_channels"]);
    }

    #[tokio::test]
    async fn test_run_sweeps_at_startup_and_stops_on_trigger() {
        let gateway = Arc::new(MockGateway::new());
        let policy = FundingPolicy {
            sweep_interval: Duration::from_millis(20),
            ..FundingPolicy::default()
        };
        let sweeper = ZombieSweeper::new(gateway.clone(), ChannelRegistry::new(), policy);
        let (trigger, listener) = triggered::trigger();

        let handle = tokio::spawn(async move { sweeper.run(listener).await });

        tokio::time::sleep(Duration::from_millis(70)).await;
        trigger.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper stopped")
            .unwrap();

        assert!(gateway.call_count("list_channels") >= 2);
    }

    #[tokio::test]
    async fn test_closed_zombie_is_dropped_from_registry() {
        let now = Utc::now();
        let quiet = pubkey(9);
        let kept = ChannelPoint::new(txid(0x77), 0);
        let zombie = ChannelPoint::new(txid(9), 0);
        let gateway = Arc::new(
            MockGateway::new()
                .with_channel(channel(9, &quiet, false))
                .with_last_seen(&quiet, now - ChronoDuration::hours(50)),
        );
        let registry = ChannelRegistry::new();
        registry.register(zombie, now - ChronoDuration::days(5)).await;
        registry.register(kept, now).await;

        let sweeper = ZombieSweeper::new(gateway, registry.clone(), FundingPolicy::default());
        let report = sweeper.sweep(now).await;

        assert_eq!(report.closed, vec![zombie]);
        let remaining = registry.snapshot().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].channel_point, kept);
    }

    #[tokio::test]
    async fn test_shutdown_abandons_hung_sweep() {
        let sweeper = ZombieSweeper::new(
            Arc::new(HangingGateway),
            ChannelRegistry::new(),
            FundingPolicy::default(),
        );
        let (trigger, listener) = triggered::trigger();

        let handle = tokio::spawn(async move { sweeper.run(listener).await });

        // the startup sweep is now stuck in list_channels
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.trigger();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper stopped while the daemon hung")
            .unwrap();
    }
}
