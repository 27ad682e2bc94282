//! # Channel Registry
//!
//! In-memory record of channels this process opened, keyed by funding
//! outpoint. It is informational only: eligibility checks and the sweeper
//! always ask the daemon, and the registry starts empty on every restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::utils::ChannelPoint;

/// One registered channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub channel_point: ChannelPoint,
    pub opened_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct ChannelRegistry {
    entries: Arc<RwLock<HashMap<ChannelPoint, DateTime<Utc>>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, point: ChannelPoint, opened_at: DateTime<Utc>) {
        self.entries.write().await.insert(point, opened_at);
    }

    /// Returns true if the point was registered.
    pub async fn remove(&self, point: &ChannelPoint) -> bool {
        self.entries.write().await.remove(point).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Entries ordered by open time, oldest first.
    pub async fn snapshot(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(point, opened_at)| RegistryEntry {
                channel_point: *point,
                opened_at: *opened_at,
            })
            .collect();
        entries.sort_by(|a, b| {
            a.opened_at
                .cmp(&b.opened_at)
                .then(a.channel_point.cmp(&b.channel_point))
        });
        entries
    }
}
