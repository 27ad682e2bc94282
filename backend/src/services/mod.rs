//! # Services Module
//!
//! This module contains the channel lifecycle logic of the faucet. Each
//! service handles one concern and talks to the daemon only through
//! `ChannelGateway`.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `PolicyValidator` | Ordered eligibility checks for funding requests |
//! | `ChannelOpener` | Open a channel, wait for the pending update |
//! | `ChannelCloser` | Close a channel, wait for the close pending update |
//! | `ZombieSweeper` | Periodic force-close of abandoned channels |
//! | `ChannelRegistry` | Outpoints opened by this process |
//! | `LightningFaucet` | Composes the above for the API and wipe mode |
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SERVICES LAYER                        │
//! │                                                             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                   LightningFaucet                     │  │
//! │  │  • fetch_state()         • submit_funding()           │  │
//! │  │  • close_all_channels()  • close_channel()            │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │        │              │              │             │        │
//! │        ▼              ▼              ▼             ▼        │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐  ┌──────────┐   │
//! │  │  Policy  │   │ Channel  │   │ Channel  │  │ Channel  │   │
//! │  │Validator │   │  Opener  │   │  Closer  │  │ Registry │   │
//! │  └──────────┘   └──────────┘   └──────────┘  └──────────┘   │
//! │                                      ▲                      │
//! │                                ┌──────────┐                 │
//! │                                │  Zombie  │ (background)    │
//! │                                │ Sweeper  │                 │
//! │                                └──────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod channel_closer;
pub mod channel_opener;
pub mod channel_registry;
pub mod faucet;
pub mod policy;
pub mod zombie_sweeper;

#[cfg(test)]
pub mod test_utils;

pub use faucet::{FaucetState, LightningFaucet, SubmissionResult};
pub use policy::FundingForm;
