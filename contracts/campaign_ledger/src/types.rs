//! # Types
//!
//! Shared data structures used across the campaign ledger contract.
//!
//! ## Config / State split
//!
//! A campaign is stored as two separate instance-storage entries:
//!
//! - [`CampaignConfig`] — written once by `init`; never mutated.
//! - [`CampaignState`] — rewritten on every contribution, refund, pause
//!   toggle and withdrawal.
//!
//! Per-contributor balances live in persistent storage (see `storage`).
//! The public API exposes the reconstructed [`Campaign`] snapshot.
//!
//! ## Status
//!
//! [`CampaignStatus`] is never stored. It is derived at call time from the
//! ledger timestamp, `raised`, `goal` and the terminal `withdrawn` flag:
//!
//! ```text
//! Active ──(deadline, raised >= goal)──► Succeeded ──(withdraw)──► Withdrawn
//!    └────(deadline, raised <  goal)──► Failed
//! ```
//!
//! Contributions are deadline-gated, so once the deadline passes `raised`
//! can only decrease through refunds, which are themselves only possible in
//! `Failed`. The post-deadline status is therefore stable.

use soroban_sdk::{contracttype, Address};

/// Outcome phase of the campaign, computed from the clock and the ledger.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Before the deadline; accepting contributions.
    Active,
    /// Deadline passed with the goal met; owner may withdraw.
    Succeeded,
    /// Deadline passed with the goal missed; contributors may refund.
    Failed,
    /// Funds have been withdrawn by the owner. Terminal.
    Withdrawn,
}

impl CampaignStatus {
    pub fn compute(config: &CampaignConfig, state: &CampaignState, now: u64) -> Self {
        if state.withdrawn {
            CampaignStatus::Withdrawn
        } else if now < config.deadline {
            CampaignStatus::Active
        } else if state.raised >= config.goal {
            CampaignStatus::Succeeded
        } else {
            CampaignStatus::Failed
        }
    }
}

/// Immutable campaign configuration, written once at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub owner: Address,
    pub token: Address,
    pub goal: i128,
    pub deadline: u64,
}

/// Mutable campaign state.
///
/// Kept small so that contributions, which are the frequent write, stay cheap.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CampaignState {
    pub raised: i128,
    pub paused: bool,
    pub withdrawn: bool,
    pub contributors: u32,
}

/// Full snapshot of the campaign, returned by `get_campaign`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Address allowed to pause, unpause and withdraw.
    pub owner: Address,
    /// Token contract the campaign is denominated in.
    pub token: Address,
    /// Target aggregate amount.
    pub goal: i128,
    /// Ledger timestamp at which contributions close.
    pub deadline: u64,
    /// Running total of all current contributions.
    pub raised: i128,
    /// Whether contribute / withdraw / refund are currently gated.
    pub paused: bool,
    /// Set once the owner has withdrawn the pooled funds.
    pub withdrawn: bool,
    /// Number of addresses holding a non-zero balance.
    pub contributors: u32,
    /// Status as of the ledger timestamp the snapshot was taken at.
    pub status: CampaignStatus,
}
