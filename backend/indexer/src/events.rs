//! Canonical event types emitted by the campaign ledger contract.
//!
//! These mirror the Soroban events defined in
//! `contracts/campaign_ledger/src/events.rs`: topic 0 names the transition,
//! topic 1 is the address that triggered it.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the campaign contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The campaign was initialised (`created` topic).
    CampaignCreated,
    /// A contributor deposited funds (`contrib` topic).
    ContributionReceived,
    /// The owner withdrew the pooled funds (`withdrawn` topic).
    FundsWithdrawn,
    /// A contributor reclaimed their deposit (`refunded` topic).
    RefundIssued,
    /// The owner paused the campaign (`paused` topic).
    CampaignPaused,
    /// The owner lifted the pause (`unpaused` topic).
    CampaignUnpaused,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "contrib" => Self::ContributionReceived,
            "withdrawn" => Self::FundsWithdrawn,
            "refunded" => Self::RefundIssued,
            "paused" => Self::CampaignPaused,
            "unpaused" => Self::CampaignUnpaused,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::ContributionReceived => "contribution_received",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::RefundIssued => "refund_issued",
            Self::CampaignPaused => "campaign_paused",
            Self::CampaignUnpaused => "campaign_unpaused",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`]; unrecognised names map to `Unknown`.
    pub fn from_stored(name: &str) -> Self {
        match name {
            "campaign_created" => Self::CampaignCreated,
            "contribution_received" => Self::ContributionReceived,
            "funds_withdrawn" => Self::FundsWithdrawn,
            "refund_issued" => Self::RefundIssued,
            "campaign_paused" => Self::CampaignPaused,
            "campaign_unpaused" => Self::CampaignUnpaused,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded campaign event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// RPC event id; unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_stored(&self.event_type)
    }
}
