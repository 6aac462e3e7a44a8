//! Off-chain view of the campaign ledger, rebuilt by replaying indexed events.
//!
//! The contract is the source of truth; this is what an observer who only
//! sees the event stream can reconstruct. Amounts arrive as decimal strings
//! (the contract uses `i128`) and are summed as `i128` here too.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub owner: Option<String>,
    #[serde(with = "opt_amount")]
    pub goal: Option<i128>,
    #[serde(with = "amount")]
    pub total_contributed: i128,
    #[serde(with = "amount")]
    pub total_refunded: i128,
    /// `total_contributed - total_refunded`; mirrors the contract's `raised`.
    #[serde(with = "amount")]
    pub raised: i128,
    #[serde(with = "opt_amount")]
    pub withdrawn: Option<i128>,
    pub paused: bool,
    /// Current balance of every contributor with a non-zero balance.
    #[serde(with = "balances")]
    pub balances: BTreeMap<String, i128>,
    pub events_seen: usize,
}

impl CampaignSummary {
    /// Fold `events` (in ledger order) into a summary.
    pub fn replay(events: &[EventRecord]) -> Result<Self> {
        let mut summary = Self::default();
        for event in events {
            summary.apply(event)?;
        }
        Ok(summary)
    }

    fn apply(&mut self, event: &EventRecord) -> Result<()> {
        self.events_seen += 1;
        match event.kind() {
            EventKind::CampaignCreated => {
                self.owner = event.actor.clone();
                self.goal = Some(parse_amount(event)?);
            }
            EventKind::ContributionReceived => {
                let amount = parse_amount(event)?;
                let actor = require_actor(event)?;
                self.total_contributed =
                    checked(self.total_contributed.checked_add(amount), event)?;
                self.raised = checked(self.raised.checked_add(amount), event)?;
                let balance = self.balances.entry(actor).or_insert(0);
                *balance = checked(balance.checked_add(amount), event)?;
            }
            EventKind::RefundIssued => {
                let amount = parse_amount(event)?;
                let actor = require_actor(event)?;
                self.total_refunded =
                    checked(self.total_refunded.checked_add(amount), event)?;
                self.raised = checked(self.raised.checked_sub(amount), event)?;
                self.balances.remove(&actor);
            }
            EventKind::FundsWithdrawn => {
                self.withdrawn = Some(parse_amount(event)?);
            }
            EventKind::CampaignPaused => self.paused = true,
            EventKind::CampaignUnpaused => self.paused = false,
            EventKind::Unknown => {}
        }
        Ok(())
    }

    pub fn goal_met(&self) -> Option<bool> {
        self.goal.map(|goal| self.raised >= goal)
    }
}

fn parse_amount(event: &EventRecord) -> Result<i128> {
    let raw = event.amount.as_deref().ok_or_else(|| {
        IndexerError::EventParse(format!("event {} ({}) has no amount", event.id, event.event_type))
    })?;
    raw.parse().map_err(|_| {
        IndexerError::EventParse(format!("event {} has invalid amount {raw:?}", event.id))
    })
}

fn checked(value: Option<i128>, event: &EventRecord) -> Result<i128> {
    value.ok_or_else(|| {
        IndexerError::EventParse(format!(
            "event {} ({}) overflows the running totals",
            event.id, event.event_type
        ))
    })
}

fn require_actor(event: &EventRecord) -> Result<String> {
    event.actor.clone().ok_or_else(|| {
        IndexerError::EventParse(format!("event {} ({}) has no actor", event.id, event.event_type))
    })
}

// i128 does not fit a JSON number reliably, so amounts are rendered as strings.

mod amount {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

mod opt_amount {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<i128>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }
}

mod balances {
    use std::collections::BTreeMap;

    use serde::ser::SerializeMap;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &BTreeMap<String, i128>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (who, amount) in value {
            map.serialize_entry(who, &amount.to_string())?;
        }
        map.end()
    }
}
