//! # Events
//!
//! Every state transition publishes one event for off-chain observers.
//! Topic 0 is a short symbol naming the transition; topic 1 is the address
//! that triggered it. The data payload is one of the structs below.
//!
//! | Topic 0     | Data                     |
//! |-------------|--------------------------|
//! | `created`   | [`CampaignCreated`]      |
//! | `contrib`   | [`ContributionReceived`] |
//! | `withdrawn` | [`FundsWithdrawn`]       |
//! | `refunded`  | [`RefundIssued`]         |
//! | `paused`    | [`CampaignPaused`]       |
//! | `unpaused`  | [`CampaignUnpaused`]     |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub owner: Address,
    pub token: Address,
    pub goal: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub contributor: Address,
    pub amount: i128,
    /// Campaign total after this contribution.
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub contributor: Address,
    pub amount: i128,
    /// Campaign total after this refund.
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignPaused {
    pub owner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignUnpaused {
    pub owner: Address,
}

pub fn emit_campaign_created(env: &Env, owner: Address, token: Address, goal: i128, deadline: u64) {
    let topics = (symbol_short!("created"), owner.clone());
    let data = CampaignCreated {
        owner,
        token,
        goal,
        deadline,
    };
    env.events().publish(topics, data);
}

pub fn emit_contribution_received(env: &Env, contributor: Address, amount: i128, raised: i128) {
    let topics = (symbol_short!("contrib"), contributor.clone());
    let data = ContributionReceived {
        contributor,
        amount,
        raised,
    };
    env.events().publish(topics, data);
}

pub fn emit_funds_withdrawn(env: &Env, owner: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), owner.clone());
    env.events().publish(topics, FundsWithdrawn { owner, amount });
}

pub fn emit_refund_issued(env: &Env, contributor: Address, amount: i128, raised: i128) {
    let topics = (symbol_short!("refunded"), contributor.clone());
    let data = RefundIssued {
        contributor,
        amount,
        raised,
    };
    env.events().publish(topics, data);
}

pub fn emit_campaign_paused(env: &Env, owner: Address) {
    let topics = (symbol_short!("paused"), owner.clone());
    env.events().publish(topics, CampaignPaused { owner });
}

pub fn emit_campaign_unpaused(env: &Env, owner: Address) {
    let topics = (symbol_short!("unpaused"), owner.clone());
    env.events().publish(topics, CampaignUnpaused { owner });
}
