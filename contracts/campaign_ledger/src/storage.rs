//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the campaign.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key        | Type             | Description                              |
//! |------------|------------------|------------------------------------------|
//! | `Config`   | `CampaignConfig` | Owner, token, goal, deadline             |
//! | `State`    | `CampaignState`  | Raised total, pause / withdrawn flags    |
//! | `Locked`   | `bool`           | Reentrancy lock, present only mid-call   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type   | Description                     |
//! |--------------------|--------|---------------------------------|
//! | `Balance(address)` | `i128` | Amount contributed by `address` |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining. A zero balance is represented by the absence of the entry.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{CampaignConfig, CampaignState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable campaign configuration (Instance).
    Config,
    /// Mutable campaign state (Instance).
    State,
    /// Reentrancy lock (Instance).
    Locked,
    /// Per-contributor balance (Persistent).
    Balance(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Write the configuration and a fresh state for a new campaign.
pub fn save_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<CampaignConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn load_state(env: &Env) -> Result<CampaignState, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

pub fn save_state(env: &Env, state: &CampaignState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Locked)
}

pub fn set_locked(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::Locked, &true);
    } else {
        env.storage().instance().remove(&DataKey::Locked);
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Amount contributed by `contributor`; zero when no entry exists.
pub fn load_balance(env: &Env, contributor: &Address) -> i128 {
    let key = DataKey::Balance(contributor.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

/// Store `balance` for `contributor`, removing the entry when it reaches zero.
pub fn save_balance(env: &Env, contributor: &Address, balance: i128) {
    let key = DataKey::Balance(contributor.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        bump_persistent(env, &key);
    }
}
