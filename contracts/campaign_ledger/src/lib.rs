//! # Campaign Ledger Contract
//!
//! A goal-and-deadline fund-pooling contract. Contributors deposit a token
//! toward a fixed goal before a deadline. Once the deadline has passed, the
//! owner withdraws everything if the goal was met; otherwise every
//! contributor reclaims exactly what they put in.
//!
//! | Phase       | Entry Point(s)                                     |
//! |-------------|----------------------------------------------------|
//! | Bootstrap   | [`CampaignLedger::init`]                           |
//! | Funding     | [`CampaignLedger::contribute`]                     |
//! | Settlement  | [`CampaignLedger::withdraw`], [`CampaignLedger::refund`] |
//! | Emergency   | `pause`, `unpause`                                 |
//! | Queries     | `get_campaign`, `status`, `goal`, `deadline`, `raised`, `is_paused`, `balance_of`, ... |
//!
//! ## Architecture
//!
//! One deployed instance holds exactly one campaign; several campaigns are
//! several instances. Storage access is delegated to [`storage`], the
//! reentrancy lock to [`guard`], and event emission to [`events`]. Every
//! entry point validates all of its preconditions before the first write,
//! and token transfers out of the contract happen only after the ledger has
//! been updated.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env};

mod events;
mod guard;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_transfer_failure;

use guard::ReentrancyGuard;
pub use events::{
    CampaignCreated, CampaignPaused, CampaignUnpaused, ContributionReceived, FundsWithdrawn,
    RefundIssued,
};
pub use types::{Campaign, CampaignStatus};
use types::{CampaignConfig, CampaignState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidParameter   = 1,
    Unauthorized       = 2,
    ContractPaused     = 3,
    AlreadyPaused      = 4,
    AlreadyUnpaused    = 5,
    CampaignClosed     = 6,
    CampaignOngoing    = 7,
    GoalNotMet         = 8,
    GoalReached        = 9,
    ZeroAmount         = 10,
    NoContribution     = 11,
    TransferFailed     = 12,
    AlreadyInitialized = 13,
    NotInitialized     = 14,
    AlreadyWithdrawn   = 15,
    ReentrantCall      = 16,
    Overflow           = 17,
}

#[contract]
pub struct CampaignLedger;

#[contractimpl]
impl CampaignLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Create the campaign held by this contract instance.
    ///
    /// - `owner` must sign and becomes the only address allowed to pause,
    ///   unpause and withdraw.
    /// - `token` is the asset contributions are made in.
    /// - `goal` must be positive; `duration` (seconds) must be non-zero.
    ///   The deadline is the current ledger timestamp plus `duration`.
    ///
    /// Can only be called once per instance.
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        goal: i128,
        duration: u64,
    ) -> Result<Campaign, Error> {
        owner.require_auth();

        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if goal <= 0 || duration == 0 {
            return Err(Error::InvalidParameter);
        }
        let deadline = env
            .ledger()
            .timestamp()
            .checked_add(duration)
            .ok_or(Error::InvalidParameter)?;

        let config = CampaignConfig {
            owner: owner.clone(),
            token: token.clone(),
            goal,
            deadline,
        };
        let state = CampaignState::default();
        storage::save_campaign(&env, &config, &state);

        events::emit_campaign_created(&env, owner, token, goal, deadline);
        Ok(snapshot(&env, config, state))
    }

    // ─────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────

    /// Deposit `amount` of the campaign token from `contributor`.
    ///
    /// Rejected while paused, at or after the deadline, and for a
    /// non-positive amount. The ledger is credited first and the tokens are
    /// then pulled from the contributor; if that transfer fails the whole
    /// call fails with `TransferFailed`.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), Error> {
        contributor.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if state.paused {
            return Err(Error::ContractPaused);
        }
        if env.ledger().timestamp() >= config.deadline {
            return Err(Error::CampaignClosed);
        }
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if amount < 0 {
            return Err(Error::InvalidParameter);
        }

        let balance = storage::load_balance(&env, &contributor);
        let new_balance = balance.checked_add(amount).ok_or(Error::Overflow)?;
        state.raised = state.raised.checked_add(amount).ok_or(Error::Overflow)?;
        if balance == 0 {
            state.contributors = state.contributors.checked_add(1).ok_or(Error::Overflow)?;
        }

        storage::save_balance(&env, &contributor, new_balance);
        storage::save_state(&env, &state);

        transfer(
            &env,
            &config.token,
            &contributor,
            &env.current_contract_address(),
            amount,
        )?;

        events::emit_contribution_received(&env, contributor, amount, state.raised);
        Ok(())
    }

    /// Send the whole held balance to the owner.
    ///
    /// Only the owner, only after the deadline, only when the goal was met,
    /// and only once: the `withdrawn` flag is written before the outbound
    /// transfer and nothing is written after it.
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if caller != config.owner {
            return Err(Error::Unauthorized);
        }
        if state.paused {
            return Err(Error::ContractPaused);
        }
        if env.ledger().timestamp() < config.deadline {
            return Err(Error::CampaignOngoing);
        }
        if state.raised < config.goal {
            return Err(Error::GoalNotMet);
        }
        if state.withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }

        let contract = env.current_contract_address();
        let held = token::Client::new(&env, &config.token).balance(&contract);

        state.withdrawn = true;
        storage::save_state(&env, &state);

        if held > 0 {
            transfer(&env, &config.token, &contract, &config.owner, held)?;
        }

        events::emit_funds_withdrawn(&env, config.owner, held);
        Ok(held)
    }

    /// Return `contributor`'s whole deposit after a failed campaign.
    ///
    /// The balance is zeroed and `raised` reduced before the tokens leave
    /// the contract, so a second call fails with `NoContribution`.
    pub fn refund(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();
        let _guard = ReentrancyGuard::acquire(&env)?;

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if state.paused {
            return Err(Error::ContractPaused);
        }
        if env.ledger().timestamp() < config.deadline {
            return Err(Error::CampaignOngoing);
        }
        if state.raised >= config.goal {
            return Err(Error::GoalReached);
        }
        let amount = storage::load_balance(&env, &contributor);
        if amount <= 0 {
            return Err(Error::NoContribution);
        }

        state.raised = state.raised.checked_sub(amount).ok_or(Error::Overflow)?;
        state.contributors = state.contributors.saturating_sub(1);
        storage::save_balance(&env, &contributor, 0);
        storage::save_state(&env, &state);

        transfer(
            &env,
            &config.token,
            &env.current_contract_address(),
            &contributor,
            amount,
        )?;

        events::emit_refund_issued(&env, contributor, amount, state.raised);
        Ok(amount)
    }

    /// Gate contribute, withdraw and refund. Owner only.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        if caller != config.owner {
            return Err(Error::Unauthorized);
        }

        let mut state = storage::load_state(&env)?;
        if state.paused {
            return Err(Error::AlreadyPaused);
        }
        state.paused = true;
        storage::save_state(&env, &state);

        events::emit_campaign_paused(&env, caller);
        Ok(())
    }

    /// Lift a previous `pause`. Owner only.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        if caller != config.owner {
            return Err(Error::Unauthorized);
        }

        let mut state = storage::load_state(&env)?;
        if !state.paused {
            return Err(Error::AlreadyUnpaused);
        }
        state.paused = false;
        storage::save_state(&env, &state);

        events::emit_campaign_unpaused(&env, caller);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full campaign snapshot, with the status evaluated at the current
    /// ledger timestamp.
    pub fn get_campaign(env: Env) -> Result<Campaign, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env)?;
        Ok(snapshot(&env, config, state))
    }

    pub fn status(env: Env) -> Result<CampaignStatus, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env)?;
        Ok(CampaignStatus::compute(&config, &state, env.ledger().timestamp()))
    }

    pub fn goal(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.goal)
    }

    pub fn deadline(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.deadline)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.owner)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    pub fn raised(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.raised)
    }

    pub fn is_paused(env: Env) -> Result<bool, Error> {
        Ok(storage::load_state(&env)?.paused)
    }

    pub fn is_withdrawn(env: Env) -> Result<bool, Error> {
        Ok(storage::load_state(&env)?.withdrawn)
    }

    /// Number of addresses currently holding a non-zero balance.
    pub fn contributor_count(env: Env) -> Result<u32, Error> {
        Ok(storage::load_state(&env)?.contributors)
    }

    /// Amount currently credited to `contributor` (zero if none).
    pub fn balance_of(env: Env, contributor: Address) -> i128 {
        storage::load_balance(&env, &contributor)
    }
}

fn snapshot(env: &Env, config: CampaignConfig, state: CampaignState) -> Campaign {
    let status = CampaignStatus::compute(&config, &state, env.ledger().timestamp());
    Campaign {
        owner: config.owner,
        token: config.token,
        goal: config.goal,
        deadline: config.deadline,
        raised: state.raised,
        paused: state.paused,
        withdrawn: state.withdrawn,
        contributors: state.contributors,
        status,
    }
}

/// Move `amount` of `token` from `from` to `to`, mapping any failure of the
/// token contract to [`Error::TransferFailed`].
fn transfer(env: &Env, token: &Address, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
