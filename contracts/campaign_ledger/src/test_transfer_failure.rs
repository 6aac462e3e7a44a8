extern crate std;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error,
    testutils::{Address as _, Ledger as _},
    Address, Env,
};

use crate::invariants::assert_ledger_balanced;
use crate::{CampaignLedger, CampaignLedgerClient, Error};

const UNIT: i128 = 10_000_000;
const DAY: u64 = 86_400;

// ─────────────────────────────────────────────────────────
// Token whose transfers can be switched off
// ─────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    Rejected = 1,
    InsufficientBalance = 2,
}

#[contracttype]
#[derive(Clone)]
enum TokenKey {
    Failing,
    Balance(Address),
}

#[contract]
pub struct SwitchableToken;

#[contractimpl]
impl SwitchableToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&TokenKey::Balance(to), &(balance + amount));
    }

    pub fn set_failing(env: Env, failing: bool) {
        env.storage().instance().set(&TokenKey::Failing, &failing);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&TokenKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        if env
            .storage()
            .instance()
            .get(&TokenKey::Failing)
            .unwrap_or(false)
        {
            panic_with_error!(&env, TokenError::Rejected);
        }
        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            panic_with_error!(&env, TokenError::InsufficientBalance);
        }
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&TokenKey::Balance(from), &(from_balance - amount));
        env.storage()
            .persistent()
            .set(&TokenKey::Balance(to), &(to_balance + amount));
    }
}

fn setup_with_init(
    goal: i128,
) -> (
    Env,
    CampaignLedgerClient<'static>,
    SwitchableTokenClient<'static>,
    Address,
) {
    let env = Env::default();
    env.mock_all_auths();
    let client = CampaignLedgerClient::new(&env, &env.register(CampaignLedger, ()));
    let token = SwitchableTokenClient::new(&env, &env.register(SwitchableToken, ()));

    let owner = Address::generate(&env);
    client.init(&owner, &token.address, &goal, &DAY);
    (env, client, token, owner)
}

fn contributor_with(
    env: &Env,
    client: &CampaignLedgerClient,
    token: &SwitchableTokenClient,
    amount: i128,
) -> Address {
    let contributor = Address::generate(env);
    token.mint(&contributor, &amount);
    client.contribute(&contributor, &amount);
    contributor
}

fn advance_to_deadline(env: &Env, client: &CampaignLedgerClient) {
    env.ledger().set_timestamp(client.deadline());
}

// ─────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────

#[test]
fn test_rejected_withdraw_transfer_leaves_campaign_open() {
    let (env, client, token, owner) = setup_with_init(UNIT);
    contributor_with(&env, &client, &token, UNIT);
    advance_to_deadline(&env, &client);

    token.set_failing(&true);
    assert_eq!(client.try_withdraw(&owner), Err(Ok(Error::TransferFailed)));
    assert!(!client.is_withdrawn());
    assert_eq!(client.raised(), UNIT);
    assert_eq!(token.balance(&client.address), UNIT);
    assert_eq!(token.balance(&owner), 0);

    // The flag was rolled back, so the owner can retry once the token recovers.
    token.set_failing(&false);
    assert_eq!(client.withdraw(&owner), UNIT);
    assert!(client.is_withdrawn());
    assert_eq!(token.balance(&owner), UNIT);
}

#[test]
fn test_rejected_refund_transfer_keeps_contribution() {
    let (env, client, token, _owner) = setup_with_init(2 * UNIT);
    let alice = contributor_with(&env, &client, &token, UNIT);
    let bob = contributor_with(&env, &client, &token, UNIT / 2);
    advance_to_deadline(&env, &client);

    token.set_failing(&true);
    assert_eq!(client.try_refund(&alice), Err(Ok(Error::TransferFailed)));
    assert_eq!(client.balance_of(&alice), UNIT);
    assert_eq!(client.raised(), UNIT + UNIT / 2);
    assert_eq!(client.contributor_count(), 2);
    assert_eq!(token.balance(&alice), 0);
    assert_ledger_balanced(&client, &[alice.clone(), bob.clone()]);

    token.set_failing(&false);
    assert_eq!(client.refund(&alice), UNIT);
    assert_eq!(client.balance_of(&alice), 0);
    assert_eq!(client.raised(), UNIT / 2);
    assert_eq!(token.balance(&alice), UNIT);
    assert_ledger_balanced(&client, &[alice, bob]);
}

#[test]
fn test_rejected_contribute_transfer_credits_nothing() {
    let (env, client, token, _owner) = setup_with_init(UNIT);
    let contributor = Address::generate(&env);
    token.mint(&contributor, &UNIT);

    token.set_failing(&true);
    assert_eq!(
        client.try_contribute(&contributor, &UNIT),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(client.raised(), 0);
    assert_eq!(client.balance_of(&contributor), 0);
    assert_eq!(client.contributor_count(), 0);
    assert_eq!(token.balance(&contributor), UNIT);
}
