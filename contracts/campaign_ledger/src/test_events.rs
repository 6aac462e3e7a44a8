extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger as _},
    token, vec, Address, Env, IntoVal, Symbol, TryIntoVal, Val,
};

use crate::events::{
    CampaignCreated, CampaignPaused, CampaignUnpaused, ContributionReceived, FundsWithdrawn,
    RefundIssued,
};
use crate::{CampaignLedger, CampaignLedgerClient};

fn setup_with_init(
    goal: i128,
) -> (Env, CampaignLedgerClient<'static>, token::Client<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CampaignLedger, ());
    let client = CampaignLedgerClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let addr = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &addr.address());
    client.init(&owner, &token.address, &goal, &86_400);
    (env, client, token, owner)
}

fn funded_contributor(env: &Env, token: &token::Client, amount: i128) -> Address {
    let contributor = Address::generate(env);
    token::StellarAssetClient::new(env, &token.address).mint(&contributor, &amount);
    contributor
}

/// Topics and data of the most recent event published by the campaign.
fn last_event(env: &Env, client: &CampaignLedgerClient) -> (soroban_sdk::Vec<Val>, Val) {
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    (last_event.1, last_event.2)
}

fn expected_topics(env: &Env, name: Symbol, actor: &Address) -> soroban_sdk::Vec<Val> {
    vec![env, name.into_val(env), actor.into_val(env)]
}

#[test]
fn test_campaign_created_event() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CampaignLedger, ());
    let client = CampaignLedgerClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let campaign = client.init(&owner, &token.address(), &5_000, &86_400);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(topics, expected_topics(&env, symbol_short!("created"), &owner));
    let event_data: CampaignCreated = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            owner: owner.clone(),
            token: token.address(),
            goal: 5_000,
            deadline: campaign.deadline,
        }
    );
}

#[test]
fn test_contribution_received_event() {
    let (env, client, token, _owner) = setup_with_init(10_000);
    let contributor = funded_contributor(&env, &token, 3_000);

    client.contribute(&contributor, &1_000);
    client.contribute(&contributor, &500);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        expected_topics(&env, symbol_short!("contrib"), &contributor)
    );
    let event_data: ContributionReceived = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            contributor: contributor.clone(),
            amount: 500,
            raised: 1_500,
        }
    );
}

#[test]
fn test_funds_withdrawn_event() {
    let (env, client, token, owner) = setup_with_init(1_000);
    let contributor = funded_contributor(&env, &token, 1_200);
    client.contribute(&contributor, &1_200);
    env.ledger().set_timestamp(client.deadline());

    client.withdraw(&owner);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        expected_topics(&env, symbol_short!("withdrawn"), &owner)
    );
    let event_data: FundsWithdrawn = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            owner: owner.clone(),
            amount: 1_200,
        }
    );
}

#[test]
fn test_refund_issued_event() {
    let (env, client, token, _owner) = setup_with_init(10_000);
    let first = funded_contributor(&env, &token, 700);
    let second = funded_contributor(&env, &token, 300);
    client.contribute(&first, &700);
    client.contribute(&second, &300);
    env.ledger().set_timestamp(client.deadline());

    client.refund(&first);

    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        expected_topics(&env, symbol_short!("refunded"), &first)
    );
    let event_data: RefundIssued = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RefundIssued {
            contributor: first.clone(),
            amount: 700,
            raised: 300,
        }
    );
}

#[test]
fn test_pause_and_unpause_events() {
    let (env, client, _token, owner) = setup_with_init(10_000);

    client.pause(&owner);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(topics, expected_topics(&env, symbol_short!("paused"), &owner));
    let paused: CampaignPaused = data.try_into_val(&env).unwrap();
    assert_eq!(paused, CampaignPaused { owner: owner.clone() });

    client.unpause(&owner);
    let (topics, data) = last_event(&env, &client);
    assert_eq!(
        topics,
        expected_topics(&env, symbol_short!("unpaused"), &owner)
    );
    let unpaused: CampaignUnpaused = data.try_into_val(&env).unwrap();
    assert_eq!(unpaused, CampaignUnpaused { owner: owner.clone() });
}
