#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::types::{Campaign, CampaignStatus};
use crate::CampaignLedgerClient;

/// Goal is always positive.
pub fn assert_goal_positive(campaign: &Campaign) {
    assert!(
        campaign.goal > 0,
        "campaign has non-positive goal ({})",
        campaign.goal
    );
}

/// Raised total is never negative.
pub fn assert_raised_non_negative(campaign: &Campaign) {
    assert!(
        campaign.raised >= 0,
        "campaign has negative raised total ({})",
        campaign.raised
    );
}

/// A withdrawn campaign must report the terminal status.
pub fn assert_withdrawn_is_terminal(campaign: &Campaign) {
    if campaign.withdrawn {
        assert_eq!(campaign.status, CampaignStatus::Withdrawn);
    }
}

/// After a contribution of `amount`, the total grows by exactly `amount`.
pub fn assert_contribution_invariant(raised_before: i128, raised_after: i128, amount: i128) {
    assert_eq!(
        raised_after,
        raised_before + amount,
        "contribution invariant broken: {} + {} != {}",
        raised_before,
        amount,
        raised_after
    );
}

/// `raised` equals the sum of every known contributor's balance, and no
/// single balance exceeds it.
pub fn assert_ledger_balanced(client: &CampaignLedgerClient, contributors: &[Address]) {
    let raised = client.raised();
    let mut sum = 0i128;
    for contributor in contributors {
        let balance = client.balance_of(contributor);
        assert!(balance >= 0, "negative balance {}", balance);
        assert!(
            balance <= raised,
            "balance {} exceeds raised {}",
            balance,
            raised
        );
        sum += balance;
    }
    assert_eq!(sum, raised, "sum of balances {} != raised {}", sum, raised);
}

/// Fields fixed at creation never change.
pub fn assert_immutable_fields(original: &Campaign, current: &Campaign) {
    assert_eq!(original.owner, current.owner, "campaign owner changed");
    assert_eq!(original.token, current.token, "campaign token changed");
    assert_eq!(original.goal, current.goal, "campaign goal changed");
    assert_eq!(original.deadline, current.deadline, "campaign deadline changed");
}

/// Contributor count matches the number of non-zero balances.
pub fn assert_contributor_count(client: &CampaignLedgerClient, contributors: &[Address]) {
    let non_zero = contributors
        .iter()
        .filter(|c| client.balance_of(c) > 0)
        .count() as u32;
    assert_eq!(client.contributor_count(), non_zero);
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(campaign: &Campaign) {
    assert_goal_positive(campaign);
    assert_raised_non_negative(campaign);
    assert_withdrawn_is_terminal(campaign);
}
