//! Vote quota gating tests

use choosepure_core::voting::{vote_gate, ShareInfo, VotedProduct};
use choosepure_core::{UserVotes, VoteGate};

fn counters(remaining: i64, voted: &[&str]) -> UserVotes {
    UserVotes {
        monthly_votes_used: 1 - remaining,
        monthly_vote_limit: 1,
        votes_remaining: remaining,
        is_premium: false,
        voted_products: voted
            .iter()
            .map(|id| VotedProduct {
                id: id.to_string(),
                product_name: String::new(),
            })
            .collect(),
    }
}

#[test]
fn test_anonymous_needs_login() {
    assert_eq!(vote_gate(false, None, "s1"), VoteGate::LoginRequired);
}

#[test]
fn test_exhausted_quota_blocks() {
    let votes = counters(0, &[]);
    assert_eq!(vote_gate(true, Some(&votes), "s1"), VoteGate::QuotaExhausted);
}

#[test]
fn test_already_voted_blocks() {
    let votes = counters(2, &["s1"]);
    assert_eq!(vote_gate(true, Some(&votes), "s1"), VoteGate::AlreadyVoted);
    assert_eq!(vote_gate(true, Some(&votes), "s2"), VoteGate::Open);
}

#[test]
fn test_unloaded_counters_do_not_block() {
    assert!(vote_gate(true, None, "s1").is_open());
}

#[test]
fn test_share_text() {
    let info = ShareInfo {
        share_url: "https://choosepure.in/vote/s1".into(),
        product_name: "Ghee".into(),
        brand: "Pure Co".into(),
        current_votes: 40,
        votes_needed: 60,
    };
    assert_eq!(
        info.share_text(),
        "Help me get Ghee by Pure Co tested for purity! Only 60 more votes needed. \
         Join the community at https://choosepure.in/vote/s1"
    );
}
