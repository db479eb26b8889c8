//! Product suggestion voting
//!
//! The per-period vote quota is enforced by the server. The client uses the
//! cached counters only to disable the vote control early.

use serde::{Deserialize, Serialize};

/// A product proposed for purity testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub id: String,
    pub product_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub vote_threshold: u64,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub estimated_completion_days: Option<u64>,
}

impl ProductSuggestion {
    pub fn votes_needed(&self) -> u64 {
        self.vote_threshold.saturating_sub(self.votes)
    }
}

/// Reference to a suggestion the user already voted for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotedProduct {
    pub id: String,
    #[serde(default)]
    pub product_name: String,
}

/// The user's quota counters for the current period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVotes {
    pub monthly_votes_used: i64,
    pub monthly_vote_limit: i64,
    pub votes_remaining: i64,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub voted_products: Vec<VotedProduct>,
}

impl UserVotes {
    pub fn has_voted_for(&self, suggestion_id: &str) -> bool {
        self.voted_products.iter().any(|p| p.id == suggestion_id)
    }
}

/// Aggregate numbers shown above the suggestion list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VotingStats {
    #[serde(default)]
    pub total_suggestions: u64,
    #[serde(default)]
    pub active_voting: u64,
    #[serde(default)]
    pub testing_phase: u64,
    #[serde(default)]
    pub completed_tests: u64,
    #[serde(default)]
    pub total_votes: u64,
}

/// Payload for proposing a new product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSuggestion {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
}

/// Whether the vote control for a suggestion is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteGate {
    Open,
    LoginRequired,
    AlreadyVoted,
    QuotaExhausted,
}

impl VoteGate {
    pub fn is_open(&self) -> bool {
        matches!(self, VoteGate::Open)
    }
}

/// Decide whether a vote may be attempted.
///
/// Counters that have not been loaded yet do not block; the server decides.
pub fn vote_gate(authenticated: bool, votes: Option<&UserVotes>, suggestion_id: &str) -> VoteGate {
    if !authenticated {
        return VoteGate::LoginRequired;
    }
    match votes {
        Some(votes) if votes.has_voted_for(suggestion_id) => VoteGate::AlreadyVoted,
        Some(votes) if votes.votes_remaining <= 0 => VoteGate::QuotaExhausted,
        _ => VoteGate::Open,
    }
}

/// Where a suggestion is being shared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Whatsapp,
    Twitter,
    Copy,
}

impl SharePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Whatsapp => "whatsapp",
            SharePlatform::Twitter => "twitter",
            SharePlatform::Copy => "copy",
        }
    }
}

/// Share data returned by the server for a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareInfo {
    pub share_url: String,
    pub product_name: String,
    pub brand: String,
    #[serde(default)]
    pub current_votes: u64,
    pub votes_needed: i64,
}

impl ShareInfo {
    pub fn share_text(&self) -> String {
        format!(
            "Help me get {} by {} tested for purity! Only {} more votes needed. Join the community at {}",
            self.product_name, self.brand, self.votes_needed, self.share_url
        )
    }
}
