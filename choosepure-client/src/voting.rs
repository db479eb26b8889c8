//! Product suggestion voting board
//!
//! Holds the last loaded suggestions and the user's quota counters. The
//! counters only disable voting early; the server stays authoritative and
//! every successful mutation reloads the whole board.

use std::sync::Arc;

use reqwest::Url;

use choosepure_core::voting::{
    vote_gate, NewSuggestion, SharePlatform, ShareInfo, VotingStats,
};
use choosepure_core::{ProductSuggestion, UserVotes, ValidationError, VoteGate};

use crate::error::{ClientError, ClientResult};
use crate::state::AppState;
use crate::ui::Notification;

/// Text and intent link for sharing a suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct ShareLink {
    pub text: String,
    /// `None` for copy-to-clipboard
    pub url: Option<String>,
}

impl ShareLink {
    pub fn build(info: &ShareInfo, platform: SharePlatform) -> ClientResult<Self> {
        let text = info.share_text();
        let base = match platform {
            SharePlatform::Whatsapp => Some("https://wa.me/"),
            SharePlatform::Twitter => Some("https://twitter.com/intent/tweet"),
            SharePlatform::Copy => None,
        };
        let url = match base {
            Some(base) => Some(
                Url::parse_with_params(base, &[("text", text.as_str())])
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?
                    .to_string(),
            ),
            None => None,
        };
        Ok(Self { text, url })
    }
}

pub struct VotingBoard {
    state: Arc<AppState>,
    suggestions: Vec<ProductSuggestion>,
    user_votes: Option<UserVotes>,
    stats: VotingStats,
}

impl VotingBoard {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            suggestions: Vec::new(),
            user_votes: None,
            stats: VotingStats::default(),
        }
    }

    /// Create a board and load it
    pub async fn load(state: Arc<AppState>) -> ClientResult<Self> {
        let mut board = Self::new(state);
        board.reload().await?;
        Ok(board)
    }

    pub fn suggestions(&self) -> &[ProductSuggestion] {
        &self.suggestions
    }

    pub fn user_votes(&self) -> Option<&UserVotes> {
        self.user_votes.as_ref()
    }

    pub fn stats(&self) -> &VotingStats {
        &self.stats
    }

    /// Fetch suggestions, the user's counters (when logged in) and stats together
    pub async fn reload(&mut self) -> ClientResult<()> {
        let api = &self.state.api;
        let authenticated = self.state.session.is_authenticated();

        let user_votes = async {
            if authenticated {
                api.user_votes().await.map(Some)
            } else {
                Ok(None)
            }
        };

        match tokio::try_join!(api.suggestions(), user_votes, api.voting_stats()) {
            Ok((suggestions, user_votes, stats)) => {
                tracing::debug!(count = suggestions.len(), "Voting board loaded");
                self.suggestions = suggestions;
                self.user_votes = user_votes;
                self.stats = stats;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load voting data");
                self.state
                    .notify(Notification::error("Error", "Failed to load voting data"));
                Err(e)
            }
        }
    }

    /// Reload after an accepted write. The write stands even when the
    /// reload fails; `reload` has already told the user.
    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::warn!(error = %e, "Voting board is stale after an accepted write");
        }
    }

    /// Whether the vote control for `suggestion_id` is enabled
    pub fn gate(&self, suggestion_id: &str) -> VoteGate {
        vote_gate(
            self.state.session.is_authenticated(),
            self.user_votes.as_ref(),
            suggestion_id,
        )
    }

    /// Cast a vote. Blocked votes never reach the network.
    pub async fn vote(&mut self, suggestion_id: &str) -> ClientResult<()> {
        let gate = self.gate(suggestion_id);
        if !gate.is_open() {
            let (title, description) = match gate {
                VoteGate::LoginRequired => ("Login Required", "Please login to vote for products"),
                VoteGate::AlreadyVoted => {
                    ("Already Voted", "You have already voted for this product")
                }
                _ => ("Vote Limit Reached", "You have used all your votes for this month"),
            };
            tracing::debug!(suggestion_id, gate = ?gate, "Vote blocked locally");
            self.state.notify(Notification::error(title, description));
            return Err(ClientError::VoteBlocked(gate));
        }

        match self.state.api.vote(suggestion_id).await {
            Ok(receipt) => {
                tracing::info!(suggestion_id, "Vote recorded");
                self.state.notify(Notification::info(
                    "Vote Recorded!",
                    receipt
                        .message
                        .unwrap_or_else(|| "Vote recorded successfully".to_string()),
                ));
                self.refresh_after_write().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(suggestion_id, error = %e, "Vote rejected");
                self.state.notify(Notification::error(
                    "Vote Failed",
                    e.user_message("Failed to record vote"),
                ));
                Err(e)
            }
        }
    }

    /// Propose a product for testing
    pub async fn suggest(&mut self, suggestion: &NewSuggestion) -> ClientResult<()> {
        if !self.state.session.is_authenticated() {
            self.state.notify(Notification::error(
                "Login Required",
                "Please login to suggest products",
            ));
            return Err(ClientError::Unauthenticated { message: None });
        }
        if suggestion.product_name.trim().is_empty() || suggestion.brand.trim().is_empty() {
            let invalid =
                ValidationError::missing("product_name", "Please enter the product name and brand");
            self.state
                .notify(Notification::error(invalid.title, invalid.message.clone()));
            return Err(invalid.into());
        }

        match self.state.api.suggest_product(suggestion).await {
            Ok(_) => {
                tracing::info!(product = %suggestion.product_name, "Suggestion created");
                self.state.notify(Notification::info(
                    "Suggestion Created!",
                    "Your product suggestion has been added for voting",
                ));
                self.refresh_after_write().await;
                Ok(())
            }
            Err(e) => {
                self.state.notify(Notification::error(
                    "Creation Failed",
                    e.user_message("Failed to create suggestion"),
                ));
                Err(e)
            }
        }
    }

    /// Record a share with the server and build the link to open
    pub async fn share(&self, suggestion_id: &str, platform: SharePlatform) -> ClientResult<ShareLink> {
        let info = match self.state.api.share_suggestion(suggestion_id, platform).await {
            Ok(info) => info,
            Err(e) => {
                self.state.notify(Notification::error(
                    "Share Failed",
                    e.user_message("Failed to share product"),
                ));
                return Err(e);
            }
        };

        let link = ShareLink::build(&info, platform)?;
        if platform == SharePlatform::Copy {
            self.state
                .notify(Notification::info("Copied!", "Share text copied to clipboard"));
        }
        Ok(link)
    }
}
