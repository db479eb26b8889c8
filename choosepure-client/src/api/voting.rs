//! `/product-voting` endpoints

use serde::Deserialize;
use serde_json::{json, Value};

use choosepure_core::voting::{NewSuggestion, SharePlatform, ShareInfo, VotingStats};
use choosepure_core::{ProductSuggestion, UserVotes};

use super::{ensure_success, extract, extract_list, ApiClient, WriteAck};
use crate::error::ClientResult;

/// Server response to a recorded vote
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<VoteOutcome>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteOutcome {
    #[serde(default)]
    pub new_vote_count: u64,
    #[serde(default)]
    pub threshold_reached: bool,
    #[serde(default)]
    pub user_monthly_votes_remaining: i64,
}

impl ApiClient {
    /// Suggestions open for voting, most voted first
    pub async fn suggestions(&self) -> ClientResult<Vec<ProductSuggestion>> {
        let body: Value = self.get("/product-voting/suggestions").await?;
        extract_list(body, "suggestions")
    }

    pub async fn user_votes(&self) -> ClientResult<UserVotes> {
        let body: Value = self.get("/product-voting/user-votes").await?;
        extract(body)
    }

    pub async fn voting_stats(&self) -> ClientResult<VotingStats> {
        let body: Value = self.get("/product-voting/stats").await?;
        extract(body)
    }

    pub async fn vote(&self, suggestion_id: &str) -> ClientResult<VoteReceipt> {
        let body: Value = self
            .post(
                "/product-voting/vote",
                &json!({ "product_suggestion_id": suggestion_id }),
            )
            .await?;
        ensure_success(&body)?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    pub async fn suggest_product(&self, suggestion: &NewSuggestion) -> ClientResult<WriteAck> {
        let body: Value = self
            .post("/product-voting/suggestions", suggestion)
            .await?;
        ensure_success(&body)?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    pub async fn share_suggestion(
        &self,
        suggestion_id: &str,
        platform: SharePlatform,
    ) -> ClientResult<ShareInfo> {
        let body: Value = self
            .post_with_query(
                &format!("/product-voting/share/{}", suggestion_id),
                &[("shared_via", platform.as_str())],
            )
            .await?;
        ensure_success(&body)?;
        extract(body)
    }
}
