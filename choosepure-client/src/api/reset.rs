//! `/password-reset` endpoints

use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::ClientResult;

/// Acknowledgement of a reset step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetAck {
    #[serde(default)]
    pub message: Option<String>,
    /// Only sent by servers running in demo mode
    #[serde(default)]
    pub reset_token: Option<String>,
}

impl ApiClient {
    pub async fn request_reset(&self, email: &str) -> ClientResult<ResetAck> {
        self.post("/password-reset/request-reset", &json!({ "email": email }))
            .await
    }

    pub async fn verify_reset_code(&self, email: &str, code: &str) -> ClientResult<ResetAck> {
        self.post(
            "/password-reset/verify-token",
            &json!({ "email": email, "reset_token": code }),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> ClientResult<ResetAck> {
        self.post(
            "/password-reset/reset-password",
            &json!({ "email": email, "reset_token": code, "new_password": new_password }),
        )
        .await
    }
}
