//! `/auth` endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use choosepure_core::UserProfile;

use super::ApiClient;
use crate::error::{ClientError, ClientResult};

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Body of a successful login or registration
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        self.post("/auth/login", credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse> {
        self.post("/auth/register", registration).await
    }

    /// Profile of the user owning the current token
    pub async fn me(&self) -> ClientResult<UserProfile> {
        let body: Value = self.get("/auth/me").await?;
        let user = match body {
            Value::Object(mut map) if map.contains_key("user") => {
                map.remove("user").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(user).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
