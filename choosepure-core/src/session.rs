//! Session and user profile types
//!
//! A [`Session`] is the client's record of the authenticated visitor: an
//! opaque bearer token plus the profile the server returned at login.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque bearer token issued by the auth endpoints
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Profile of the logged-in user, as returned by `/auth/login` and `/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, rename = "isAdmin", alias = "is_admin")]
    pub is_admin: bool,
    #[serde(default, rename = "isSubscribed", alias = "is_subscribed")]
    pub is_subscribed: bool,
}

impl UserProfile {
    /// Admin if the server set the flag or the role says so
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.role.as_deref() == Some("admin")
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: AuthToken,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: AuthToken, user: UserProfile) -> Self {
        Self { token, user }
    }
}
