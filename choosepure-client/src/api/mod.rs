//! REST API gateway client
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token when a session exists and applies the global 401 policy: the
//! session is cleared and the user is sent home before the caller sees
//! [`ClientError::Unauthenticated`].

mod auth;
mod content;
mod payments;
mod reset;
mod voting;

pub use auth::{AuthResponse, Credentials, Registration};
pub use content::{ReportQuery, WriteAck};
pub use payments::{
    DonationOrder, DonationVerification, GatewayOrder, ReportOrder, ReportPurchase,
    ReportVerification, SubscriptionOrder, SubscriptionVerification,
};
pub use reset::ResetAck;
pub use voting::{VoteOutcome, VoteReceipt};

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::ui::{Navigator, Route};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for `base_url` (the `/api` root).
    ///
    /// No request timeout is set; a hung request suspends its caller.
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, self.http.get(self.url(path)))
            .await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, self.http.get(self.url(path)).query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, self.http.post(self.url(path)).json(body))
            .await
    }

    /// POST with query parameters and no body
    pub async fn post_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::POST, path, self.http.post(self.url(path)).query(query))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, self.http.put(self.url(path)).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, self.http.delete(self.url(path)))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let request = match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, token.bearer()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(%method, path, error = %e, "Request failed");
            ClientError::Network(e)
        })?;
        let status = response.status();

        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| error_detail(&value));
            self.handle_unauthorized(&method, path);
            return Err(ClientError::Unauthenticated { message: detail });
        }

        if status.is_success() {
            let body = if body.trim().is_empty() { "{}" } else { &body };
            return serde_json::from_str(body).map_err(|e| {
                tracing::error!(%method, path, error = %e, "Unreadable response body");
                ClientError::InvalidResponse(format!("{} {}: {}", method, path, e))
            });
        }

        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| error_detail(&value));

        if status.is_client_error() {
            tracing::warn!(%method, path, status = status.as_u16(), detail = ?detail, "Request rejected");
            Err(ClientError::Rejected {
                status: status.as_u16(),
                message: detail.unwrap_or_default(),
            })
        } else {
            tracing::error!(%method, path, status = status.as_u16(), "Server failure");
            Err(ClientError::Server {
                status: status.as_u16(),
                message: detail,
            })
        }
    }

    fn handle_unauthorized(&self, method: &Method, path: &str) {
        tracing::warn!(%method, path, "Authentication failed, clearing session");
        self.session.clear();
        self.navigator.redirect(Route::Home);
    }
}

/// Human-readable message from an error body.
///
/// Accepts `{detail: "..."}`, a validation list `{detail: [{msg}]}`, or
/// `{message: "..."}`.
pub fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Treat a 2xx body carrying `success: false` as a rejection
pub fn ensure_success(body: &Value) -> ClientResult<()> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ClientError::Rejected {
            status: StatusCode::OK.as_u16(),
            message: error_detail(body).unwrap_or_default(),
        });
    }
    Ok(())
}

/// The `data` envelope if present, otherwise the body itself
pub fn payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode the `data` envelope (or the bare body) into `T`
pub fn extract<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    serde_json::from_value(payload(body)).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Pull a single object out of `{key: {..}}`, `{data: {..}}` or the bare body
pub fn extract_item<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<T> {
    let item = match body {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => payload(other),
    };
    serde_json::from_value(item).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Pull a list out of `{key: [..]}`, `{data: {key: [..]}}`, `{data: [..]}` or `[..]`
pub fn extract_list<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<Vec<T>> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => match map.remove(key) {
            Some(list) => list,
            None => match map.remove("data") {
                Some(Value::Object(mut data)) => data.remove(key).unwrap_or(Value::Null),
                Some(list @ Value::Array(_)) => list,
                _ => Value::Null,
            },
        },
        _ => Value::Null,
    };

    if list.is_null() {
        return Err(ClientError::InvalidResponse(format!(
            "expected a list under `{}`",
            key
        )));
    }
    serde_json::from_value(list).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
