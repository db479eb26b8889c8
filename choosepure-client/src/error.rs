//! Client error types

use choosepure_core::{ValidationError, VoteGate};
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// `message` is the server's detail, when it sent one
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status})")]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Vote not allowed: {0:?}")]
    VoteBlocked(VoteGate),

    #[error("Admin access required")]
    AccessDenied,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Core(choosepure_core::Error),
}

impl From<choosepure_core::Error> for ClientError {
    fn from(err: choosepure_core::Error) -> Self {
        match err {
            choosepure_core::Error::Validation(invalid) => ClientError::Validation(invalid),
            other => ClientError::Core(other),
        }
    }
}

impl From<rusqlite::Error> for ClientError {
    fn from(err: rusqlite::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Error taxonomy as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-local; never reached the network
    Validation,
    /// 401 from the server; the session has already been cleared
    Authentication,
    /// 4xx with a message the user can act on
    BusinessRejection,
    /// 5xx, network failure or an unreadable response
    ServerFailure,
    /// The checkout widget could not be loaded
    GatewayFailure,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_)
            | ClientError::VoteBlocked(_)
            | ClientError::AccessDenied
            | ClientError::Core(_) => ErrorKind::Validation,
            ClientError::Unauthenticated { .. } => ErrorKind::Authentication,
            ClientError::Rejected { .. } => ErrorKind::BusinessRejection,
            ClientError::GatewayUnavailable(_) => ErrorKind::GatewayFailure,
            ClientError::Network(_)
            | ClientError::Server { .. }
            | ClientError::InvalidResponse(_)
            | ClientError::Storage(_) => ErrorKind::ServerFailure,
        }
    }

    /// Text to show the user.
    ///
    /// Rejections and 401 details are shown verbatim; everything else gets
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Unauthenticated {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            ClientError::Validation(invalid) => invalid.message.clone(),
            _ => fallback.to_string(),
        }
    }
}
