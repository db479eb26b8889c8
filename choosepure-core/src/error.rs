//! Error types for ChoosePure core

use std::fmt;

use thiserror::Error;

use crate::checkout::CheckoutStatus;
use crate::reset::ResetStep;

/// A client-local validation failure.
///
/// Never reaches the network. `title` and `message` are what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub title: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            title,
            message: message.into(),
        }
    }

    /// The "Missing Information" rejection used by every details form
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(field, "Missing Information", message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidTransition {
        from: CheckoutStatus,
        to: CheckoutStatus,
    },

    #[error("A checkout is already in progress ({0})")]
    CheckoutInProgress(CheckoutStatus),

    #[error("Checkout already completed")]
    CheckoutCompleted,

    #[error("Action not allowed in reset step {0}")]
    InvalidResetStep(ResetStep),
}
