//! ChoosePure Core Library
//!
//! Domain model for the ChoosePure community platform client:
//! - Sessions and user profiles shared by every flow
//! - The checkout order state machine used by donations, subscriptions
//!   and report purchases
//! - The four-step password reset state machine
//! - Vote quota gating and subscription content gating
//! - Canonical subscription plans with adapters for both backend shapes

pub mod checkout;
pub mod error;
pub mod gating;
pub mod models;
pub mod plans;
pub mod reset;
pub mod session;
pub mod voting;

pub use checkout::{
    CheckoutOptions, CheckoutOrder, CheckoutStatus, GatewayAmount, OrderId, PaymentConfirmation,
    Prefill,
};
pub use error::{Error, ValidationError};
pub use gating::{Gated, GatedReport, ScoreView, SubscriptionState};
pub use plans::{PaymentPlan, PlanSource, SubscriptionPlan, SubscriptionTier};
pub use reset::{PasswordReset, ResetStep};
pub use session::{AuthToken, Session, UserId, UserProfile};
pub use voting::{ProductSuggestion, UserVotes, VoteGate};

/// Result type for choosepure-core operations
pub type Result<T> = std::result::Result<T, Error>;
