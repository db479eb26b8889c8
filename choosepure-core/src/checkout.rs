//! Checkout order state machine
//!
//! Every payment (donation, subscription, report purchase) follows the same
//! path:
//!
//! ```text
//! CollectingDetails -> OrderCreated -> AwaitingGateway -> Verifying -> Succeeded
//!                           |                |               |
//!                           v                v               v
//!                         Failed         Cancelled         Failed
//! ```
//!
//! `Succeeded`, `Failed` and `Cancelled` are terminal. A new attempt always
//! starts a new [`CheckoutOrder`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Gateway order identifier returned by the server at order creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a single checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutStatus {
    CollectingDetails,
    OrderCreated,
    AwaitingGateway,
    Verifying,
    Succeeded,
    Failed,
    Cancelled,
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::CollectingDetails => "collecting-details",
            CheckoutStatus::OrderCreated => "order-created",
            CheckoutStatus::AwaitingGateway => "awaiting-gateway",
            CheckoutStatus::Verifying => "verifying",
            CheckoutStatus::Succeeded => "succeeded",
            CheckoutStatus::Failed => "failed",
            CheckoutStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutStatus::Succeeded | CheckoutStatus::Failed | CheckoutStatus::Cancelled
        )
    }

    /// Whether `self -> next` is an edge of the state machine
    pub fn can_transition_to(&self, next: CheckoutStatus) -> bool {
        use CheckoutStatus::*;
        matches!(
            (self, next),
            (CollectingDetails, OrderCreated)
                | (OrderCreated, AwaitingGateway)
                | (OrderCreated, Failed)
                | (AwaitingGateway, Verifying)
                | (AwaitingGateway, Cancelled)
                | (Verifying, Succeeded)
                | (Verifying, Failed)
        )
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount as handed to the checkout widget.
///
/// Amounts entered by the user are whole currency units. Amounts returned by
/// the server keep whatever unit the server chose and are not re-converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GatewayAmount {
    /// Whole currency units (rupees); converted at the widget boundary
    Whole(f64),
    /// Already in minor units (paise)
    Minor(u64),
}

impl GatewayAmount {
    /// Minor units for the widget. Whole amounts are multiplied by 100.
    pub fn minor_units(&self) -> u64 {
        match *self {
            GatewayAmount::Whole(whole) => (whole * 100.0).round().max(0.0) as u64,
            GatewayAmount::Minor(minor) => minor,
        }
    }
}

/// Contact block prefilled into the checkout widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact: String,
}

/// Configuration handed to the external checkout widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    /// Always minor currency units
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: OrderId,
    pub prefill: Prefill,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,
}

/// Signed confirmation fields the gateway delivers on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// One attempt to pay for a donation, subscription, or report
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    attempt_id: Uuid,
    purpose: String,
    status: CheckoutStatus,
    order_id: Option<OrderId>,
    amount: Option<GatewayAmount>,
    currency: Option<String>,
    trail: Vec<CheckoutStatus>,
    failure: Option<String>,
    created_at: DateTime<Utc>,
}

impl CheckoutOrder {
    /// Start a new attempt in `CollectingDetails`
    pub fn new(purpose: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            purpose: purpose.into(),
            status: CheckoutStatus::CollectingDetails,
            order_id: None,
            amount: None,
            currency: None,
            trail: vec![CheckoutStatus::CollectingDetails],
            failure: None,
            created_at: Utc::now(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn status(&self) -> CheckoutStatus {
        self.status
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    pub fn amount(&self) -> Option<GatewayAmount> {
        self.amount
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Every status this attempt has been in, oldest first
    pub fn trail(&self) -> &[CheckoutStatus] {
        &self.trail
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The server created the payment order
    pub fn order_created(
        &mut self,
        order_id: OrderId,
        amount: GatewayAmount,
        currency: impl Into<String>,
    ) -> Result<()> {
        self.transition(CheckoutStatus::OrderCreated)?;
        self.order_id = Some(order_id);
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        Ok(())
    }

    /// The widget is open and owns the user's attention
    pub fn awaiting_gateway(&mut self) -> Result<()> {
        self.transition(CheckoutStatus::AwaitingGateway)
    }

    /// The gateway reported success; server verification is pending
    pub fn verifying(&mut self) -> Result<()> {
        self.transition(CheckoutStatus::Verifying)
    }

    pub fn succeed(&mut self) -> Result<()> {
        self.transition(CheckoutStatus::Succeeded)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        self.transition(CheckoutStatus::Failed)?;
        self.failure = Some(reason.into());
        Ok(())
    }

    /// The user dismissed the widget
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(CheckoutStatus::Cancelled)
    }

    fn transition(&mut self, next: CheckoutStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.trail.push(next);
        Ok(())
    }
}
