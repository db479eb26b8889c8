//! Checkout flow shared by donations, subscriptions and report purchases
//!
//! One [`CheckoutFlow`] drives one purpose through
//! validate, create order, open widget, verify. Each submit starts a fresh
//! [`CheckoutOrder`]; finished attempts are kept in the flow's history.
//! `Succeeded` is only ever reached after the server verified the gateway's
//! confirmation.

pub mod donation;
pub mod report;
pub mod subscription;

pub use donation::{Donation, DonationDetails, MIN_DONATION, SUGGESTED_AMOUNTS};
pub use report::{ReportPurchaseDetails, ReportPurchaseKind, REPORT_PRICE};
pub use subscription::{load_plans, SubscriptionCheckout};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use choosepure_core::{
    CheckoutOptions, CheckoutOrder, CheckoutStatus, Error as CoreError, GatewayAmount, OrderId,
    PaymentConfirmation, Prefill, ValidationError,
};

use crate::error::{ClientError, ClientResult};
use crate::gateway::{CheckoutWidget, GatewayOutcome, LazyWidget};
use crate::state::AppState;
use crate::ui::Notification;

/// Texts shown at each outcome of a checkout
#[derive(Debug, Clone, Copy)]
pub struct CheckoutMessages {
    pub success_title: &'static str,
    pub success_description: &'static str,
    pub verification_failed: &'static str,
    pub start_failed_fallback: &'static str,
    pub cancelled_title: &'static str,
}

/// What the server returned when the payment order was created
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    /// Our own reference for the purchase, when the server keeps one
    pub reference: Option<String>,
    /// Widget key, when the server supplies it
    pub key: Option<String>,
    pub amount: GatewayAmount,
    pub currency: String,
}

/// Proof of a verified checkout
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub order_id: OrderId,
    pub payment_id: String,
    pub reference: Option<String>,
}

/// One payment purpose plugged into [`CheckoutFlow`]
#[async_trait]
pub trait CheckoutKind: Send + Sync {
    /// Short label used in logs and order records
    fn purpose(&self) -> &'static str;

    /// Local checks before any network call
    fn validate(&self, state: &AppState) -> Result<(), ValidationError>;

    async fn create_order(&self, state: &AppState) -> ClientResult<CreatedOrder>;

    /// Widget description line
    fn description(&self) -> String;

    fn prefill(&self, state: &AppState) -> Prefill;

    fn notes(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    async fn verify(
        &self,
        state: &AppState,
        order: &CreatedOrder,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<()>;

    fn messages(&self) -> CheckoutMessages;

    /// Runs after a verified payment
    async fn on_success(&self, _state: &AppState) {}
}

pub struct CheckoutFlow<K, W> {
    state: Arc<AppState>,
    widget: Arc<LazyWidget<W>>,
    kind: K,
    current: Option<CheckoutOrder>,
    history: Vec<CheckoutOrder>,
    receipt: Option<Receipt>,
}

impl<K: CheckoutKind, W: CheckoutWidget> CheckoutFlow<K, W> {
    pub fn new(state: Arc<AppState>, widget: Arc<LazyWidget<W>>, kind: K) -> Self {
        Self {
            state,
            widget,
            kind,
            current: None,
            history: Vec::new(),
            receipt: None,
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Edit the details being collected
    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    /// Where the flow stands. Dismissed attempts leave it collecting details.
    pub fn stage(&self) -> CheckoutStatus {
        self.current
            .as_ref()
            .map(CheckoutOrder::status)
            .unwrap_or(CheckoutStatus::CollectingDetails)
    }

    pub fn current(&self) -> Option<&CheckoutOrder> {
        self.current.as_ref()
    }

    /// Earlier attempts, oldest first
    pub fn history(&self) -> &[CheckoutOrder] {
        &self.history
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Run one checkout attempt to its outcome.
    ///
    /// Returns the status the attempt ended in: `Succeeded`, `Failed` or
    /// `Cancelled`. Errors before the widget opens (validation, order
    /// creation, widget load) are returned as `Err` with the flow back in
    /// `CollectingDetails`.
    pub async fn submit(&mut self) -> ClientResult<CheckoutStatus> {
        match self.stage() {
            CheckoutStatus::Succeeded => return Err(CoreError::CheckoutCompleted.into()),
            CheckoutStatus::CollectingDetails
            | CheckoutStatus::Failed
            | CheckoutStatus::Cancelled => {}
            busy => return Err(CoreError::CheckoutInProgress(busy).into()),
        }
        self.retire_current();

        let messages = self.kind.messages();

        if let Err(invalid) = self.kind.validate(&self.state) {
            tracing::debug!(purpose = self.kind.purpose(), field = invalid.field, "Checkout details rejected");
            self.state
                .notify(Notification::error(invalid.title, invalid.message.clone()));
            return Err(ClientError::Validation(invalid));
        }

        let mut order = CheckoutOrder::new(self.kind.purpose());

        let created = match self.kind.create_order(&self.state).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(purpose = self.kind.purpose(), error = %e, "Order creation failed");
                self.state.notify(Notification::error(
                    "Error",
                    e.user_message(messages.start_failed_fallback),
                ));
                return Err(e);
            }
        };

        if self.order_id_used(&created.order_id) {
            let e = ClientError::InvalidResponse(format!(
                "order identifier {} was already used",
                created.order_id
            ));
            tracing::error!(purpose = self.kind.purpose(), order_id = %created.order_id, "Server reused an order identifier");
            self.state.notify(Notification::error(
                "Error",
                messages.start_failed_fallback,
            ));
            return Err(e);
        }

        order.order_created(created.order_id.clone(), created.amount, created.currency.clone())?;
        tracing::info!(
            purpose = self.kind.purpose(),
            order_id = %created.order_id,
            amount = created.amount.minor_units(),
            "Order created"
        );

        if let Err(e) = self.widget.ensure_loaded().await {
            tracing::error!(order_id = %created.order_id, error = %e, "Checkout widget failed to load");
            order.fail(e.to_string())?;
            self.history.push(order);
            self.state.notify(Notification::error(
                "Payment Gateway Error",
                "Unable to load payment gateway. Please try again.",
            ));
            return Err(e);
        }

        let options = self.options(&created);
        order.awaiting_gateway()?;
        tracing::info!(order_id = %created.order_id, "Awaiting gateway");

        match self.widget.open(options).await {
            GatewayOutcome::Dismissed => {
                order.cancel()?;
                tracing::info!(order_id = %created.order_id, "Checkout dismissed");
                self.history.push(order);
                self.state.notify(Notification::info(
                    messages.cancelled_title,
                    "You can try again anytime.",
                ));
                Ok(CheckoutStatus::Cancelled)
            }
            GatewayOutcome::Paid(confirmation) => {
                order.verifying()?;
                tracing::info!(order_id = %created.order_id, "Verifying payment");

                let status = match self
                    .kind
                    .verify(&self.state, &created, &confirmation)
                    .await
                {
                    Ok(()) => {
                        order.succeed()?;
                        tracing::info!(order_id = %created.order_id, "Payment verified");
                        self.receipt = Some(Receipt {
                            order_id: created.order_id.clone(),
                            payment_id: confirmation.razorpay_payment_id.clone(),
                            reference: created.reference.clone(),
                        });
                        self.state.notify(Notification::info(
                            messages.success_title,
                            messages.success_description,
                        ));
                        self.kind.on_success(&self.state).await;
                        CheckoutStatus::Succeeded
                    }
                    Err(e) => {
                        tracing::error!(order_id = %created.order_id, error = %e, "Payment verification failed");
                        order.fail(e.to_string())?;
                        self.state.notify(Notification::error(
                            "Payment Verification Failed",
                            messages.verification_failed,
                        ));
                        CheckoutStatus::Failed
                    }
                };
                self.current = Some(order);
                Ok(status)
            }
        }
    }

    /// Start over after a success, keeping the history
    pub fn reset(&mut self) {
        self.retire_current();
        self.receipt = None;
    }

    fn retire_current(&mut self) {
        if let Some(order) = self.current.take() {
            self.history.push(order);
        }
    }

    fn order_id_used(&self, order_id: &OrderId) -> bool {
        self.history
            .iter()
            .chain(self.current.iter())
            .any(|order| order.order_id() == Some(order_id))
    }

    fn options(&self, created: &CreatedOrder) -> CheckoutOptions {
        let key = created
            .key
            .clone()
            .or_else(|| self.state.config.razorpay_key_id.clone())
            .unwrap_or_default();

        CheckoutOptions {
            key,
            amount: created.amount.minor_units(),
            currency: created.currency.clone(),
            name: self.state.config.brand_name.clone(),
            description: self.kind.description(),
            order_id: created.order_id.clone(),
            prefill: self.kind.prefill(&self.state),
            notes: self.kind.notes(),
        }
    }
}
