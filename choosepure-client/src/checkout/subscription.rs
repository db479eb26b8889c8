//! Subscriptions

use async_trait::async_trait;

use choosepure_core::plans::merge_plans;
use choosepure_core::{
    GatewayAmount, OrderId, PaymentConfirmation, Prefill, SubscriptionPlan, ValidationError,
};

use super::{CheckoutKind, CheckoutMessages, CreatedOrder};
use crate::api::SubscriptionVerification;
use crate::error::{ClientError, ClientResult};
use crate::state::AppState;
use crate::ui::Notification;

/// Load both plan catalogs, legacy tiers first.
///
/// Either catalog failing to load counts as empty.
pub async fn load_plans(state: &AppState) -> Vec<SubscriptionPlan> {
    let (tiers, plans) = tokio::join!(state.api.subscription_tiers(), state.api.payment_plans());

    let failed = tiers.is_err() && plans.is_err();
    let tiers = tiers.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load subscription tiers");
        Vec::new()
    });
    let plans = plans.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load payment plans");
        Vec::new()
    });

    if failed {
        state.notify(Notification::error("Error", "Failed to load subscription plans"));
    }
    merge_plans(tiers, plans)
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionCheckout {
    plan: Option<SubscriptionPlan>,
}

impl SubscriptionCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, plan: SubscriptionPlan) {
        self.plan = Some(plan);
    }

    pub fn plan(&self) -> Option<&SubscriptionPlan> {
        self.plan.as_ref()
    }
}

fn selected(plan: &Option<SubscriptionPlan>) -> ClientResult<&SubscriptionPlan> {
    plan.as_ref()
        .ok_or_else(|| ValidationError::missing("plan", "Please select a plan").into())
}

#[async_trait]
impl CheckoutKind for SubscriptionCheckout {
    fn purpose(&self) -> &'static str {
        "subscription"
    }

    fn validate(&self, state: &AppState) -> Result<(), ValidationError> {
        if !state.session.is_authenticated() {
            return Err(ValidationError::new(
                "session",
                "Login Required",
                "Please login to subscribe to a plan",
            ));
        }
        if self.plan.is_none() {
            return Err(ValidationError::missing("plan", "Please select a plan"));
        }
        Ok(())
    }

    async fn create_order(&self, state: &AppState) -> ClientResult<CreatedOrder> {
        let plan = selected(&self.plan)?;
        let user = state.session.user().ok_or(ClientError::Unauthenticated { message: None })?;

        let order = state.api.create_subscription_order(&plan.id, &user.id).await?;
        let amount = match order.amount {
            Some(minor) => GatewayAmount::Minor(minor.round().max(0.0) as u64),
            None => GatewayAmount::Whole(plan.price),
        };

        Ok(CreatedOrder {
            order_id: OrderId(order.order_id),
            reference: None,
            key: order.key_id,
            amount,
            currency: order.currency,
        })
    }

    fn description(&self) -> String {
        match &self.plan {
            Some(plan) => format!("{} Subscription", plan.name),
            None => "Subscription".to_string(),
        }
    }

    fn prefill(&self, state: &AppState) -> Prefill {
        match state.session.user() {
            Some(user) => Prefill {
                name: user.name,
                email: user.email,
                contact: user.mobile.unwrap_or_default(),
            },
            None => Prefill::default(),
        }
    }

    async fn verify(
        &self,
        state: &AppState,
        _order: &CreatedOrder,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<()> {
        let plan = selected(&self.plan)?;
        let user = state.session.user().ok_or(ClientError::Unauthenticated { message: None })?;

        state
            .api
            .verify_subscription(&SubscriptionVerification {
                confirmation: confirmation.clone(),
                user_id: user.id,
                tier_id: plan.id.clone(),
            })
            .await?;
        Ok(())
    }

    fn messages(&self) -> CheckoutMessages {
        CheckoutMessages {
            success_title: "Success!",
            success_description: "Subscription activated successfully",
            verification_failed: "Please contact support if amount was deducted",
            start_failed_fallback: "Failed to initiate payment",
            cancelled_title: "Subscription Cancelled",
        }
    }

    async fn on_success(&self, state: &AppState) {
        state.refresh_subscription().await;
    }
}
