//! Donations

use async_trait::async_trait;

use choosepure_core::{GatewayAmount, OrderId, PaymentConfirmation, Prefill, ValidationError};

use super::{CheckoutKind, CheckoutMessages, CreatedOrder};
use crate::api::{DonationOrder, DonationVerification};
use crate::error::ClientResult;
use crate::state::AppState;

/// Preset amounts offered to the donor, in rupees
pub const SUGGESTED_AMOUNTS: [f64; 5] = [100.0, 500.0, 1000.0, 2000.0, 5000.0];
/// Smallest accepted donation, in rupees
pub const MIN_DONATION: f64 = 10.0;
const DEFAULT_AMOUNT: f64 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DonationDetails {
    /// Whole rupees
    pub amount: f64,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub message: String,
}

impl Default for DonationDetails {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            donor_name: String::new(),
            donor_email: String::new(),
            donor_phone: String::new(),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Donation {
    pub details: DonationDetails,
}

impl Donation {
    pub fn new(details: DonationDetails) -> Self {
        Self { details }
    }

    /// Pick one of [`SUGGESTED_AMOUNTS`] or any other amount
    pub fn select_amount(&mut self, amount: f64) {
        self.details.amount = amount;
    }

    /// Set the amount from a free-text field; unparsable input counts as zero
    pub fn set_custom_amount(&mut self, input: &str) {
        self.details.amount = input.trim().parse().unwrap_or(0.0);
    }
}

#[async_trait]
impl CheckoutKind for Donation {
    fn purpose(&self) -> &'static str {
        "donation"
    }

    fn validate(&self, _state: &AppState) -> Result<(), ValidationError> {
        let details = &self.details;
        if !details.amount.is_finite() || details.amount < MIN_DONATION {
            return Err(ValidationError::new(
                "amount",
                "Invalid Amount",
                format!("Please enter an amount of at least ₹{}", MIN_DONATION),
            ));
        }
        if details.donor_name.trim().is_empty() || details.donor_email.trim().is_empty() {
            return Err(ValidationError::missing(
                "donor",
                "Please enter your name and email",
            ));
        }
        Ok(())
    }

    async fn create_order(&self, state: &AppState) -> ClientResult<CreatedOrder> {
        let details = &self.details;
        let order = state
            .api
            .create_donation_order(&DonationOrder {
                amount: details.amount,
                donor_name: details.donor_name.trim().to_string(),
                donor_email: details.donor_email.trim().to_string(),
                donor_phone: details.donor_phone.trim().to_string(),
                message: details.message.clone(),
            })
            .await?;

        Ok(CreatedOrder {
            order_id: OrderId(order.order_id),
            reference: None,
            key: order.key_id,
            amount: GatewayAmount::Whole(details.amount),
            currency: order.currency,
        })
    }

    fn description(&self) -> String {
        "Support Food Safety for Children".to_string()
    }

    fn prefill(&self, _state: &AppState) -> Prefill {
        Prefill {
            name: self.details.donor_name.trim().to_string(),
            email: self.details.donor_email.trim().to_string(),
            contact: self.details.donor_phone.trim().to_string(),
        }
    }

    async fn verify(
        &self,
        state: &AppState,
        _order: &CreatedOrder,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<()> {
        let details = &self.details;
        state
            .api
            .verify_donation(&DonationVerification {
                confirmation: confirmation.clone(),
                donor_name: details.donor_name.trim().to_string(),
                donor_email: details.donor_email.trim().to_string(),
                donor_phone: details.donor_phone.trim().to_string(),
                amount: details.amount,
                message: details.message.clone(),
            })
            .await?;
        Ok(())
    }

    fn messages(&self) -> CheckoutMessages {
        CheckoutMessages {
            success_title: "Thank You!",
            success_description: "Your generous donation helps us test food and keep children safe!",
            verification_failed: "Please contact support if amount was deducted",
            start_failed_fallback: "Failed to initiate donation",
            cancelled_title: "Payment Cancelled",
        }
    }
}
