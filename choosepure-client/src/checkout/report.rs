//! Full report purchases

use std::collections::BTreeMap;

use async_trait::async_trait;

use choosepure_core::{GatewayAmount, OrderId, PaymentConfirmation, Prefill, ValidationError};

use super::{CheckoutKind, CheckoutMessages, CreatedOrder};
use crate::api::{ReportPurchase, ReportVerification};
use crate::error::{ClientError, ClientResult};
use crate::state::AppState;

/// Price of a full report, in rupees
pub const REPORT_PRICE: f64 = 199.0;
const REPORT_TYPE: &str = "milk_quality_scorecard";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPurchaseDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl ReportPurchaseDetails {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportPurchaseKind {
    pub details: ReportPurchaseDetails,
}

impl ReportPurchaseKind {
    pub fn new(details: ReportPurchaseDetails) -> Self {
        Self { details }
    }
}

#[async_trait]
impl CheckoutKind for ReportPurchaseKind {
    fn purpose(&self) -> &'static str {
        "report-purchase"
    }

    fn validate(&self, _state: &AppState) -> Result<(), ValidationError> {
        let details = &self.details;
        let required = [
            ("first_name", &details.first_name),
            ("email", &details.email),
            ("phone", &details.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::missing(
                *field,
                "Please fill in all required fields.",
            ));
        }
        Ok(())
    }

    async fn create_order(&self, state: &AppState) -> ClientResult<CreatedOrder> {
        let details = &self.details;
        let order = state
            .api
            .purchase_report(&ReportPurchase {
                first_name: details.first_name.trim().to_string(),
                last_name: details.last_name.trim().to_string(),
                email: details.email.trim().to_string(),
                phone: details.phone.trim().to_string(),
                address: details.address.clone(),
                city: details.city.clone(),
                pincode: details.pincode.clone(),
                report_type: REPORT_TYPE.to_string(),
                amount: REPORT_PRICE,
            })
            .await?;

        Ok(CreatedOrder {
            order_id: OrderId(order.razorpay_order_id),
            reference: Some(order.order_id),
            key: order.key_id,
            amount: GatewayAmount::Whole(order.amount),
            currency: order.currency,
        })
    }

    fn description(&self) -> String {
        "Milk Quality Scorecard Report".to_string()
    }

    fn prefill(&self, _state: &AppState) -> Prefill {
        Prefill {
            name: self.details.full_name(),
            email: self.details.email.trim().to_string(),
            contact: self.details.phone.trim().to_string(),
        }
    }

    fn notes(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("address".to_string(), self.details.address.clone()),
            ("city".to_string(), self.details.city.clone()),
            ("pincode".to_string(), self.details.pincode.clone()),
        ])
    }

    async fn verify(
        &self,
        state: &AppState,
        order: &CreatedOrder,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<()> {
        let customer_order_id = order.reference.clone().ok_or_else(|| {
            ClientError::InvalidResponse("report order has no customer reference".to_string())
        })?;

        state
            .api
            .verify_report_payment(&ReportVerification {
                confirmation: confirmation.clone(),
                customer_order_id,
            })
            .await?;
        Ok(())
    }

    fn messages(&self) -> CheckoutMessages {
        CheckoutMessages {
            success_title: "Payment Successful!",
            success_description: "Your full report will be sent to your email within 24 hours.",
            verification_failed: "Please contact support with your payment details.",
            start_failed_fallback: "There was an error processing your payment. Please try again.",
            cancelled_title: "Payment Cancelled",
        }
    }
}
