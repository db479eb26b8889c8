//! Payment endpoints: donations, subscriptions, report purchases

use serde::{Deserialize, Serialize};
use serde_json::Value;

use choosepure_core::{
    PaymentConfirmation, PaymentPlan, SubscriptionState, SubscriptionTier, UserId,
};

use super::{ensure_success, extract_list, ApiClient, WriteAck};
use crate::error::{ClientError, ClientResult};

fn default_currency() -> String {
    "INR".to_string()
}

/// Order created by the donation or subscription endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub order_id: String,
    /// Minor units, as sent by the server
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub key_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationOrder {
    /// Whole currency units
    pub amount: f64,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationVerification {
    #[serde(flatten)]
    pub confirmation: PaymentConfirmation,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub amount: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionOrder<'a> {
    pub tier_id: &'a str,
    pub user_id: &'a UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionVerification {
    #[serde(flatten)]
    pub confirmation: PaymentConfirmation,
    pub user_id: UserId,
    pub tier_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPurchase {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub report_type: String,
    /// Whole currency units
    pub amount: f64,
}

/// Order created by the report purchase endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ReportOrder {
    /// Our own order reference, shown to the customer
    #[serde(alias = "orderId")]
    pub order_id: String,
    #[serde(alias = "razorpayOrderId")]
    pub razorpay_order_id: String,
    /// Whole currency units
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, alias = "keyId")]
    pub key_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportVerification {
    #[serde(flatten)]
    pub confirmation: PaymentConfirmation,
    pub customer_order_id: String,
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> ClientResult<T> {
    ensure_success(&body)?;
    serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

impl ApiClient {
    // ========================================================================
    // Donations
    // ========================================================================

    pub async fn create_donation_order(&self, order: &DonationOrder) -> ClientResult<GatewayOrder> {
        let body: Value = self.post("/donations/create-order", order).await?;
        decode(body)
    }

    pub async fn verify_donation(&self, verification: &DonationVerification) -> ClientResult<WriteAck> {
        let body: Value = self.post("/donations/verify-payment", verification).await?;
        decode(body)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Legacy tier catalog
    pub async fn subscription_tiers(&self) -> ClientResult<Vec<SubscriptionTier>> {
        let body: Value = self.get("/subscriptions/tiers").await?;
        extract_list(body, "tiers")
    }

    /// Newer plan catalog
    pub async fn payment_plans(&self) -> ClientResult<Vec<PaymentPlan>> {
        let body: Value = self
            .get("/subscription-payment/subscription-plans")
            .await?;
        extract_list(body, "plans")
    }

    pub async fn create_tier(&self, tier: &SubscriptionTier) -> ClientResult<WriteAck> {
        self.post("/subscriptions/tiers", tier).await
    }

    pub async fn update_tier(&self, id: &str, tier: &SubscriptionTier) -> ClientResult<WriteAck> {
        self.put(&format!("/subscriptions/tiers/{}", id), tier).await
    }

    pub async fn delete_tier(&self, id: &str) -> ClientResult<WriteAck> {
        self.delete(&format!("/subscriptions/tiers/{}", id)).await
    }

    pub async fn create_subscription_order(
        &self,
        tier_id: &str,
        user_id: &UserId,
    ) -> ClientResult<GatewayOrder> {
        let body: Value = self
            .post_with_query(
                "/subscriptions/create-order",
                &SubscriptionOrder { tier_id, user_id },
            )
            .await?;
        decode(body)
    }

    pub async fn verify_subscription(
        &self,
        verification: &SubscriptionVerification,
    ) -> ClientResult<WriteAck> {
        let body: Value = self
            .post("/subscriptions/verify-payment", verification)
            .await?;
        decode(body)
    }

    pub async fn subscription_status(&self, user_id: &UserId) -> ClientResult<SubscriptionState> {
        self.get(&format!("/subscriptions/user/{}/status", user_id))
            .await
    }

    // ========================================================================
    // Report purchases
    // ========================================================================

    pub async fn purchase_report(&self, purchase: &ReportPurchase) -> ClientResult<ReportOrder> {
        let body: Value = self.post("/reports/purchase", purchase).await?;
        decode(body)
    }

    pub async fn verify_report_payment(
        &self,
        verification: &ReportVerification,
    ) -> ClientResult<WriteAck> {
        let body: Value = self
            .post("/reports/verify-payment", verification)
            .await?;
        decode(body)
    }
}
