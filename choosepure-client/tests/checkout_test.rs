//! Checkout flows: donations, subscriptions and report purchases

mod common;

use std::sync::Arc;

use common::{create_app, sign_in, subscribed_body, unsubscribed_body, FakeBackend, ScriptedWidget};
use serde_json::json;

use choosepure_client::checkout::{
    load_plans, Donation, DonationDetails, ReportPurchaseDetails, ReportPurchaseKind,
    SubscriptionCheckout,
};
use choosepure_client::{CheckoutFlow, ClientError, GatewayOutcome, LazyWidget};
use choosepure_core::{CheckoutStatus, OrderId, PaymentConfirmation, PlanSource};

fn paid(payment: &str, order: &str, signature: &str) -> GatewayOutcome {
    GatewayOutcome::Paid(PaymentConfirmation {
        razorpay_payment_id: payment.to_string(),
        razorpay_order_id: order.to_string(),
        razorpay_signature: signature.to_string(),
    })
}

fn donor(amount: f64) -> Donation {
    Donation::new(DonationDetails {
        amount,
        donor_name: "Asha".to_string(),
        donor_email: "asha@example.com".to_string(),
        donor_phone: "9876543210".to_string(),
        message: "For the kids".to_string(),
    })
}

fn widget(scripted: ScriptedWidget) -> Arc<LazyWidget<ScriptedWidget>> {
    Arc::new(LazyWidget::new(scripted))
}

// ============================================================================
// Donations
// ============================================================================

#[tokio::test]
async fn test_successful_donation() {
    let backend = FakeBackend::start().await;
    backend.on(
        "POST",
        "/donations/create-order",
        200,
        json!({ "order_id": "o1", "amount": 50000, "currency": "INR", "key_id": "k1" }),
    );
    backend.on("POST", "/donations/verify-payment", 200, json!({ "success": true }));
    let (state, ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(paid("p1", "o1", "s1")));
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(500.0));

    let status = flow.submit().await.unwrap();

    assert_eq!(status, CheckoutStatus::Succeeded);
    assert_eq!(flow.stage(), CheckoutStatus::Succeeded);
    assert_eq!(
        flow.current().unwrap().trail(),
        &[
            CheckoutStatus::CollectingDetails,
            CheckoutStatus::OrderCreated,
            CheckoutStatus::AwaitingGateway,
            CheckoutStatus::Verifying,
            CheckoutStatus::Succeeded,
        ]
    );

    let options = &widget.inner().opened()[0];
    assert_eq!(options.amount, 50000);
    assert_eq!(options.key, "k1");
    assert_eq!(options.currency, "INR");
    assert_eq!(options.order_id, OrderId("o1".to_string()));
    assert_eq!(options.prefill.email, "asha@example.com");

    let order_body = &backend.requests_to("POST", "/donations/create-order")[0].body;
    assert_eq!(order_body["amount"], 500.0);
    assert_eq!(order_body["donor_name"], "Asha");

    let verify_body = &backend.requests_to("POST", "/donations/verify-payment")[0].body;
    assert_eq!(verify_body["razorpay_payment_id"], "p1");
    assert_eq!(verify_body["razorpay_order_id"], "o1");
    assert_eq!(verify_body["razorpay_signature"], "s1");
    assert_eq!(verify_body["donor_email"], "asha@example.com");

    let receipt = flow.receipt().unwrap();
    assert_eq!(receipt.payment_id, "p1");
    assert_eq!(ui.last().unwrap().title, "Thank You!");
}

#[tokio::test]
async fn test_failed_verification_never_succeeds() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on(
        "POST",
        "/donations/verify-payment",
        400,
        json!({ "detail": "Invalid payment signature" }),
    );
    let (state, ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(paid("p1", "o1", "bad")));
    let mut flow = CheckoutFlow::new(state, widget, donor(500.0));

    let status = flow.submit().await.unwrap();

    assert_eq!(status, CheckoutStatus::Failed);
    assert!(!flow.current().unwrap().trail().contains(&CheckoutStatus::Succeeded));
    assert!(flow.receipt().is_none());
    let notification = ui.last().unwrap();
    assert_eq!(notification.title, "Payment Verification Failed");
    assert_eq!(
        notification.description,
        "Please contact support if amount was deducted"
    );
}

#[tokio::test]
async fn test_failed_verification_retry_uses_new_order() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o2" }));
    backend.on(
        "POST",
        "/donations/verify-payment",
        400,
        json!({ "detail": "Invalid payment signature" }),
    );
    backend.on("POST", "/donations/verify-payment", 200, json!({ "success": true }));
    let (state, _ui) = create_app(&backend);
    let widget = widget(
        ScriptedWidget::new()
            .then(paid("p1", "o1", "bad"))
            .then(paid("p2", "o2", "s2")),
    );
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(500.0));

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Failed);
    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Succeeded);

    let opened = widget.inner().opened();
    assert_eq!(opened.len(), 2);
    assert_eq!(opened[1].order_id, OrderId("o2".to_string()));
    assert_eq!(flow.history()[0].status(), CheckoutStatus::Failed);
    assert_eq!(flow.receipt().unwrap().order_id, OrderId("o2".to_string()));
    assert_eq!(backend.count("POST", "/donations/create-order"), 2);
}

#[tokio::test]
async fn test_success_reported_by_server_body_false_is_failure() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on(
        "POST",
        "/donations/verify-payment",
        200,
        json!({ "success": false, "message": "Signature mismatch" }),
    );
    let (state, _ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(paid("p1", "o1", "s1")));
    let mut flow = CheckoutFlow::new(state, widget, donor(500.0));

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Failed);
}

#[tokio::test]
async fn test_dismissed_checkout_starts_fresh_order_on_retry() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o2" }));
    backend.on("POST", "/donations/verify-payment", 200, json!({ "success": true }));
    let (state, ui) = create_app(&backend);
    let widget = widget(
        ScriptedWidget::new()
            .then(GatewayOutcome::Dismissed)
            .then(paid("p2", "o2", "s2")),
    );
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(500.0));

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Cancelled);
    assert_eq!(flow.stage(), CheckoutStatus::CollectingDetails);
    assert_eq!(ui.last().unwrap().title, "Payment Cancelled");
    assert_eq!(backend.count("POST", "/donations/verify-payment"), 0);

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Succeeded);

    let opened = widget.inner().opened();
    assert_eq!(opened[0].order_id, OrderId("o1".to_string()));
    assert_eq!(opened[1].order_id, OrderId("o2".to_string()));
    assert_eq!(flow.history()[0].status(), CheckoutStatus::Cancelled);
    assert_eq!(backend.count("POST", "/donations/create-order"), 2);
    // the widget is loaded once per process
    assert_eq!(widget.inner().load_count(), 1);
}

#[tokio::test]
async fn test_reused_order_id_is_rejected() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    let (state, _ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(GatewayOutcome::Dismissed));
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(500.0));

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Cancelled);
    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert_eq!(widget.inner().opened().len(), 1);
}

#[tokio::test]
async fn test_invalid_amount_blocked_before_network() {
    let backend = FakeBackend::start().await;
    let (state, ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new());
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(5.0));

    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(ui.last().unwrap().title, "Invalid Amount");
    assert!(backend.requests().is_empty());
    assert_eq!(widget.inner().load_count(), 0);
}

#[tokio::test]
async fn test_missing_donor_details_blocked_before_network() {
    let backend = FakeBackend::start().await;
    let (state, ui) = create_app(&backend);
    let mut donation = donor(500.0);
    donation.details.donor_email = "  ".to_string();
    let mut flow = CheckoutFlow::new(state, widget(ScriptedWidget::new()), donation);

    assert!(flow.submit().await.is_err());

    assert_eq!(ui.last().unwrap().title, "Missing Information");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_order_creation_failure_notifies() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 500, json!({}));
    let (state, ui) = create_app(&backend);
    let mut flow = CheckoutFlow::new(state, widget(ScriptedWidget::new()), donor(500.0));

    assert!(flow.submit().await.is_err());

    assert_eq!(flow.stage(), CheckoutStatus::CollectingDetails);
    assert_eq!(ui.last().unwrap().description, "Failed to initiate donation");
}

#[tokio::test]
async fn test_widget_load_failure_is_retried_next_time() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o2" }));
    let (state, ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().failing_loads(1));
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(500.0));

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, ClientError::GatewayUnavailable(_)));
    assert_eq!(ui.last().unwrap().title, "Payment Gateway Error");
    assert_eq!(flow.history()[0].status(), CheckoutStatus::Failed);
    assert!(!widget.is_loaded());

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Cancelled);
    assert_eq!(widget.inner().load_count(), 2);
    assert!(widget.is_loaded());
}

#[tokio::test]
async fn test_completed_checkout_refuses_second_submit() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    backend.on("POST", "/donations/verify-payment", 200, json!({ "success": true }));
    let (state, _ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(paid("p1", "o1", "s1")));
    let mut flow = CheckoutFlow::new(state, widget, donor(500.0));

    flow.submit().await.unwrap();
    assert!(flow.submit().await.is_err());
    assert_eq!(backend.count("POST", "/donations/create-order"), 1);

    flow.reset();
    assert_eq!(flow.stage(), CheckoutStatus::CollectingDetails);
    assert!(flow.receipt().is_none());
}

#[tokio::test]
async fn test_configured_key_used_when_server_sends_none() {
    let backend = FakeBackend::start().await;
    backend.on("POST", "/donations/create-order", 200, json!({ "order_id": "o1" }));
    let mut config = backend.config();
    config.razorpay_key_id = Some("rzp_test_cfg".to_string());
    let (state, _ui) =
        common::create_app_with_config(config, Arc::new(choosepure_client::InMemoryStorage::new()));
    let widget = widget(ScriptedWidget::new());
    let mut flow = CheckoutFlow::new(state, widget.clone(), donor(250.0));

    flow.submit().await.unwrap();

    let options = &widget.inner().opened()[0];
    assert_eq!(options.key, "rzp_test_cfg");
    assert_eq!(options.amount, 25000);
}

// ============================================================================
// Subscriptions
// ============================================================================

fn script_catalogs(backend: &FakeBackend) {
    backend.on(
        "GET",
        "/subscriptions/tiers",
        200,
        json!({ "tiers": [
            { "id": "t1", "name": "Basic", "price": 99, "duration_days": 30, "is_active": true },
            { "id": "t0", "name": "Retired", "price": 49, "duration_days": 30, "is_active": false }
        ]}),
    );
    backend.on(
        "GET",
        "/subscription-payment/subscription-plans",
        200,
        json!({ "plans": [
            { "id": "annual", "name": "Annual", "amount": 999, "interval": "yearly", "popular": true }
        ]}),
    );
}

#[tokio::test]
async fn test_plans_merge_both_catalogs() {
    let backend = FakeBackend::start().await;
    script_catalogs(&backend);
    let (state, _ui) = create_app(&backend);

    let plans = load_plans(&state).await;

    let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "annual"]);
    assert_eq!(plans[0].source, PlanSource::LegacyTier);
    assert_eq!(plans[1].duration_days, 365);
    assert!(plans[1].popular);
}

#[tokio::test]
async fn test_plans_survive_one_catalog_failing() {
    let backend = FakeBackend::start().await;
    backend.on(
        "GET",
        "/subscription-payment/subscription-plans",
        200,
        json!({ "plans": [
            { "id": "monthly", "name": "Monthly", "amount": 99, "interval": "monthly" }
        ]}),
    );
    let (state, ui) = create_app(&backend);

    let plans = load_plans(&state).await;

    assert_eq!(plans.len(), 1);
    assert!(ui.notifications.read().unwrap().is_empty());
}

#[tokio::test]
async fn test_plans_both_failing_notifies() {
    let backend = FakeBackend::start().await;
    let (state, ui) = create_app(&backend);

    assert!(load_plans(&state).await.is_empty());
    assert_eq!(ui.last().unwrap().description, "Failed to load subscription plans");
}

#[tokio::test]
async fn test_subscription_requires_login() {
    let backend = FakeBackend::start().await;
    script_catalogs(&backend);
    let (state, ui) = create_app(&backend);
    let plans = load_plans(&state).await;
    let mut checkout = SubscriptionCheckout::new();
    checkout.select(plans[0].clone());
    let mut flow = CheckoutFlow::new(state, widget(ScriptedWidget::new()), checkout);

    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(ui.last().unwrap().title, "Login Required");
    assert_eq!(backend.count("POST", "/subscriptions/create-order"), 0);
}

#[tokio::test]
async fn test_subscription_without_plan_is_rejected() {
    let backend = FakeBackend::start().await;
    let (state, ui) = create_app(&backend);
    sign_in(&state, "tok", false);
    let mut flow = CheckoutFlow::new(state, widget(ScriptedWidget::new()), SubscriptionCheckout::new());

    assert!(flow.submit().await.is_err());
    assert_eq!(ui.last().unwrap().description, "Please select a plan");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_subscription_success_refreshes_status() {
    let backend = FakeBackend::start().await;
    script_catalogs(&backend);
    backend.on(
        "POST",
        "/subscriptions/create-order",
        200,
        json!({ "order_id": "order_sub1", "amount": 9900, "currency": "INR", "key_id": "k1" }),
    );
    backend.on("POST", "/subscriptions/verify-payment", 200, json!({ "success": true }));
    backend.on("GET", "/subscriptions/user/u1/status", 200, unsubscribed_body());
    backend.on("GET", "/subscriptions/user/u1/status", 200, subscribed_body());
    let (state, ui) = create_app(&backend);
    sign_in(&state, "tok", false);
    state.refresh_subscription().await;
    assert!(!state.subscription().is_subscribed);

    let plans = load_plans(&state).await;
    let mut checkout = SubscriptionCheckout::new();
    checkout.select(plans[0].clone());
    let widget = widget(ScriptedWidget::new().then(paid("p1", "order_sub1", "s1")));
    let mut flow = CheckoutFlow::new(state.clone(), widget.clone(), checkout);

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Succeeded);

    let options = &widget.inner().opened()[0];
    assert_eq!(options.amount, 9900);
    assert_eq!(options.description, "Basic Subscription");
    assert_eq!(options.prefill.name, "Asha");

    let order = &backend.requests_to("POST", "/subscriptions/create-order")[0];
    let query = order.query.as_deref().unwrap();
    assert!(query.contains("tier_id=t1"));
    assert!(query.contains("user_id=u1"));

    let verify_body = &backend.requests_to("POST", "/subscriptions/verify-payment")[0].body;
    assert_eq!(verify_body["tier_id"], "t1");
    assert_eq!(verify_body["user_id"], "u1");

    assert!(state.subscription().is_subscribed);
    assert_eq!(ui.last().unwrap().description, "Subscription activated successfully");
}

// ============================================================================
// Report purchases
// ============================================================================

fn buyer() -> ReportPurchaseDetails {
    ReportPurchaseDetails {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        pincode: "560001".to_string(),
    }
}

#[tokio::test]
async fn test_report_purchase_verifies_with_customer_order() {
    let backend = FakeBackend::start().await;
    backend.on(
        "POST",
        "/reports/purchase",
        200,
        json!({
            "success": true,
            "orderId": "CP-1001",
            "razorpayOrderId": "order_rp1",
            "amount": 199,
            "currency": "INR",
            "keyId": "k1"
        }),
    );
    backend.on("POST", "/reports/verify-payment", 200, json!({ "success": true }));
    let (state, ui) = create_app(&backend);
    let widget = widget(ScriptedWidget::new().then(paid("p1", "order_rp1", "s1")));
    let mut flow = CheckoutFlow::new(state, widget.clone(), ReportPurchaseKind::new(buyer()));

    assert_eq!(flow.submit().await.unwrap(), CheckoutStatus::Succeeded);

    let purchase_body = &backend.requests_to("POST", "/reports/purchase")[0].body;
    assert_eq!(purchase_body["firstName"], "Asha");
    assert_eq!(purchase_body["reportType"], "milk_quality_scorecard");
    assert_eq!(purchase_body["amount"], 199.0);

    let options = &widget.inner().opened()[0];
    assert_eq!(options.amount, 19900);
    assert_eq!(options.order_id, OrderId("order_rp1".to_string()));
    assert_eq!(options.prefill.name, "Asha Rao");
    assert_eq!(options.notes.get("pincode").map(String::as_str), Some("560001"));
    let widget_json = serde_json::to_value(options).unwrap();
    assert_eq!(widget_json["notes"]["city"], "Bengaluru");

    let verify_body = &backend.requests_to("POST", "/reports/verify-payment")[0].body;
    assert_eq!(verify_body["customer_order_id"], "CP-1001");
    assert_eq!(verify_body["razorpay_order_id"], "order_rp1");

    assert_eq!(flow.receipt().unwrap().reference.as_deref(), Some("CP-1001"));
    assert_eq!(ui.last().unwrap().title, "Payment Successful!");
}

#[tokio::test]
async fn test_report_purchase_requires_contact_fields() {
    let backend = FakeBackend::start().await;
    let (state, ui) = create_app(&backend);
    let mut details = buyer();
    details.phone.clear();
    let mut flow = CheckoutFlow::new(
        state,
        widget(ScriptedWidget::new()),
        ReportPurchaseKind::new(details),
    );

    let err = flow.submit().await.unwrap_err();

    match err {
        ClientError::Validation(invalid) => assert_eq!(invalid.field, "phone"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(ui.last().unwrap().description, "Please fill in all required fields.");
    assert!(backend.requests().is_empty());
}
