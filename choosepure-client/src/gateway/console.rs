//! Terminal checkout widget
//!
//! Prints the order the way the hosted widget would show it and reads the
//! gateway's confirmation fields from standard input. Useful against a
//! backend in test mode, where payments are completed out of band.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use choosepure_core::{CheckoutOptions, PaymentConfirmation};

use super::{CheckoutWidget, GatewayOutcome};
use crate::error::{ClientError, ClientResult};

pub struct ConsoleWidget {
    http: reqwest::Client,
    script_url: String,
}

impl ConsoleWidget {
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            script_url: script_url.into(),
        }
    }
}

#[async_trait]
impl CheckoutWidget for ConsoleWidget {
    async fn load(&self) -> ClientResult<()> {
        let response = self
            .http
            .get(&self.script_url)
            .send()
            .await
            .map_err(|e| ClientError::GatewayUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::GatewayUnavailable(format!(
                "{} returned {}",
                self.script_url,
                response.status()
            )));
        }

        tracing::info!(url = %self.script_url, "Checkout widget loaded");
        Ok(())
    }

    async fn open(&self, options: CheckoutOptions) -> GatewayOutcome {
        let result = tokio::task::spawn_blocking(move || prompt_confirmation(&options)).await;

        match result {
            Ok(Ok(Some(confirmation))) => GatewayOutcome::Paid(confirmation),
            Ok(Ok(None)) => GatewayOutcome::Dismissed,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Could not read payment confirmation");
                GatewayOutcome::Dismissed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Checkout prompt task failed");
                GatewayOutcome::Dismissed
            }
        }
    }
}

/// `None` when the user leaves the payment id empty
fn prompt_confirmation(options: &CheckoutOptions) -> io::Result<Option<PaymentConfirmation>> {
    let amount = options.amount as f64 / 100.0;

    println!();
    println!("========================================");
    println!("  {}", options.name);
    println!("  {}", options.description);
    println!("  AMOUNT: {:.2} {}", amount, options.currency);
    println!("  ORDER: {}", options.order_id);
    println!("  KEY: {}", options.key);
    for (key, value) in &options.notes {
        println!("  {}: {}", key, value);
    }
    println!("========================================");
    println!("Complete the payment, then enter the gateway response.");
    println!("Leave the payment id empty to cancel.");

    let payment_id = read_field("razorpay_payment_id")?;
    if payment_id.is_empty() {
        return Ok(None);
    }
    let order_id = read_field(&format!("razorpay_order_id [{}]", options.order_id))?;
    let signature = read_field("razorpay_signature")?;

    Ok(Some(PaymentConfirmation {
        razorpay_payment_id: payment_id,
        razorpay_order_id: if order_id.is_empty() {
            options.order_id.to_string()
        } else {
            order_id
        },
        razorpay_signature: signature,
    }))
}

fn read_field(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
