//! Embedded checkout widget seam
//!
//! The widget is loaded once per process and then opened per order. Opening
//! resolves to exactly one outcome: the gateway's signed confirmation, or a
//! dismissal. The confirmation is never treated as proof of payment; the
//! checkout flow always verifies it with the server first.

pub mod console;

pub use console::ConsoleWidget;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use choosepure_core::{CheckoutOptions, PaymentConfirmation};

use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Paid(PaymentConfirmation),
    Dismissed,
}

#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    /// Fetch whatever the widget needs before it can be opened
    async fn load(&self) -> ClientResult<()>;

    /// Show the widget for one order and wait for the user
    async fn open(&self, options: CheckoutOptions) -> GatewayOutcome;
}

/// Loads the inner widget on first use only.
///
/// A failed load is not cached; the next checkout tries again.
pub struct LazyWidget<W> {
    inner: W,
    loaded: OnceCell<()>,
}

impl<W: CheckoutWidget> LazyWidget<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            loaded: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    pub async fn ensure_loaded(&self) -> ClientResult<()> {
        self.loaded
            .get_or_try_init(|| async {
                tracing::debug!("Loading checkout widget");
                self.inner.load().await
            })
            .await?;
        Ok(())
    }

    pub async fn open(&self, options: CheckoutOptions) -> GatewayOutcome {
        self.inner.open(options).await
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}
