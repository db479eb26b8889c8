//! Application state shared by every flow
//!
//! Built once at startup and passed explicitly; there is no global lookup.

use std::sync::{Arc, RwLock};

use choosepure_core::SubscriptionState;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ClientResult;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::ui::{Navigator, Notification, Notifier};

pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    subscription: RwLock<SubscriptionState>,
}

impl AppState {
    /// Wire the state and restore any persisted session
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let session = Arc::new(SessionStore::new(storage));
        session.restore();

        let api = ApiClient::new(config.api_base(), session.clone(), navigator.clone())?;

        Ok(Self {
            config,
            session,
            api,
            notifier,
            navigator,
            subscription: RwLock::new(SubscriptionState::unsubscribed()),
        })
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Cached paywall state; always unsubscribed without a session
    pub fn subscription(&self) -> SubscriptionState {
        if !self.session.is_authenticated() {
            return SubscriptionState::unsubscribed();
        }
        self.subscription.read().unwrap().clone()
    }

    pub fn set_subscription(&self, state: SubscriptionState) {
        *self.subscription.write().unwrap() = state;
    }

    /// Re-read the subscription status of the current user.
    ///
    /// Failures are logged and leave the user unsubscribed.
    pub async fn refresh_subscription(&self) -> SubscriptionState {
        let state = match self.session.user() {
            Some(user) => match self.api.subscription_status(&user.id).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Failed to load subscription status");
                    SubscriptionState::unsubscribed()
                }
            },
            None => SubscriptionState::unsubscribed(),
        };

        tracing::debug!(subscribed = state.is_subscribed, "Subscription state refreshed");
        self.set_subscription(state.clone());
        state
    }
}
