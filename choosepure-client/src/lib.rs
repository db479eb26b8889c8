//! ChoosePure Client
//!
//! Session handling, the API gateway client and the multi-step flows
//! (auth, password reset, checkout, voting, gated reports, admin CRUD) of
//! the ChoosePure community platform, wired together through an explicitly
//! injected [`AppState`].

pub mod admin;
pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod reports;
pub mod reset;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;
pub mod voting;

pub use api::ApiClient;
pub use checkout::{CheckoutFlow, CheckoutKind, CreatedOrder, Receipt};
pub use config::Config;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use gateway::{CheckoutWidget, ConsoleWidget, GatewayOutcome, LazyWidget};
pub use session::SessionStore;
pub use state::AppState;
pub use storage::{InMemoryStorage, SqliteStorage, Storage};
pub use ui::{Confirm, ConsoleUi, Navigator, Notification, Notifier, Route, Variant};
