//! User-facing side effects: notifications, navigation, confirmation
//!
//! Flows never print or navigate directly. They go through these traits so
//! that a terminal, a test recorder, or any other front end can be plugged in.

pub mod console;

pub use console::ConsoleUi;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

/// A toast-style message with a title and a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Places a flow can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Pricing,
    Reports,
    Voting,
    Dashboard,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Pricing => "/pricing",
            Route::Reports => "/test-reports",
            Route::Voting => "/vote",
            Route::Dashboard => "/dashboard",
            Route::Admin => "/admin",
        }
    }
}

/// Hard navigation; any in-memory view state is discarded
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

/// Yes/no prompt for destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
