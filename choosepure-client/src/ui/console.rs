//! Terminal front end

use std::io::{self, BufRead, Write};

use super::{Confirm, Navigator, Notification, Notifier, Route, Variant};

/// Prints notifications and redirects, reads confirmations from stdin
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleUi {
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            Variant::Default => "*",
            Variant::Destructive => "!",
        };
        println!();
        println!("[{}] {}", marker, notification.title);
        if !notification.description.is_empty() {
            println!("    {}", notification.description);
        }
        println!();

        tracing::debug!(
            title = %notification.title,
            destructive = notification.is_error(),
            "Notification shown"
        );
    }
}

impl Navigator for ConsoleUi {
    fn redirect(&self, route: Route) {
        println!("-> {}", route.path());
        tracing::info!(route = route.path(), "Redirect");
    }
}

impl Confirm for ConsoleUi {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
