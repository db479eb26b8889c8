//! Client configuration

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin; the REST API lives under `<backend_url>/api`
    pub backend_url: String,

    /// SQLite file holding the persisted session; in-memory when unset
    pub storage_path: Option<PathBuf>,

    /// Widget key used when the server does not return one
    pub razorpay_key_id: Option<String>,

    /// Script the checkout widget is loaded from, once per process
    pub checkout_script_url: String,

    /// Surface reset codes echoed by a non-production server
    pub expose_debug_secrets: bool,

    /// Merchant name shown in the checkout widget
    pub brand_name: String,

    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            storage_path: None,
            razorpay_key_id: None,
            checkout_script_url: DEFAULT_CHECKOUT_SCRIPT_URL.to_string(),
            expose_debug_secrets: false,
            brand_name: "ChoosePure".to_string(),
            currency: "INR".to_string(),
        }
    }
}

impl Config {
    /// Build from `CHOOSEPURE_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env::var("CHOOSEPURE_BACKEND_URL").unwrap_or(defaults.backend_url),
            storage_path: env::var("CHOOSEPURE_STORAGE_PATH").ok().map(PathBuf::from),
            razorpay_key_id: env::var("CHOOSEPURE_RAZORPAY_KEY_ID").ok(),
            checkout_script_url: env::var("CHOOSEPURE_CHECKOUT_SCRIPT_URL")
                .unwrap_or(defaults.checkout_script_url),
            expose_debug_secrets: env::var("CHOOSEPURE_EXPOSE_DEBUG_SECRETS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            brand_name: env::var("CHOOSEPURE_BRAND_NAME").unwrap_or(defaults.brand_name),
            currency: defaults.currency,
        }
    }

    /// Point at a specific backend, keeping every other default
    pub fn for_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
