//! Subscription plans
//!
//! The backend serves plans in two shapes: legacy tiers from
//! `/subscriptions/tiers` and newer payment plans with a billing interval.
//! Both are adapted at the boundary into one [`SubscriptionPlan`].

use serde::{Deserialize, Serialize};

const MONTH_DAYS: u32 = 30;
const YEAR_DAYS: u32 = 365;

/// Legacy subscription tier; also the admin-managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTier {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub duration_days: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Newer plan shape with a billing interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    /// monthly, yearly
    pub interval: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    LegacyTier,
    PaymentPlan,
}

/// The one plan type used throughout the client
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Whole currency units
    pub price: f64,
    pub duration_days: u32,
    pub features: Vec<String>,
    pub popular: bool,
    pub source: PlanSource,
}

impl From<SubscriptionTier> for SubscriptionPlan {
    fn from(tier: SubscriptionTier) -> Self {
        Self {
            id: tier.id,
            name: tier.name,
            description: tier.description,
            price: tier.price,
            duration_days: tier.duration_days,
            features: tier.features,
            popular: false,
            source: PlanSource::LegacyTier,
        }
    }
}

impl From<PaymentPlan> for SubscriptionPlan {
    fn from(plan: PaymentPlan) -> Self {
        let duration_days = if plan.interval == "yearly" {
            YEAR_DAYS
        } else {
            MONTH_DAYS
        };
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            price: plan.amount,
            duration_days,
            features: plan.features,
            popular: plan.popular,
            source: PlanSource::PaymentPlan,
        }
    }
}

/// Merge both catalogs, legacy tiers first. Inactive tiers are dropped.
pub fn merge_plans(tiers: Vec<SubscriptionTier>, plans: Vec<PaymentPlan>) -> Vec<SubscriptionPlan> {
    tiers
        .into_iter()
        .filter(|tier| tier.is_active)
        .map(SubscriptionPlan::from)
        .chain(plans.into_iter().map(SubscriptionPlan::from))
        .collect()
}
