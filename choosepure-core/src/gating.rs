//! Subscription gating of report content
//!
//! Presentation-layer only. Whether the underlying data is also restricted
//! is up to the server.

use serde::{Deserialize, Serialize};

use crate::models::{TestParameter, TestReport};

/// Cached view of the current user's paywall access
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub is_subscribed: bool,
    #[serde(default)]
    pub tier_id: Option<String>,
    /// ISO-8601 as sent by the server, not necessarily zoned
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days_remaining: i64,
}

impl SubscriptionState {
    /// State used for visitors without a session
    pub fn unsubscribed() -> Self {
        Self::default()
    }
}

/// Content that is either shown or replaced by a locked placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Gated<T> {
    Visible(T),
    Locked,
}

impl<T> Gated<T> {
    pub fn is_locked(&self) -> bool {
        matches!(self, Gated::Locked)
    }

    pub fn visible(&self) -> Option<&T> {
        match self {
            Gated::Visible(value) => Some(value),
            Gated::Locked => None,
        }
    }
}

/// How a report's purity score is rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreView {
    /// Placeholder with a call-to-action to the pricing flow
    Locked,
    Score(f64),
    /// Subscriber view of a report that has no score yet
    Unscored,
}

/// A report as a given viewer is allowed to see it
#[derive(Debug, Clone, PartialEq)]
pub struct GatedReport {
    pub id: String,
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub test_date: String,
    pub score: ScoreView,
    pub parameters: Gated<Vec<TestParameter>>,
    pub summary: Gated<String>,
}

impl GatedReport {
    pub fn is_locked(&self) -> bool {
        matches!(self.score, ScoreView::Locked)
    }
}

pub fn gate_score(score: Option<f64>, subscription: &SubscriptionState) -> ScoreView {
    if !subscription.is_subscribed {
        return ScoreView::Locked;
    }
    match score {
        Some(score) => ScoreView::Score(score),
        None => ScoreView::Unscored,
    }
}

pub fn gate_report(report: &TestReport, subscription: &SubscriptionState) -> GatedReport {
    let unlocked = subscription.is_subscribed;
    GatedReport {
        id: report.id.clone(),
        product_name: report.product_name.clone(),
        brand: report.brand.clone(),
        category: report.category.clone(),
        test_date: report.test_date.clone(),
        score: gate_score(report.purity_score, subscription),
        parameters: if unlocked {
            Gated::Visible(report.parameters.clone())
        } else {
            Gated::Locked
        },
        summary: if unlocked {
            Gated::Visible(report.summary.clone())
        } else {
            Gated::Locked
        },
    }
}

pub fn gate_reports(reports: &[TestReport], subscription: &SubscriptionState) -> Vec<GatedReport> {
    reports
        .iter()
        .map(|report| gate_report(report, subscription))
        .collect()
}
