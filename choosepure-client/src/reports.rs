//! Test report catalog with subscription gating

use std::sync::Arc;

use choosepure_core::gating::{gate_report, gate_reports};
use choosepure_core::models::TestReport;
use choosepure_core::GatedReport;

use crate::api::ReportQuery;
use crate::error::ClientResult;
use crate::state::AppState;
use crate::ui::{Notification, Route};

/// Where a locked score or parameter block sends the user
pub const LOCKED_CALL_TO_ACTION: Route = Route::Pricing;

pub struct ReportCatalog {
    state: Arc<AppState>,
    reports: Vec<TestReport>,
}

impl ReportCatalog {
    /// Refresh the subscription state, then fetch the report list
    pub async fn load(state: Arc<AppState>, query: &ReportQuery) -> ClientResult<Self> {
        state.refresh_subscription().await;

        let reports = match state.api.list_reports(query).await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load reports");
                state.notify(Notification::error("Error", "Failed to load test reports"));
                return Err(e);
            }
        };

        tracing::debug!(count = reports.len(), "Reports loaded");
        Ok(Self { state, reports })
    }

    /// Raw reports as served, before gating
    pub fn reports(&self) -> &[TestReport] {
        &self.reports
    }

    /// Every report as the current viewer may see it
    pub fn gated(&self) -> Vec<GatedReport> {
        gate_reports(&self.reports, &self.state.subscription())
    }

    /// Fetch one report and gate it for the current viewer
    pub async fn detail(&self, id: &str) -> ClientResult<GatedReport> {
        let report = self.state.api.get_report(id).await?;
        Ok(gate_report(&report, &self.state.subscription()))
    }
}
