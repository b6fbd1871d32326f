//! Application state for the dispatch HTTP server.

use crate::ledger::{RideLedger, RideStore};
use crate::roster::Roster;
use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// The ride ledger
    pub ledger: RideLedger,

    /// Customer and driver directory (shared with the ledger's environment)
    pub roster: Arc<dyn Roster>,

    /// Prometheus handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        ledger: RideLedger,
        roster: Arc<dyn Roster>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            ledger,
            roster,
            metrics,
        }
    }
}

// Lets the generic readiness handler extract the store
impl FromRef<AppState> for Arc<RideStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger.store()
    }
}
