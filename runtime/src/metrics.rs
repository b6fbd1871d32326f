//! Prometheus metrics for the store runtime.
//!
//! # Exported Metrics
//!
//! - `store_actions_processed_total` - Actions run through a reducer
//! - `store_events_emitted_total` - Events emitted by reducers
//! - `store_reduce_duration_seconds` - Time spent inside reducers (lock held)
//!
//! # Example
//!
//! ```rust,no_run
//! use dispatch_runtime::metrics::install_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_recorder()?;
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the global Prometheus recorder and register metric descriptions.
///
/// The returned handle renders the scrape payload; the caller decides where
/// to serve it.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built or a recorder is
/// already installed for this process.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
            ],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!("Prometheus recorder installed");

    Ok(handle)
}

/// Register all runtime metric descriptions.
fn register_metrics() {
    describe_counter!(
        "store_actions_processed_total",
        "Total number of actions processed by store reducers"
    );
    describe_counter!(
        "store_events_emitted_total",
        "Total number of events emitted by store reducers"
    );
    describe_histogram!(
        "store_reduce_duration_seconds",
        "Time spent running a reducer while holding the store lock"
    );
}

/// Record one reducer invocation.
pub(crate) fn record_reduce(elapsed: Duration, emitted: usize) {
    metrics::counter!("store_actions_processed_total").increment(1);
    metrics::counter!("store_events_emitted_total").increment(emitted as u64);
    metrics::histogram!("store_reduce_duration_seconds").record(elapsed.as_secs_f64());
}
