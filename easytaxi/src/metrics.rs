//! Business metrics for ride dispatch.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `easytaxi_rides_total{status}` - Ride transitions by resulting status
//! - `easytaxi_ride_commands_rejected_total{kind}` - Refused commands by error kind
//!
//! ## Gauges
//! - `easytaxi_active_rides` - Rides currently pending, accepted or ongoing
//!
//! ## Histograms
//! - `easytaxi_ride_duration_seconds` - Time from request to completion
//!
//! Without an installed recorder every call here is a no-op.

use crate::error::RideError;
use crate::types::{Ride, RideAction};
use metrics::{describe_counter, describe_gauge, describe_histogram};

/// Register all business metric descriptions.
///
/// Call once at startup, after the recorder is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "easytaxi_rides_total",
        "Ride transitions by resulting status (pending, accepted, ongoing, completed, cancelled)"
    );
    describe_counter!(
        "easytaxi_ride_commands_rejected_total",
        "Ride commands refused, by error kind"
    );
    describe_gauge!(
        "easytaxi_active_rides",
        "Current number of pending, accepted or ongoing rides"
    );
    describe_histogram!(
        "easytaxi_ride_duration_seconds",
        "Time from ride request to completion"
    );

    tracing::info!("Business metrics registered");
}

/// Record the event a command produced, given the ride after the event.
pub fn record_event(event: &RideAction, ride: &Ride) {
    let status = ride.status.as_str();
    match event {
        RideAction::RideRequested { .. } => {
            metrics::counter!("easytaxi_rides_total", "status" => status).increment(1);
            metrics::gauge!("easytaxi_active_rides").increment(1.0);
        }
        RideAction::RideAccepted { .. } | RideAction::RideStarted { .. } => {
            metrics::counter!("easytaxi_rides_total", "status" => status).increment(1);
        }
        RideAction::RideCompleted { completed_at, .. } => {
            metrics::counter!("easytaxi_rides_total", "status" => status).increment(1);
            metrics::gauge!("easytaxi_active_rides").decrement(1.0);
            #[allow(clippy::cast_precision_loss)]
            let seconds = (*completed_at - ride.requested_at).num_milliseconds() as f64 / 1000.0;
            metrics::histogram!("easytaxi_ride_duration_seconds").record(seconds);
        }
        RideAction::RideCancelled { .. } => {
            metrics::counter!("easytaxi_rides_total", "status" => status).increment(1);
            metrics::gauge!("easytaxi_active_rides").decrement(1.0);
        }
        _ => {}
    }
    tracing::debug!(ride_id = %ride.id, status, "Recorded ride metric");
}

/// Record a refused command.
pub fn record_rejection(error: &RideError) {
    metrics::counter!("easytaxi_ride_commands_rejected_total", "kind" => error.kind()).increment(1);
}
