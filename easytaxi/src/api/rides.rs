//! Ride lifecycle endpoints.
//!
//! Every transition answers with the full updated ride, or an error body
//! `{"error": "...", "code": "..."}`.
//!
//! # Example
//!
//! ```bash
//! curl -X POST http://localhost:3000/api/rides \
//!   -H "Content-Type: application/json" \
//!   -d '{"customerId": 1, "station": "Central", "pickup": "Gate 2", "dropoff": "Harbor Road 5", "passengers": 2}'
//!
//! curl -X POST http://localhost:3000/api/rides/1/accept \
//!   -H "Content-Type: application/json" \
//!   -d '{"driverId": "3"}'
//! ```

use crate::api::ids::{self, LooseInt};
use crate::ledger::NewRide;
use crate::server::state::AppState;
use crate::types::{CustomerId, DriverId, Ride, RideId, RideStatus, Role};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use dispatch_web::{AppError, CorrelationId};
use serde::Deserialize;

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /api/rides`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    /// Requesting customer
    pub customer_id: Option<LooseInt>,
    /// Metro station
    pub station: Option<String>,
    /// Pickup location
    pub pickup: Option<String>,
    /// Drop-off location
    pub dropoff: Option<String>,
    /// Passenger count
    pub passengers: Option<LooseInt>,
}

/// Body of `accept` and `start`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRequest {
    /// Driver acting on the ride
    pub driver_id: Option<LooseInt>,
}

/// Body of `end`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRideRequest {
    /// Driver ending the ride (not needed for admins)
    pub driver_id: Option<LooseInt>,
    /// `driver` or `admin`
    pub role: Option<String>,
}

/// Body of `cancel`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRideRequest {
    /// `customer`, `driver` or `admin`
    pub role: Option<String>,
    /// Customer or driver id, matching the role
    pub user_id: Option<LooseInt>,
}

/// Query of `GET /api/rides`
#[derive(Debug, Default, Deserialize)]
pub struct ListRidesQuery {
    /// Only rides with this status; empty means all
    pub status: Option<String>,
}

impl From<CreateRideRequest> for NewRide {
    fn from(request: CreateRideRequest) -> Self {
        Self {
            customer_id: ids::id(request.customer_id.as_ref()).map(CustomerId::new),
            station: request.station.unwrap_or_default(),
            pickup: request.pickup.unwrap_or_default(),
            dropoff: request.dropoff.unwrap_or_default(),
            passengers: request.passengers.as_ref().and_then(LooseInt::as_i64),
        }
    }
}

/// Unknown or missing roles become `None`; the ledger refuses them after it
/// has checked the ride exists and is in the right state.
fn claimed_role(role: Option<&str>) -> Option<Role> {
    role.and_then(|role| role.parse().ok())
}

fn driver_id(value: Option<&LooseInt>) -> Option<DriverId> {
    ids::id(value).map(DriverId::new)
}

// ============================================================================
// Handlers
// ============================================================================

/// Request a ride.
///
/// `POST /api/rides`
///
/// # Errors
///
/// 400 for missing fields, bad passenger counts, unknown customers or a
/// customer who already has an active ride.
pub async fn create_ride(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    payload: Result<Json<CreateRideRequest>, JsonRejection>,
) -> Result<Json<Ride>, AppError> {
    let Json(request) = payload?;
    tracing::debug!(correlation_id = %correlation_id.0, "Create ride request");

    let ride = state.ledger.create(request.into()).await?;
    Ok(Json(ride))
}

/// List rides in creation order.
///
/// `GET /api/rides?status=pending`
///
/// A status no ride can have matches nothing and yields `[]`.
///
/// # Errors
///
/// 400 for a malformed query string.
pub async fn list_rides(
    State(state): State<AppState>,
    query: Result<Query<ListRidesQuery>, QueryRejection>,
) -> Result<Json<Vec<Ride>>, AppError> {
    let Query(query) = query?;
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(status) => match status.parse::<RideStatus>() {
            Ok(status) => Some(status),
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    Ok(Json(state.ledger.list(status).await))
}

/// A driver accepts a pending ride.
///
/// `POST /api/rides/:id/accept` with `{"driverId": 3}`
///
/// # Errors
///
/// 404 unknown ride, 400 not pending or unknown driver.
pub async fn accept_ride(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DriverRequest>, JsonRejection>,
) -> Result<Json<Ride>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let ride = state
        .ledger
        .accept(RideId::new(id), driver_id(request.driver_id.as_ref()))
        .await?;
    Ok(Json(ride))
}

/// The assigned driver starts the ride.
///
/// `POST /api/rides/:id/start` with `{"driverId": 3}`
///
/// # Errors
///
/// 404 unknown ride, 400 not accepted or driver busy, 403 wrong driver.
pub async fn start_ride(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DriverRequest>, JsonRejection>,
) -> Result<Json<Ride>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let ride = state
        .ledger
        .start(RideId::new(id), driver_id(request.driver_id.as_ref()))
        .await?;
    Ok(Json(ride))
}

/// The assigned driver or an admin ends the ride.
///
/// `POST /api/rides/:id/end` with `{"driverId": 3, "role": "driver"}`
///
/// # Errors
///
/// 404 unknown ride, 400 not ongoing, 403 anyone else.
pub async fn end_ride(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<EndRideRequest>, JsonRejection>,
) -> Result<Json<Ride>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let ride = state
        .ledger
        .end(
            RideId::new(id),
            driver_id(request.driver_id.as_ref()),
            claimed_role(request.role.as_deref()),
        )
        .await?;
    Ok(Json(ride))
}

/// Cancel a ride.
///
/// `POST /api/rides/:id/cancel` with `{"role": "customer", "userId": 1}`
///
/// # Errors
///
/// 404 unknown ride, 400 terminal ride or driver cancelling a pending ride,
/// 403 wrong user or unknown role.
pub async fn cancel_ride(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CancelRideRequest>, JsonRejection>,
) -> Result<Json<Ride>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let ride = state
        .ledger
        .cancel(
            RideId::new(id),
            claimed_role(request.role.as_deref()),
            ids::id(request.user_id.as_ref()),
        )
        .await?;
    Ok(Json(ride))
}
