//! Reducer logic for the ride ledger.
//!
//! Each command is validated against the current state, then answered with
//! exactly one event: the lifecycle event it produced, or `CommandRejected`.
//! The event is applied before `reduce` returns, so a rejected command never
//! leaves a partial mutation behind.

use crate::error::RideError;
use crate::roster::Roster;
use crate::types::{
    AssignedDriver, CustomerId, DriverId, Ride, RideAction, RideId, RideState, RideStatus, Role,
};
use chrono::{DateTime, Utc};
use dispatch_core::{
    environment::Clock,
    reducer::{Emitted, Reducer},
    smallvec,
};
use std::sync::Arc;

const MISSING_FIELDS: &str = "Missing required fields";

/// Environment dependencies for the ride reducer
#[derive(Clone)]
pub struct RideEnvironment {
    /// Clock for ride timestamps
    pub clock: Arc<dyn Clock>,
    /// Customer and driver lookup
    pub roster: Arc<dyn Roster>,
}

impl RideEnvironment {
    /// Creates a new `RideEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, roster: Arc<dyn Roster>) -> Self {
        Self { clock, roster }
    }
}

/// Reducer for the ride ledger
#[derive(Clone, Debug, Default)]
pub struct RideReducer;

impl RideReducer {
    /// Creates a new `RideReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `RequestRide` command
    fn validate_request(
        state: &RideState,
        env: &RideEnvironment,
        customer_id: Option<CustomerId>,
        station: String,
        pickup: String,
        dropoff: String,
        passengers: Option<i64>,
    ) -> Result<RideAction, RideError> {
        let (Some(customer_id), Some(passengers)) = (customer_id, passengers) else {
            return Err(RideError::Validation(MISSING_FIELDS.to_string()));
        };

        if [&station, &pickup, &dropoff]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(RideError::Validation(MISSING_FIELDS.to_string()));
        }

        let passengers = u64::try_from(passengers)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                RideError::Validation("Passengers must be a positive integer".to_string())
            })?;

        let customer = env
            .roster
            .customer(customer_id)
            .ok_or_else(|| RideError::Validation("Invalid customer".to_string()))?;

        if let Some(active) = state.active_ride_for_customer(customer_id) {
            return Err(RideError::Conflict(format!(
                "Customer already has an active ride ({})",
                active.id
            )));
        }

        Ok(RideAction::RideRequested {
            ride: Ride::pending(
                state.next_id,
                customer,
                station,
                pickup,
                dropoff,
                passengers,
                env.clock.now(),
            ),
        })
    }

    /// Validates an `AcceptRide` command
    fn validate_accept(
        state: &RideState,
        env: &RideEnvironment,
        ride_id: RideId,
        driver_id: Option<DriverId>,
    ) -> Result<RideAction, RideError> {
        let ride = state.get(ride_id).ok_or(RideError::NotFound(ride_id))?;

        if ride.status != RideStatus::Pending {
            return Err(RideError::State("Ride is not pending".to_string()));
        }

        let driver = driver_id
            .and_then(|id| env.roster.driver(id))
            .ok_or_else(|| RideError::Validation("Invalid driver".to_string()))?;

        Ok(RideAction::RideAccepted {
            ride_id,
            driver: AssignedDriver::from(driver),
            accepted_at: env.clock.now(),
        })
    }

    /// Validates a `StartRide` command
    fn validate_start(
        state: &RideState,
        env: &RideEnvironment,
        ride_id: RideId,
        driver_id: Option<DriverId>,
    ) -> Result<RideAction, RideError> {
        let ride = state.get(ride_id).ok_or(RideError::NotFound(ride_id))?;

        if ride.status != RideStatus::Accepted {
            return Err(RideError::State("Ride is not accepted".to_string()));
        }

        let Some(driver_id) = driver_id.filter(|id| ride.driver_id() == Some(*id)) else {
            return Err(RideError::Authorization(
                "Only assigned driver can start the ride".to_string(),
            ));
        };

        if let Some(ongoing) = state.ongoing_ride_for_driver(driver_id) {
            return Err(RideError::Conflict(format!(
                "Driver already has an ongoing ride ({})",
                ongoing.id
            )));
        }

        Ok(RideAction::RideStarted {
            ride_id,
            started_at: env.clock.now(),
        })
    }

    /// Validates an `EndRide` command
    fn validate_end(
        state: &RideState,
        env: &RideEnvironment,
        ride_id: RideId,
        driver_id: Option<DriverId>,
        role: Option<Role>,
    ) -> Result<RideAction, RideError> {
        let ride = state.get(ride_id).ok_or(RideError::NotFound(ride_id))?;

        if ride.status != RideStatus::Ongoing {
            return Err(RideError::State("Ride is not ongoing".to_string()));
        }

        let completed_by = match role {
            Some(Role::Admin) => Role::Admin,
            Some(Role::Driver) if ride.is_assigned_to(driver_id) => Role::Driver,
            _ => {
                return Err(RideError::Authorization(
                    "Only assigned driver can end the ride".to_string(),
                ))
            }
        };

        Ok(RideAction::RideCompleted {
            ride_id,
            completed_by,
            completed_at: env.clock.now(),
        })
    }

    /// Validates a `CancelRide` command
    ///
    /// Terminal rides are refused for every role, before the role is looked at.
    fn validate_cancel(
        state: &RideState,
        env: &RideEnvironment,
        ride_id: RideId,
        role: Option<Role>,
        user_id: Option<u64>,
    ) -> Result<RideAction, RideError> {
        let ride = state.get(ride_id).ok_or(RideError::NotFound(ride_id))?;

        match ride.status {
            RideStatus::Completed => {
                return Err(RideError::State("Cannot cancel a completed ride".to_string()));
            }
            RideStatus::Cancelled => {
                return Err(RideError::State("Ride is already cancelled".to_string()));
            }
            RideStatus::Pending | RideStatus::Accepted | RideStatus::Ongoing => {}
        }

        let cancelled_by = match role {
            Some(Role::Admin) => Role::Admin,
            Some(Role::Customer) => {
                if user_id != Some(ride.customer_id.value()) {
                    return Err(RideError::Authorization(
                        "Only requesting customer can cancel".to_string(),
                    ));
                }
                Role::Customer
            }
            Some(Role::Driver) => {
                if !ride.is_assigned_to(user_id.map(DriverId::new)) {
                    return Err(RideError::Authorization(
                        "Only assigned driver can cancel".to_string(),
                    ));
                }
                if !matches!(ride.status, RideStatus::Accepted | RideStatus::Ongoing) {
                    return Err(RideError::State(
                        "Driver can only cancel accepted or ongoing ride".to_string(),
                    ));
                }
                Role::Driver
            }
            None => {
                return Err(RideError::Authorization(
                    "Invalid role or permission".to_string(),
                ))
            }
        };

        Ok(RideAction::RideCancelled {
            ride_id,
            cancelled_by,
            cancelled_at: env.clock.now(),
        })
    }

    /// Applies an event to state
    fn apply_event(state: &mut RideState, action: &RideAction) {
        match action {
            RideAction::RideRequested { ride } => {
                if ride.id >= state.next_id {
                    state.next_id = ride.id.next();
                }
                state.rides.push(ride.clone());
                state.last_error = None;
            }
            RideAction::RideAccepted {
                ride_id,
                driver,
                accepted_at,
            } => {
                if let Some(ride) = state.get_mut(*ride_id) {
                    ride.status = RideStatus::Accepted;
                    ride.driver = Some(driver.clone());
                    ride.updated_at = *accepted_at;
                }
                state.last_error = None;
            }
            RideAction::RideStarted {
                ride_id,
                started_at,
            } => {
                Self::transition(state, *ride_id, RideStatus::Ongoing, *started_at);
            }
            RideAction::RideCompleted {
                ride_id,
                completed_at,
                ..
            } => {
                Self::transition(state, *ride_id, RideStatus::Completed, *completed_at);
            }
            RideAction::RideCancelled {
                ride_id,
                cancelled_at,
                ..
            } => {
                Self::transition(state, *ride_id, RideStatus::Cancelled, *cancelled_at);
            }
            RideAction::CommandRejected { error, .. } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            RideAction::RequestRide { .. }
            | RideAction::AcceptRide { .. }
            | RideAction::StartRide { .. }
            | RideAction::EndRide { .. }
            | RideAction::CancelRide { .. } => {}
        }
    }

    fn transition(
        state: &mut RideState,
        ride_id: RideId,
        status: RideStatus,
        at: DateTime<Utc>,
    ) {
        if let Some(ride) = state.get_mut(ride_id) {
            ride.status = status;
            ride.updated_at = at;
        }
        state.last_error = None;
    }

    /// Applies the outcome of a validated command and returns it as the single
    /// emitted event
    fn settle(
        state: &mut RideState,
        ride_id: Option<RideId>,
        outcome: Result<RideAction, RideError>,
    ) -> Emitted<RideAction> {
        let event = outcome.unwrap_or_else(|error| RideAction::CommandRejected { ride_id, error });
        Self::apply_event(state, &event);
        smallvec![event]
    }
}

impl Reducer for RideReducer {
    type State = RideState;
    type Action = RideAction;
    type Environment = RideEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Emitted<Self::Action> {
        match action {
            // ========== Commands ==========
            RideAction::RequestRide {
                customer_id,
                station,
                pickup,
                dropoff,
                passengers,
            } => {
                let outcome = Self::validate_request(
                    state,
                    env,
                    customer_id,
                    station,
                    pickup,
                    dropoff,
                    passengers,
                );
                Self::settle(state, None, outcome)
            }

            RideAction::AcceptRide { ride_id, driver_id } => {
                let outcome = Self::validate_accept(state, env, ride_id, driver_id);
                Self::settle(state, Some(ride_id), outcome)
            }

            RideAction::StartRide { ride_id, driver_id } => {
                let outcome = Self::validate_start(state, env, ride_id, driver_id);
                Self::settle(state, Some(ride_id), outcome)
            }

            RideAction::EndRide {
                ride_id,
                driver_id,
                role,
            } => {
                let outcome = Self::validate_end(state, env, ride_id, driver_id, role);
                Self::settle(state, Some(ride_id), outcome)
            }

            RideAction::CancelRide {
                ride_id,
                role,
                user_id,
            } => {
                let outcome = Self::validate_cancel(state, env, ride_id, role, user_id);
                Self::settle(state, Some(ride_id), outcome)
            }

            // ========== Events ==========
            RideAction::RideRequested { .. }
            | RideAction::RideAccepted { .. }
            | RideAction::RideStarted { .. }
            | RideAction::RideCompleted { .. }
            | RideAction::RideCancelled { .. }
            | RideAction::CommandRejected { .. } => {
                // Replayed events only rebuild state
                Self::apply_event(state, &action);
                Emitted::new()
            }
        }
    }
}
