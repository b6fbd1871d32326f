//! The ride ledger: the async command surface over the ride store.
//!
//! Every operation sends one command through the [`Store`] and reads its
//! outcome while the write lock is still held, so concurrent callers see
//! commands take effect one at a time. A customer racing two requests gets
//! exactly one ride; two drivers racing for the same ride get exactly one
//! acceptance.

use crate::error::RideError;
use crate::metrics;
use crate::reducer::{RideEnvironment, RideReducer};
use crate::types::{CustomerId, DriverId, Ride, RideAction, RideId, RideState, RideStatus, Role};
use dispatch_runtime::Store;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Store type backing the ledger
pub type RideStore = Store<RideState, RideAction, RideEnvironment, RideReducer>;

/// Input of [`RideLedger::create`]
///
/// Fields are normalized but unchecked; the ledger decides what is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRide {
    /// Requesting customer
    pub customer_id: Option<CustomerId>,
    /// Metro station
    pub station: String,
    /// Pickup location
    pub pickup: String,
    /// Drop-off location
    pub dropoff: String,
    /// Passenger count
    pub passengers: Option<i64>,
}

/// Authoritative store of rides and their lifecycle
#[derive(Clone)]
pub struct RideLedger {
    store: Arc<RideStore>,
}

impl RideLedger {
    /// Creates an empty ledger
    #[must_use]
    pub fn new(environment: RideEnvironment) -> Self {
        Self::with_state(RideState::new(), environment)
    }

    /// Creates a ledger over existing state
    #[must_use]
    pub fn with_state(state: RideState, environment: RideEnvironment) -> Self {
        Self {
            store: Arc::new(Store::new(state, RideReducer::new(), environment)),
        }
    }

    /// The underlying store, for health checks
    #[must_use]
    pub fn store(&self) -> Arc<RideStore> {
        Arc::clone(&self.store)
    }

    /// Requests a ride for a roster customer
    ///
    /// # Errors
    ///
    /// - [`RideError::Validation`] on missing fields, non-positive passengers
    ///   or an unknown customer
    /// - [`RideError::Conflict`] if the customer already has an active ride
    #[instrument(skip(self, request), fields(customer_id = ?request.customer_id))]
    pub async fn create(&self, request: NewRide) -> Result<Ride, RideError> {
        self.execute(RideAction::RequestRide {
            customer_id: request.customer_id,
            station: request.station,
            pickup: request.pickup,
            dropoff: request.dropoff,
            passengers: request.passengers,
        })
        .await
    }

    /// Rides in creation order, optionally filtered by status
    pub async fn list(&self, status: Option<RideStatus>) -> Vec<Ride> {
        self.store.state(|state| state.list(status)).await
    }

    /// Looks up a single ride
    pub async fn get(&self, ride_id: RideId) -> Option<Ride> {
        self.store.state(|state| state.get(ride_id).cloned()).await
    }

    /// A driver takes a pending ride
    ///
    /// # Errors
    ///
    /// [`RideError::NotFound`], then [`RideError::State`] if the ride is not
    /// pending, then [`RideError::Validation`] for an unknown driver.
    #[instrument(skip(self))]
    pub async fn accept(
        &self,
        ride_id: RideId,
        driver_id: Option<DriverId>,
    ) -> Result<Ride, RideError> {
        self.execute(RideAction::AcceptRide { ride_id, driver_id })
            .await
    }

    /// The assigned driver starts an accepted ride
    ///
    /// # Errors
    ///
    /// [`RideError::NotFound`], [`RideError::State`] unless accepted,
    /// [`RideError::Authorization`] for any other driver and
    /// [`RideError::Conflict`] if the driver already has an ongoing ride.
    #[instrument(skip(self))]
    pub async fn start(
        &self,
        ride_id: RideId,
        driver_id: Option<DriverId>,
    ) -> Result<Ride, RideError> {
        self.execute(RideAction::StartRide { ride_id, driver_id })
            .await
    }

    /// The assigned driver, or an admin, ends an ongoing ride
    ///
    /// `role` is `None` when the caller claimed a role the ledger does not
    /// know; that is refused like any other unauthorized caller.
    ///
    /// # Errors
    ///
    /// [`RideError::NotFound`], [`RideError::State`] unless ongoing, then
    /// [`RideError::Authorization`].
    #[instrument(skip(self))]
    pub async fn end(
        &self,
        ride_id: RideId,
        driver_id: Option<DriverId>,
        role: Option<Role>,
    ) -> Result<Ride, RideError> {
        self.execute(RideAction::EndRide {
            ride_id,
            driver_id,
            role,
        })
        .await
    }

    /// Cancels a ride on behalf of a customer, driver or admin
    ///
    /// `user_id` is a customer id for customers and a driver id for drivers;
    /// admins need none.
    ///
    /// # Errors
    ///
    /// [`RideError::NotFound`], [`RideError::State`] for terminal rides or a
    /// driver cancelling outside accepted/ongoing, and
    /// [`RideError::Authorization`] for the wrong user or an unknown role.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        ride_id: RideId,
        role: Option<Role>,
        user_id: Option<u64>,
    ) -> Result<Ride, RideError> {
        self.execute(RideAction::CancelRide {
            ride_id,
            role,
            user_id,
        })
        .await
    }

    async fn execute(&self, command: RideAction) -> Result<Ride, RideError> {
        let outcome = self
            .store
            .send_and_inspect(command, |state, events| match events.first() {
                Some(RideAction::CommandRejected { error, .. }) => Err(error.clone()),
                Some(event) => {
                    let ride = event.ride_id().and_then(|id| state.get(id)).cloned();
                    if let Some(ride) = &ride {
                        metrics::record_event(event, ride);
                    }
                    ride.ok_or_else(|| {
                        RideError::Validation("Event does not reference a ride".to_string())
                    })
                }
                None => Err(RideError::Validation(
                    "Only commands can be sent to the ledger".to_string(),
                )),
            })
            .await;

        match &outcome {
            Ok(ride) => info!(ride_id = %ride.id, status = %ride.status, "Ride updated"),
            Err(error) => {
                metrics::record_rejection(error);
                warn!(kind = error.kind(), %error, "Ride command rejected");
            }
        }

        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::roster::StaticRoster;
    use dispatch_testing::test_clock;

    fn ledger() -> RideLedger {
        RideLedger::new(RideEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(StaticRoster::numbered(10, 10)),
        ))
    }

    fn new_ride(customer: u64) -> NewRide {
        NewRide {
            customer_id: Some(CustomerId::new(customer)),
            station: "A".to_string(),
            pickup: "X".to_string(),
            dropoff: "Y".to_string(),
            passengers: Some(2),
        }
    }

    #[tokio::test]
    async fn test_create_returns_the_stored_ride() {
        let ledger = ledger();

        let ride = ledger.create(new_ride(1)).await.unwrap();

        assert_eq!(ride.id, RideId::FIRST);
        assert_eq!(ledger.get(ride.id).await, Some(ride));
    }

    #[tokio::test]
    async fn test_rejected_command_returns_error_and_keeps_state() {
        let ledger = ledger();
        let ride = ledger.create(new_ride(1)).await.unwrap();

        let error = ledger
            .start(ride.id, Some(DriverId::new(1)))
            .await
            .unwrap_err();

        assert_eq!(error, RideError::State("Ride is not accepted".to_string()));
        assert_eq!(ledger.get(ride.id).await.unwrap().status, RideStatus::Pending);
    }

    #[tokio::test]
    async fn test_concurrent_accepts_have_one_winner() {
        let ledger = ledger();
        let ride_id = ledger.create(new_ride(1)).await.unwrap().id;

        let handles: Vec<_> = (1..=10)
            .map(|driver| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.accept(ride_id, Some(DriverId::new(driver))).await })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(error) => assert!(matches!(error, RideError::State(_))),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(ledger.get(ride_id).await.unwrap().status, RideStatus::Accepted);
    }

    #[tokio::test]
    async fn test_concurrent_requests_by_one_customer_create_one_ride() {
        let ledger = ledger();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.create(new_ride(5)).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(ledger.list(None).await.len(), 1);
    }
}
