//! Domain types for ride dispatch.
//!
//! A ride moves through a fixed lifecycle:
//!
//! ```text
//! pending ──accept──▶ accepted ──start──▶ ongoing ──end──▶ completed
//!    │                   │                   │
//!    └──────cancel───────┴───────cancel──────┴──▶ cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal.

use crate::error::RideError;
use crate::roster::{Customer, Driver};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw integer identifier
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw integer identifier
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Unique, sequentially assigned ride identifier (first ride is 1)
    RideId
);

integer_id!(
    /// Roster identifier of a customer
    CustomerId
);

integer_id!(
    /// Roster identifier of a driver
    DriverId
);

impl RideId {
    /// The identifier handed to the first ride of a ledger
    pub const FIRST: Self = Self(1);

    /// The identifier that follows this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Lifecycle status of a ride
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    /// Requested by a customer, waiting for a driver
    Pending,
    /// A driver has taken the ride
    Accepted,
    /// The driver picked the customer up
    Ongoing,
    /// Finished normally (terminal)
    Completed,
    /// Cancelled by a customer, driver or admin (terminal)
    Cancelled,
}

impl RideStatus {
    /// Statuses that count against the one-active-ride-per-customer rule
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted | Self::Ongoing)
    }

    /// `completed` and `cancelled` never change again
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the lifecycle graph has an edge from `self` to `next`
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Accepted, Self::Ongoing)
                | (Self::Ongoing, Self::Completed)
                | (Self::Pending | Self::Accepted | Self::Ongoing, Self::Cancelled)
        )
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = RideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(RideError::Validation(format!("Unknown ride status '{other}'"))),
        }
    }
}

/// Role a caller claims when ending or cancelling a ride
///
/// Roles are asserted by the caller, not verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The customer who requested the ride
    Customer,
    /// The driver assigned to the ride
    Driver,
    /// Dispatch staff
    Admin,
}

impl Role {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Driver => "driver",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "driver" => Ok(Self::Driver),
            "admin" => Ok(Self::Admin),
            _ => Err(RideError::Authorization(
                "Invalid role or permission".to_string(),
            )),
        }
    }
}

/// Driver bound to a ride at acceptance time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedDriver {
    /// Roster id of the driver
    pub id: DriverId,
    /// Display name snapshot taken when the ride was accepted
    pub name: String,
}

impl From<Driver> for AssignedDriver {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            name: driver.name,
        }
    }
}

/// A ride record
///
/// The driver id and name live in one `Option`, so a ride can never carry one
/// without the other. On the wire they are flattened to nullable `driverId`
/// and `driverName` fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RideRecord", try_from = "RideRecord")]
pub struct Ride {
    /// Unique identifier
    pub id: RideId,
    /// Customer who requested the ride
    pub customer_id: CustomerId,
    /// Customer display name snapshot taken at request time
    pub customer_name: String,
    /// Metro station the ride is attached to
    pub station: String,
    /// Pickup location
    pub pickup: String,
    /// Drop-off location
    pub dropoff: String,
    /// Number of passengers (always positive)
    pub passengers: u64,
    /// Current lifecycle status
    pub status: RideStatus,
    /// Driver assigned at acceptance
    pub driver: Option<AssignedDriver>,
    /// When the ride was requested
    pub requested_at: DateTime<Utc>,
    /// When the ride last changed status
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    /// Creates a pending ride for a roster customer
    #[must_use]
    pub fn pending(
        id: RideId,
        customer: Customer,
        station: String,
        pickup: String,
        dropoff: String,
        passengers: u64,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id: customer.id,
            customer_name: customer.name,
            station,
            pickup,
            dropoff,
            passengers,
            status: RideStatus::Pending,
            driver: None,
            requested_at,
            updated_at: requested_at,
        }
    }

    /// Id of the assigned driver, if any
    #[must_use]
    pub fn driver_id(&self) -> Option<DriverId> {
        self.driver.as_ref().map(|driver| driver.id)
    }

    /// Name snapshot of the assigned driver, if any
    #[must_use]
    pub fn driver_name(&self) -> Option<&str> {
        self.driver.as_ref().map(|driver| driver.name.as_str())
    }

    /// Whether `driver_id` is the driver assigned to this ride
    #[must_use]
    pub fn is_assigned_to(&self, driver_id: Option<DriverId>) -> bool {
        driver_id.is_some() && self.driver_id() == driver_id
    }
}

/// Wire shape of a [`Ride`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RideRecord {
    id: RideId,
    customer_id: CustomerId,
    customer_name: String,
    station: String,
    pickup: String,
    dropoff: String,
    passengers: u64,
    status: RideStatus,
    driver_id: Option<DriverId>,
    driver_name: Option<String>,
    requested_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Ride> for RideRecord {
    fn from(ride: Ride) -> Self {
        let (driver_id, driver_name) = match ride.driver {
            Some(driver) => (Some(driver.id), Some(driver.name)),
            None => (None, None),
        };
        Self {
            id: ride.id,
            customer_id: ride.customer_id,
            customer_name: ride.customer_name,
            station: ride.station,
            pickup: ride.pickup,
            dropoff: ride.dropoff,
            passengers: ride.passengers,
            status: ride.status,
            driver_id,
            driver_name,
            requested_at: ride.requested_at,
            updated_at: ride.updated_at,
        }
    }
}

impl TryFrom<RideRecord> for Ride {
    type Error = String;

    fn try_from(record: RideRecord) -> Result<Self, Self::Error> {
        let driver = match (record.driver_id, record.driver_name) {
            (Some(id), Some(name)) => Some(AssignedDriver { id, name }),
            (None, None) => None,
            _ => return Err("driverId and driverName must both be set or both be null".to_string()),
        };
        Ok(Self {
            id: record.id,
            customer_id: record.customer_id,
            customer_name: record.customer_name,
            station: record.station,
            pickup: record.pickup,
            dropoff: record.dropoff,
            passengers: record.passengers,
            status: record.status,
            driver,
            requested_at: record.requested_at,
            updated_at: record.updated_at,
        })
    }
}

/// State of the ride ledger
///
/// Rides are kept in creation order and never removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RideState {
    /// All rides, oldest first
    pub rides: Vec<Ride>,
    /// Identifier the next requested ride will receive
    pub next_id: RideId,
    /// Error of the last rejected command (cleared by the next accepted one)
    pub last_error: Option<RideError>,
}

impl Default for RideState {
    fn default() -> Self {
        Self::new()
    }
}

impl RideState {
    /// Creates an empty ledger state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rides: Vec::new(),
            next_id: RideId::FIRST,
            last_error: None,
        }
    }

    /// Returns the number of rides ever requested
    #[must_use]
    pub fn count(&self) -> usize {
        self.rides.len()
    }

    /// Returns a ride by ID
    #[must_use]
    pub fn get(&self, id: RideId) -> Option<&Ride> {
        self.rides.iter().find(|ride| ride.id == id)
    }

    /// Returns a mutable ride by ID
    pub fn get_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.rides.iter_mut().find(|ride| ride.id == id)
    }

    /// Rides in creation order, optionally restricted to one status
    #[must_use]
    pub fn list(&self, status: Option<RideStatus>) -> Vec<Ride> {
        self.rides
            .iter()
            .filter(|ride| status.is_none_or(|status| ride.status == status))
            .cloned()
            .collect()
    }

    /// The customer's pending, accepted or ongoing ride, if any
    #[must_use]
    pub fn active_ride_for_customer(&self, customer_id: CustomerId) -> Option<&Ride> {
        self.rides
            .iter()
            .find(|ride| ride.customer_id == customer_id && ride.status.is_active())
    }

    /// The driver's ongoing ride, if any
    #[must_use]
    pub fn ongoing_ride_for_driver(&self, driver_id: DriverId) -> Option<&Ride> {
        self.rides.iter().find(|ride| {
            ride.status == RideStatus::Ongoing && ride.driver_id() == Some(driver_id)
        })
    }
}

/// Actions representing commands and events for rides
///
/// Commands carry caller input normalized to integers but not yet checked;
/// the reducer validates them and answers with exactly one event, either a
/// lifecycle event or [`RideAction::CommandRejected`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RideAction {
    // ========== Commands ==========
    /// Command: a customer requests a ride
    RequestRide {
        /// Requesting customer (missing if the caller sent none)
        customer_id: Option<CustomerId>,
        /// Metro station
        station: String,
        /// Pickup location
        pickup: String,
        /// Drop-off location
        dropoff: String,
        /// Passenger count as sent by the caller
        passengers: Option<i64>,
    },

    /// Command: a driver takes a pending ride
    AcceptRide {
        /// Ride to accept
        ride_id: RideId,
        /// Accepting driver
        driver_id: Option<DriverId>,
    },

    /// Command: the assigned driver starts the ride
    StartRide {
        /// Ride to start
        ride_id: RideId,
        /// Driver claiming the ride
        driver_id: Option<DriverId>,
    },

    /// Command: the assigned driver or an admin ends the ride
    EndRide {
        /// Ride to end
        ride_id: RideId,
        /// Driver claiming the ride (unused for admins)
        driver_id: Option<DriverId>,
        /// Claimed role; `None` when the caller sent an unknown role
        role: Option<Role>,
    },

    /// Command: cancel a ride
    CancelRide {
        /// Ride to cancel
        ride_id: RideId,
        /// Claimed role; `None` when the caller sent an unknown role
        role: Option<Role>,
        /// Customer or driver id, depending on the role
        user_id: Option<u64>,
    },

    // ========== Events ==========
    /// Event: a ride was requested
    RideRequested {
        /// The new ride, status `pending`
        ride: Ride,
    },

    /// Event: a driver accepted the ride
    RideAccepted {
        /// Accepted ride
        ride_id: RideId,
        /// Driver snapshot
        driver: AssignedDriver,
        /// When accepted
        accepted_at: DateTime<Utc>,
    },

    /// Event: the ride started
    RideStarted {
        /// Started ride
        ride_id: RideId,
        /// When started
        started_at: DateTime<Utc>,
    },

    /// Event: the ride completed
    RideCompleted {
        /// Completed ride
        ride_id: RideId,
        /// Who ended it
        completed_by: Role,
        /// When completed
        completed_at: DateTime<Utc>,
    },

    /// Event: the ride was cancelled
    RideCancelled {
        /// Cancelled ride
        ride_id: RideId,
        /// Who cancelled it
        cancelled_by: Role,
        /// When cancelled
        cancelled_at: DateTime<Utc>,
    },

    /// Event: a command was rejected and nothing changed
    CommandRejected {
        /// Ride the command targeted, if it named one
        ride_id: Option<RideId>,
        /// Why it was rejected
        error: RideError,
    },
}

impl RideAction {
    /// Returns true for caller intents
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::RequestRide { .. }
                | Self::AcceptRide { .. }
                | Self::StartRide { .. }
                | Self::EndRide { .. }
                | Self::CancelRide { .. }
        )
    }

    /// Returns true for facts produced by the reducer
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Ride this action refers to
    #[must_use]
    pub const fn ride_id(&self) -> Option<RideId> {
        match self {
            Self::RequestRide { .. } => None,
            Self::RideRequested { ride } => Some(ride.id),
            Self::CommandRejected { ride_id, .. } => *ride_id,
            Self::AcceptRide { ride_id, .. }
            | Self::StartRide { ride_id, .. }
            | Self::EndRide { ride_id, .. }
            | Self::CancelRide { ride_id, .. }
            | Self::RideAccepted { ride_id, .. }
            | Self::RideStarted { ride_id, .. }
            | Self::RideCompleted { ride_id, .. }
            | Self::RideCancelled { ride_id, .. } => Some(*ride_id),
        }
    }
}
