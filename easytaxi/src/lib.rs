//! EasyTaxi ride dispatch.
//!
//! Customers request rides from a metro station to a drop-off point, drivers
//! accept and drive them, and customers, drivers or dispatch admins may cancel
//! them under role-specific rules.
//!
//! # Architecture
//!
//! ```text
//!   HTTP (axum)            api::rides, api::roster
//!        │
//!        ▼
//!   RideLedger             async create/list/accept/start/end/cancel
//!        │  one command at a time (Store write lock)
//!        ▼
//!   RideReducer            validate command → one event → apply
//!        │
//!        ▼
//!   RideState              rides in creation order
//! ```
//!
//! The reducer owns every lifecycle rule, so the whole state machine is tested
//! without HTTP or async. Each command answers with exactly one event, either
//! the transition it caused or `CommandRejected` carrying a [`RideError`].
//!
//! # Example
//!
//! ```ignore
//! let roster = Arc::new(StaticRoster::numbered(10, 10));
//! let ledger = RideLedger::new(RideEnvironment::new(Arc::new(SystemClock), roster));
//!
//! let ride = ledger.create(NewRide { customer_id: Some(CustomerId::new(1)), .. }).await?;
//! let ride = ledger.accept(ride.id, Some(DriverId::new(3))).await?;
//! assert_eq!(ride.status, RideStatus::Accepted);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod reducer;
pub mod roster;
pub mod server;
pub mod types;

pub use config::Config;
pub use error::RideError;
pub use ledger::{NewRide, RideLedger, RideStore};
pub use reducer::{RideEnvironment, RideReducer};
pub use roster::{Customer, Driver, Person, Roster, StaticRoster};
pub use types::{
    AssignedDriver, CustomerId, DriverId, Ride, RideAction, RideId, RideState, RideStatus, Role,
};
