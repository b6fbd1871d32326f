//! Customer and driver directory.
//!
//! The ledger only needs to resolve an id to a display name, so the roster is a
//! read-only lookup behind a trait. [`StaticRoster`] is the in-memory
//! implementation used by the server and tests.

use crate::types::{CustomerId, DriverId};
use serde::{Deserialize, Serialize};

/// A roster entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person<Id> {
    /// Roster id
    pub id: Id,
    /// Display name
    pub name: String,
}

impl<Id> Person<Id> {
    /// Creates a roster entry
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A customer who can request rides
pub type Customer = Person<CustomerId>;

/// A driver who can accept rides
pub type Driver = Person<DriverId>;

/// Directory of known customers and drivers
pub trait Roster: Send + Sync {
    /// Looks up a customer by id
    fn customer(&self, id: CustomerId) -> Option<Customer>;

    /// Looks up a driver by id
    fn driver(&self, id: DriverId) -> Option<Driver>;

    /// All customers, in roster order
    fn customers(&self) -> Vec<Customer>;

    /// All drivers, in roster order
    fn drivers(&self) -> Vec<Driver>;
}

/// Fixed in-memory roster
#[derive(Clone, Debug, Default)]
pub struct StaticRoster {
    customers: Vec<Customer>,
    drivers: Vec<Driver>,
}

impl StaticRoster {
    /// Creates a roster from explicit entries
    #[must_use]
    pub const fn new(customers: Vec<Customer>, drivers: Vec<Driver>) -> Self {
        Self { customers, drivers }
    }

    /// Seeds `Customer #1..=customers` and `Driver #1..=drivers`
    #[must_use]
    pub fn numbered(customers: u64, drivers: u64) -> Self {
        Self {
            customers: (1..=customers)
                .map(|n| Person::new(CustomerId::new(n), format!("Customer #{n}")))
                .collect(),
            drivers: (1..=drivers)
                .map(|n| Person::new(DriverId::new(n), format!("Driver #{n}")))
                .collect(),
        }
    }
}

impl Roster for StaticRoster {
    fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.customers.iter().find(|c| c.id == id).cloned()
    }

    fn driver(&self, id: DriverId) -> Option<Driver> {
        self.drivers.iter().find(|d| d.id == id).cloned()
    }

    fn customers(&self) -> Vec<Customer> {
        self.customers.clone()
    }

    fn drivers(&self) -> Vec<Driver> {
        self.drivers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_roster_seeds_names() {
        let roster = StaticRoster::numbered(10, 3);

        assert_eq!(roster.customers().len(), 10);
        assert_eq!(roster.drivers().len(), 3);
        assert_eq!(
            roster.customer(CustomerId::new(4)),
            Some(Person::new(CustomerId::new(4), "Customer #4"))
        );
        assert_eq!(
            roster.driver(DriverId::new(3)).map(|d| d.name),
            Some("Driver #3".to_string())
        );
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        let roster = StaticRoster::numbered(2, 2);

        assert!(roster.customer(CustomerId::new(0)).is_none());
        assert!(roster.customer(CustomerId::new(3)).is_none());
        assert!(roster.driver(DriverId::new(99)).is_none());
    }
}
