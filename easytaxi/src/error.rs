//! Ride dispatch errors.

use crate::types::RideId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a ride command was refused
///
/// Every variant leaves the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideError {
    /// Missing or malformed input, or an unknown roster reference
    #[error("{0}")]
    Validation(String),

    /// No ride with the given id
    #[error("Ride not found")]
    NotFound(RideId),

    /// The ride is not in a status that permits the operation
    #[error("{0}")]
    State(String),

    /// The caller's claimed role or identity does not permit the operation
    #[error("{0}")]
    Authorization(String),

    /// The operation would break a cross-ride rule
    #[error("{0}")]
    Conflict(String),
}

impl RideError {
    /// Stable machine-readable code for the error kind
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::State(_) => "INVALID_STATE",
            Self::Authorization(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
        }
    }

    /// Short lowercase kind, used as a metric label
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::State(_) => "state",
            Self::Authorization(_) => "authorization",
            Self::Conflict(_) => "conflict",
        }
    }
}
