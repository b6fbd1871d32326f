//! HTTP API for the ride ledger.
//!
//! - `GET  /api/customers`, `GET /api/drivers` - roster listings
//! - `POST /api/rides` - request a ride
//! - `GET  /api/rides?status=` - list rides
//! - `POST /api/rides/:id/{accept,start,end,cancel}` - lifecycle transitions

pub mod ids;
pub mod rides;
pub mod roster;

use crate::error::RideError;
use axum::http::StatusCode;
use dispatch_web::AppError;

impl From<RideError> for AppError {
    fn from(error: RideError) -> Self {
        let status = match &error {
            RideError::Validation(_) | RideError::State(_) | RideError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            RideError::NotFound(_) => StatusCode::NOT_FOUND,
            RideError::Authorization(_) => StatusCode::FORBIDDEN,
        };
        Self::new(status, error.to_string(), error.code())
    }
}
