//! Roster listing endpoints.

use crate::roster::{Customer, Driver};
use crate::server::state::AppState;
use axum::{extract::State, Json};

/// `GET /api/customers`
#[allow(clippy::unused_async)]
pub async fn list_customers(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(state.roster.customers())
}

/// `GET /api/drivers`
#[allow(clippy::unused_async)]
pub async fn list_drivers(State(state): State<AppState>) -> Json<Vec<Driver>> {
    Json(state.roster.drivers())
}
