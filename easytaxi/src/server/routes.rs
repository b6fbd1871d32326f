//! Router configuration for the dispatch server.

use super::state::AppState;
use crate::api::{rides, roster};
use crate::reducer::{RideEnvironment, RideReducer};
use crate::types::{RideAction, RideState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use dispatch_web::{
    correlation_id_layer,
    handlers::{health_check, health_check_with_store},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const WELCOME: &str = "<h2>Welcome to EasyTaxi Backend API</h2>\
<p>Use /api/customers, /api/drivers, /api/rides endpoints.</p>";

/// Build the complete Axum router.
///
/// - `GET /` welcome page
/// - `GET /health`, `GET /health/ready`
/// - `GET /metrics` (404 when metrics are disabled)
/// - everything in [`crate::api`] under `/api`
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/customers", get(roster::list_customers))
        .route("/drivers", get(roster::list_drivers))
        .route("/rides", post(rides::create_ride).get(rides::list_rides))
        .route("/rides/:id/accept", post(rides::accept_ride))
        .route("/rides/:id/start", post(rides::start_ride))
        .route("/rides/:id/end", post(rides::end_ride))
        .route("/rides/:id/cancel", post(rides::cancel_ride));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route(
            "/health/ready",
            get(health_check_with_store::<RideState, RideAction, RideEnvironment, RideReducer>),
        )
        .route("/metrics", get(render_metrics))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .layer(cors)
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn welcome() -> Html<&'static str> {
    Html(WELCOME)
}

#[allow(clippy::unused_async)]
async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
