//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{extract::State, http::StatusCode, Json};
use dispatch_core::reducer::Reducer;
use dispatch_runtime::{HealthCheck, Store};
use std::sync::Arc;

/// Simple health check endpoint (for basic liveness).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Health check with Store diagnostics (for readiness).
///
/// Extract the store from application state with `FromRef`.
///
/// # Status Codes
///
/// - 200 OK: Healthy
/// - 503 Service Unavailable: Unhealthy (the store is shutting down)
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
///
/// # Response
///
/// ```json
/// {
///   "component": "store",
///   "status": "healthy",
///   "message": null,
///   "metadata": [["actions_processed", "12"]]
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Arc<Store<S, A, E, R>>>,
) -> (StatusCode, Json<HealthCheck>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Send + 'static,
    E: Send + Sync + 'static,
{
    let health = store.health();

    let status = if health.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::reducer::Emitted;
    use dispatch_core::SmallVec;
    use dispatch_runtime::HealthStatus;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = ();
        type Action = ();
        type Environment = ();

        fn reduce(&self, _state: &mut (), _action: (), _env: &()) -> Emitted<()> {
            SmallVec::new()
        }
    }

    #[tokio::test]
    async fn test_health_check_with_healthy_store() {
        let store = Arc::new(Store::new((), TestReducer, ()));
        store.send(()).await;

        let (status, Json(health)) = health_check_with_store(State(store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.metadata[0].1, "1");
    }

    #[tokio::test]
    async fn test_store_shutting_down_is_unavailable() {
        let store = Arc::new(Store::new((), TestReducer, ()));
        store.begin_shutdown();

        let (status, Json(health)) = health_check_with_store(State(store)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, HealthStatus::Unhealthy);
    }
}
