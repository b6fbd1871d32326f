//! Axum integration for reducer-driven dispatch services.
//!
//! This crate is the imperative shell around the functional core: it turns
//! HTTP requests into store actions and store outcomes into HTTP responses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, CORS
//! │  - Request parsing                      │  ← Correlation IDs
//! │  - Response serialization               │  ← Logging
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Reducers own the business rules      │  ← Testable at memory speed
//! │  - State transformations                │  ← No I/O
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dispatch_web::{cors_layer, correlation_id_layer, AppError};
//! use axum::{Router, routing::post, Json};
//!
//! async fn accept(
//!     State(state): State<AppState>,
//!     Json(request): Json<AcceptRequest>,
//! ) -> Result<Json<Ride>, AppError> {
//!     let ride = state.ledger.accept(request.ride_id, request.driver_id).await?;
//!     Ok(Json(ride))
//! }
//!
//! let app = Router::new()
//!     .route("/api/rides/:id/accept", post(accept))
//!     .layer(correlation_id_layer())
//!     .layer(cors_layer("*")?)
//!     .with_state(app_state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cors;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use cors::cors_layer;
pub use error::AppError;
pub use extractors::CorrelationId;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
