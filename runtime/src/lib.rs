//! # Dispatch Runtime
//!
//! Runtime for reducer-driven dispatch services.
//!
//! This crate provides the [`Store`](store::Store), which owns a reducer's
//! state and serializes every action through a single write lock.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; runs actions atomically
//! - **Health**: Lightweight health reporting for readiness probes
//! - **Metrics**: Prometheus recorder installation and metric descriptions
//!
//! ## Example
//!
//! ```ignore
//! use dispatch_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and look at what it produced, under the same lock
//! let outcome = store
//!     .send_and_inspect(Action::DoSomething, |state, events| events.len())
//!     .await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use dispatch_core::reducer::Reducer;
use serde::Serialize;

/// Prometheus metrics for observability
pub mod metrics;

/// Health check status levels
///
/// Indicates the current health state of a component or system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,

    /// Component is not accepting work
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is healthy
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Check if status is unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Unhealthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    pub message: Option<String>,

    /// Optional metadata (e.g., counters)
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Store module - the runtime coordinator for a reducer
pub mod store {
    use super::{HealthCheck, Reducer};
    use dispatch_core::reducer::Emitted;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::time::Instant;
    use tokio::sync::RwLock;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind a `RwLock`; every action takes the write lock)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    ///
    /// Actions are processed one at a time. A reader never observes a
    /// half-applied action, and `send_and_inspect` lets the caller read the
    /// outcome of its own action before any other action runs.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RwLock<S>,
        reducer: R,
        environment: E,
        actions_processed: AtomicU64,
        shutting_down: AtomicBool,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                actions_processed: AtomicU64::new(0),
                shutting_down: AtomicBool::new(false),
            }
        }

        /// Send an action through the reducer
        ///
        /// Returns the events the reducer emitted.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub async fn send(&self, action: A) -> Emitted<A> {
            let mut state = self.state.write().await;
            self.reduce_locked(&mut state, action)
        }

        /// Send an action and inspect the result while still holding the lock
        ///
        /// The closure receives the updated state and the events emitted by the
        /// reducer. No other action can run between the reducer and the
        /// closure, so read-check-mutate sequences stay atomic.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub async fn send_and_inspect<F, T>(&self, action: A, inspect: F) -> T
        where
            F: FnOnce(&mut S, &[A]) -> T,
        {
            let mut state = self.state.write().await;
            let emitted = self.reduce_locked(&mut state, action);
            inspect(&mut state, &emitted)
        }

        /// Run the reducer; the caller must hold the write lock.
        fn reduce_locked(&self, state: &mut S, action: A) -> Emitted<A> {
            let started = Instant::now();
            let emitted = self.reducer.reduce(state, action, &self.environment);
            crate::metrics::record_reduce(started.elapsed(), emitted.len());

            self.actions_processed.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(emitted = emitted.len(), "Action reduced");

            emitted
        }

        /// Read state through a closure
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Number of actions this store has processed
        #[must_use]
        pub fn actions_processed(&self) -> u64 {
            self.actions_processed.load(Ordering::Relaxed)
        }

        /// Mark the store as shutting down
        ///
        /// Actions still in flight complete normally; only readiness changes,
        /// so load balancers stop routing new requests here.
        pub fn begin_shutdown(&self) {
            if !self.shutting_down.swap(true, Ordering::AcqRel) {
                tracing::info!("Store shutting down");
            }
        }

        /// Whether [`Store::begin_shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutting_down.load(Ordering::Acquire)
        }

        /// Report store health for readiness probes
        ///
        /// Unhealthy once shutdown has begun.
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let check = if self.is_shutting_down() {
                HealthCheck::unhealthy("store", "Store is shutting down")
            } else {
                HealthCheck::healthy("store")
            };
            check.with_metadata("actions_processed", self.actions_processed().to_string())
        }
    }
}

pub use store::Store;
