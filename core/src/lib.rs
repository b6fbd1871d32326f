//! # Dispatch Core
//!
//! Core traits and types for reducer-driven dispatch services.
//!
//! Business rules live in reducers. A reducer receives the current state, an
//! action and its injected environment, mutates the state in place and returns
//! the events it emitted. Everything that talks to the outside world (HTTP,
//! clocks, rosters) is reached through the environment.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a single store
//! - **Action**: All inputs to a reducer (commands and events)
//! - **Reducer**: `(State, Action, Environment) → (State, Events)`
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use dispatch_core::{reducer::Reducer, SmallVec};
//!
//! impl Reducer for RideReducer {
//!     type State = RideState;
//!     type Action = RideAction;
//!     type Environment = RideEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut RideState,
//!         action: RideAction,
//!         env: &RideEnvironment,
//!     ) -> SmallVec<[RideAction; 4]> {
//!         // Validate, apply, report what happened
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are deterministic: given the same state, action and environment
/// they always produce the same new state and the same events.
pub mod reducer {
    use smallvec::SmallVec;

    /// Events emitted by a single reducer invocation.
    ///
    /// Almost every command emits exactly one event, so the inline capacity
    /// keeps the common path allocation free.
    pub type Emitted<A> = SmallVec<[A; 4]>;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for RideReducer {
    ///     type State = RideState;
    ///     type Action = RideAction;
    ///     type Environment = RideEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut RideState,
    ///         action: RideAction,
    ///         env: &RideEnvironment,
    ///     ) -> Emitted<RideAction> {
    ///         match action {
    ///             RideAction::StartRide { ride_id, driver_id } => {
    ///                 // Business logic here
    ///                 smallvec![RideAction::RideStarted { ride_id, started_at: env.clock.now() }]
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes
        ///
        /// This is a deterministic function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns the events that were applied
        ///
        /// A rejected command must leave every domain record untouched.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Emitted<Self::Action>;
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// let clock = FixedClock::new(time);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, SystemClock};
    use super::reducer::{Emitted, Reducer};
    use super::{smallvec, SmallVec};

    struct Doubler;

    impl Reducer for Doubler {
        type State = u32;
        type Action = u32;
        type Environment = ();

        fn reduce(&self, state: &mut u32, action: u32, _env: &()) -> Emitted<u32> {
            if action == 0 {
                return SmallVec::new();
            }
            *state += action * 2;
            smallvec![*state]
        }
    }

    #[test]
    fn reducer_reports_applied_events() {
        let mut state = 1;
        let emitted = Doubler.reduce(&mut state, 3, &());
        assert_eq!(state, 7);
        assert_eq!(emitted.as_slice(), &[7]);
    }

    #[test]
    fn reducer_can_emit_nothing() {
        let mut state = 1;
        assert!(Doubler.reduce(&mut state, 0, &()).is_empty());
        assert_eq!(state, 1);
    }

    #[test]
    fn system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
