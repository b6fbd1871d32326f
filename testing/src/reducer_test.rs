//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use dispatch_core::reducer::Reducer;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for event assertion functions
type EventAssertion<A> = Box<dyn FnOnce(&[A])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use dispatch_testing::ReducerTest;
///
/// ReducerTest::new(RideReducer::new())
///     .with_env(test_environment())
///     .given_state(RideState::new())
///     .when_action(RideAction::AcceptRide { ride_id, driver_id })
///     .then_state(|state| {
///         assert_eq!(state.count(), 1);
///     })
///     .then_events(|events| {
///         assert_eq!(events.len(), 1);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    event_assertions: Vec<EventAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            event_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Replay an action before the action under test (Given)
    ///
    /// Events from given actions are not passed to event assertions.
    #[must_use]
    pub fn given_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Set the action to test (When)
    ///
    /// Only the events of the last action reach `then_events`.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the events emitted by the action under test (Then)
    #[must_use]
    pub fn then_events<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[A]) + 'static,
    {
        self.event_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "Action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut events = Vec::new();
        for action in self.actions {
            events = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.event_assertions {
            assertion(&events);
        }
    }
}

/// Helper assertions for emitted events
pub mod assertions {
    /// Assert that no events were emitted
    ///
    /// # Panics
    ///
    /// Panics if events is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_events<A: std::fmt::Debug>(events: &[A]) {
        assert!(
            events.is_empty(),
            "Expected no events, but found {}: {:?}",
            events.len(),
            events
        );
    }

    /// Assert the number of emitted events
    ///
    /// # Panics
    ///
    /// Panics if the number of events doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_events_count<A>(events: &[A], expected: usize) {
        assert_eq!(
            events.len(),
            expected,
            "Expected {} events, but found {}",
            expected,
            events.len()
        );
    }

    /// Assert that exactly one event was emitted and it matches the predicate
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one event or it fails the predicate.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_single_event<A, F>(events: &[A], predicate: F)
    where
        A: std::fmt::Debug,
        F: FnOnce(&A) -> bool,
    {
        match events {
            [event] => assert!(predicate(event), "Unexpected event: {event:?}"),
            _ => panic!("Expected exactly one event, but found {events:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::reducer::{Emitted, Reducer};
    use dispatch_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Increment,
        Reset,
        Changed(i32),
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Emitted<Self::Action> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![TestAction::Changed(state.count)]
                }
                TestAction::Reset if state.count == 0 => SmallVec::new(),
                TestAction::Reset => {
                    state.count = 0;
                    smallvec![TestAction::Changed(0)]
                }
                TestAction::Changed(_) => SmallVec::new(),
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_events(|events| {
                assertions::assert_single_event(events, |e| *e == TestAction::Changed(1));
            })
            .run();
    }

    #[test]
    fn test_given_actions_are_replayed_first() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .given_action(TestAction::Increment)
            .given_action(TestAction::Increment)
            .when_action(TestAction::Increment)
            .then_state(|state| assert_eq!(state.count, 3))
            .then_events(|events| assertions::assert_events_count(events, 1))
            .run();
    }

    #[test]
    fn test_assertions_no_events() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Reset)
            .then_events(assertions::assert_no_events)
            .run();
    }
}
