//! Test utilities for reduxed bundles
//!
//! - [`TestHarness`]: stands in for the host store, with an action queue
//! - [`same_action`] / [`assert_action_eq!`]: compare actions by type and
//!   payload, ignoring scope markers
//! - [`assert_emitted_type!`] / [`assert_not_emitted_type!`]: assertions over
//!   a list of actions
//!
//! # Example
//!
//! ```
//! use reduxed_core::bundle::{handler, Bundle};
//! use reduxed_core::testing::TestHarness;
//! use reduxed_core::PlainAction;
//!
//! let counter = Bundle::of([handler("increment", |s: i64, _: Option<&i64>| s + 1)]).build(0, None);
//! let actions = counter.actions();
//!
//! let mut harness = TestHarness::<i64, PlainAction<i64>>::new(counter.reducer());
//! assert_eq!(*harness.state(), 0);
//!
//! harness.emit(actions["increment"](None));
//! harness.emit(actions["increment"](None));
//! assert_eq!(harness.flush(), 2);
//! assert_eq!(*harness.state(), 2);
//! ```

use tokio::sync::mpsc;

use crate::action::Action;
use crate::reducer::{Reducer, SharedReducer};

/// Whether two actions have the same type and payload
///
/// Scope markers are ignored, so a scoped action matches its unscoped
/// counterpart.
pub fn same_action<A, B>(left: &A, right: &B) -> bool
where
    A: Action,
    B: Action<Payload = A::Payload>,
    A::Payload: PartialEq,
{
    left.action_type() == right.action_type() && left.payload() == right.payload()
}

/// Host-store stand-in for exercising reducers.
///
/// Provides:
/// - The initialization probe on construction (no state, no action)
/// - Immediate [`dispatch`](TestHarness::dispatch)
/// - An action queue: [`emit`](TestHarness::emit) now, [`flush`](TestHarness::flush) later
/// - A record of every action that reached the reducer
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type (must implement [`Action`])
pub struct TestHarness<S, A: Action> {
    state: S,
    reducer: SharedReducer<S, A>,
    dispatched: Vec<A>,
    /// Sender for queued actions
    tx: mpsc::UnboundedSender<A>,
    /// Receiver drained by `flush`
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S: Clone, A: Action> TestHarness<S, A> {
    /// Create a harness and obtain the initial state from the reducer.
    pub fn new<R>(reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::from_shared(std::sync::Arc::new(reducer))
    }

    /// Create a harness around an already shared reducer.
    pub fn from_shared(reducer: SharedReducer<S, A>) -> Self {
        let state = reducer.reduce(None, None);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            reducer,
            dispatched: Vec::new(),
            tx,
            rx,
        }
    }

    /// Current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Reduce an action right away and return the new state.
    pub fn dispatch(&mut self, action: A) -> &S {
        self.state = self.reducer.reduce(Some(self.state.clone()), Some(&action));
        self.dispatched.push(action);
        &self.state
    }

    /// Reduce an empty action, as a host does for unrecognized input.
    pub fn dispatch_empty(&mut self) -> &S {
        self.state = self.reducer.reduce(Some(self.state.clone()), None);
        &self.state
    }

    /// Get a clone of the queue sender for passing to producers.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Queue an action without reducing it yet.
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain queued actions without reducing them.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Reduce every queued action in order, returning how many were applied.
    pub fn flush(&mut self) -> usize {
        let actions = self.drain_emitted();
        let count = actions.len();
        for action in actions {
            self.dispatch(action);
        }
        count
    }

    /// Every action dispatched so far, oldest first.
    pub fn dispatched(&self) -> &[A] {
        &self.dispatched
    }
}

/// Assert that two actions have the same type and payload, ignoring scope.
///
/// # Example
///
/// ```
/// use reduxed_core::{assert_action_eq, PlainAction, ScopedAction};
///
/// let scoped = ScopedAction::<i32>::new("INCREMENT", Some(1), "counter-1");
/// assert_action_eq!(scoped, PlainAction::with_payload("INCREMENT", 1));
/// ```
#[macro_export]
macro_rules! assert_action_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (left, right) = (&$left, &$right);
        assert!(
            $crate::testing::same_action(left, right),
            "Expected actions to match (ignoring scope)\n  left: {:?}\n right: {:?}",
            left,
            right
        );
    }};
}

/// Assert that an action with the given type is in a list.
///
/// # Example
///
/// ```
/// use reduxed_core::{assert_emitted_type, PlainAction};
///
/// let actions: Vec<PlainAction<i32>> = vec![PlainAction::new("app/INCREMENT")];
/// assert_emitted_type!(actions, "app/INCREMENT");
/// ```
#[macro_export]
macro_rules! assert_emitted_type {
    ($actions:expr, $action_type:expr) => {
        assert!(
            $actions.iter().any(|a| {
                use $crate::Action;
                a.action_type() == $action_type
            }),
            "Expected action of type `{}` to be emitted, but got: {:?}",
            $action_type,
            $actions
        );
    };
}

/// Assert that no action with the given type is in a list.
///
/// # Example
///
/// ```
/// use reduxed_core::{assert_not_emitted_type, PlainAction};
///
/// let actions: Vec<PlainAction<i32>> = vec![PlainAction::new("app/INCREMENT")];
/// assert_not_emitted_type!(actions, "app/DECREMENT");
/// ```
#[macro_export]
macro_rules! assert_not_emitted_type {
    ($actions:expr, $action_type:expr) => {
        assert!(
            !$actions.iter().any(|a| {
                use $crate::Action;
                a.action_type() == $action_type
            }),
            "Expected NO action of type `{}` to be emitted, but got: {:?}",
            $action_type,
            $actions
        );
    };
}
