//! Reducer abstraction shared by bundles and scopes

use std::sync::Arc;

/// A pure function from the current state and an action to the next state
///
/// `state` is `None` when the host has no state yet (initialization probe).
/// `action` is `None` for an empty action that carries no type.
///
/// Any `Fn(Option<S>, Option<&A>) -> S` closure or function is a reducer:
///
/// ```
/// use reduxed_core::{PlainAction, Reducer};
///
/// fn counter(state: Option<i32>, action: Option<&PlainAction<i32>>) -> i32 {
///     let state = state.unwrap_or(0);
///     match action.map(|a| a.action_type.as_str()) {
///         Some("INCREMENT") => state + 1,
///         _ => state,
///     }
/// }
///
/// assert_eq!(counter.reduce(None, None), 0);
/// assert_eq!(counter.reduce(Some(1), Some(&PlainAction::new("INCREMENT"))), 2);
/// ```
pub trait Reducer<S, A>: Send + Sync {
    /// Compute the next state
    fn reduce(&self, state: Option<S>, action: Option<&A>) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<S>, Option<&A>) -> S + Send + Sync,
{
    fn reduce(&self, state: Option<S>, action: Option<&A>) -> S {
        self(state, action)
    }
}

/// A type-erased reducer that can be shared between owners
pub type SharedReducer<S, A> = Arc<dyn Reducer<S, A>>;

/// Erase a reducer's concrete type
pub fn share<S, A, R>(reducer: R) -> SharedReducer<S, A>
where
    R: Reducer<S, A> + 'static,
{
    Arc::new(reducer)
}
