//! Scoped instances of a bundle
//!
//! Several instances of one reducer can live in the same state tree and share
//! one action stream. Each instance gets a [`Scope`]: its action creators tag
//! every action with the scope ([`action_scope`]) and its reducer only applies
//! actions carrying the same scope ([`reducer_scope`]).
//!
//! A reducer that receives a foreign or unscoped action is called with an
//! empty action instead, so it still produces its initial state when the host
//! has none yet.
//!
//! # Example
//!
//! ```
//! use reduxed_core::bundle::{handler, Bundle};
//! use reduxed_core::scope::{action_scope, reducer_scope};
//! use reduxed_core::{Reducer, ScopedAction};
//!
//! let counter = Bundle::of([handler("increment", |s: i64, _: Option<&i64>| s + 1)]).build(0, None);
//!
//! let first = action_scope("counter-1", &counter.actions());
//! let second = action_scope("counter-2", &counter.actions());
//! let reducer = reducer_scope::<i64, ScopedAction<i64>, _>("counter-1", counter.reducer());
//!
//! assert_eq!(reducer.reduce(Some(0), Some(&first["increment"](None))), 1);
//! assert_eq!(reducer.reduce(Some(0), Some(&second["increment"](None))), 0);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::action::{Action, Scope, ScopedAction};
use crate::bundle::{ActionCreator, ActionCreators, BundleReducer};
use crate::error::ScopeError;
use crate::reducer::{Reducer, SharedReducer};

/// Wrap action creators so every action they produce carries `scope`
///
/// The produced actions compare equal to their unscoped counterparts; the
/// scope is read back with [`Action::scope`]. Re-scoping an already scoped
/// action replaces its scope.
pub fn action_scope<A>(
    scope: impl Into<Scope>,
    creators: &ActionCreators<A>,
) -> ActionCreators<ScopedAction<A::Payload>>
where
    A: Action,
{
    let scope = scope.into();
    creators
        .iter()
        .map(|(name, creator)| {
            let inner = Arc::clone(creator);
            let scope = scope.clone();
            let scoped: ActionCreator<ScopedAction<A::Payload>> =
                Arc::new(move |payload| ScopedAction::tag(inner(payload), scope.clone()));
            (name.to_string(), scoped)
        })
        .collect()
}

/// Reducer that only applies actions tagged with its scope
///
/// Matching actions are forwarded unchanged. Anything else reaches the
/// wrapped reducer as an empty action (`None`).
pub struct ScopedReducer<S, A> {
    scope: Scope,
    inner: SharedReducer<S, A>,
}

impl<S, A> ScopedReducer<S, A> {
    /// Wrap an already shared reducer
    pub fn from_shared(scope: impl Into<Scope>, inner: SharedReducer<S, A>) -> Self {
        Self {
            scope: scope.into(),
            inner,
        }
    }

    /// The scope this reducer accepts
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl<S, A> Clone for ScopedReducer<S, A> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> fmt::Debug for ScopedReducer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedReducer")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<S, A: Action> Reducer<S, A> for ScopedReducer<S, A> {
    fn reduce(&self, state: Option<S>, action: Option<&A>) -> S {
        match action {
            Some(action) if action.scope() == Some(&self.scope) => {
                self.inner.reduce(state, Some(action))
            }
            Some(action) => {
                tracing::trace!(
                    scope = %self.scope,
                    action = %action.action_type(),
                    action_scope = ?action.scope(),
                    "Scope mismatch, forwarding empty action"
                );
                self.inner.reduce(state, None)
            }
            None => self.inner.reduce(state, None),
        }
    }
}

/// Wrap a reducer so it only applies actions tagged with `scope`
pub fn reducer_scope<S, A, R>(scope: impl Into<Scope>, reducer: R) -> ScopedReducer<S, A>
where
    A: Action,
    R: Reducer<S, A> + 'static,
{
    ScopedReducer::from_shared(scope, Arc::new(reducer))
}

/// Something [`with_scope`] can scope
pub enum ScopeTarget<S, A: Action> {
    /// A reducer, scoped with [`reducer_scope`]
    Reducer(SharedReducer<S, A>),
    /// A map of action creators, scoped with [`action_scope`]
    ActionCreators(ActionCreators<A>),
}

impl<S, A: Action> ScopeTarget<S, A> {
    /// Target a reducer
    pub fn reducer<R>(reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::Reducer(Arc::new(reducer))
    }

    /// Target a map of action creators
    pub fn action_creators(creators: ActionCreators<A>) -> Self {
        Self::ActionCreators(creators)
    }

    /// Classify a type-erased target
    ///
    /// Accepts a boxed [`SharedReducer`], [`BundleReducer`] or
    /// [`ScopedReducer`], or a boxed [`ActionCreators`] map. Other reducer
    /// types must be erased with [`share`](crate::reducer::share) first.
    /// Anything else is rejected with [`ScopeError::InvalidScopeTarget`].
    pub fn inspect(target: Box<dyn Any + Send>) -> Result<Self, ScopeError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let target = match target.downcast::<SharedReducer<S, A>>() {
            Ok(reducer) => return Ok(Self::Reducer(*reducer)),
            Err(other) => other,
        };
        let target = match target.downcast::<BundleReducer<S, A::Payload>>() {
            Ok(reducer) => return Ok(Self::reducer(*reducer)),
            Err(other) => other,
        };
        let target = match target.downcast::<ScopedReducer<S, A>>() {
            Ok(reducer) => return Ok(Self::reducer(*reducer)),
            Err(other) => other,
        };
        match target.downcast::<ActionCreators<A>>() {
            Ok(creators) => Ok(Self::ActionCreators(*creators)),
            Err(_) => Err(ScopeError::InvalidScopeTarget),
        }
    }
}

impl<S, A: Action> fmt::Debug for ScopeTarget<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reducer(_) => f.write_str("ScopeTarget::Reducer"),
            Self::ActionCreators(creators) => f
                .debug_tuple("ScopeTarget::ActionCreators")
                .field(&creators.names().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A scope waiting for its target
///
/// Applying a binder is the same as calling [`with_scope`] with the target
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeBinder {
    scope: Scope,
}

impl ScopeBinder {
    /// Bind a scope
    pub fn new(scope: impl Into<Scope>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    /// The bound scope
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Scope a target
    pub fn apply<S, A: Action>(&self, target: ScopeTarget<S, A>) -> WithScope<S, A> {
        with_scope(self.scope.clone(), Some(target))
    }

    /// Scope a type-erased target
    pub fn apply_any<S: Clone + Send + Sync + 'static, A: Action>(
        &self,
        target: Box<dyn Any + Send>,
    ) -> Result<WithScope<S, A>, ScopeError> {
        try_with_scope(self.scope.clone(), Some(target))
    }
}

/// Result of [`with_scope`]
pub enum WithScope<S, A: Action> {
    /// No target given yet
    Pending(ScopeBinder),
    /// A scoped reducer
    Reducer(ScopedReducer<S, A>),
    /// Scoped action creators
    ActionCreators(ActionCreators<ScopedAction<A::Payload>>),
}

impl<S, A: Action> WithScope<S, A> {
    /// Whether the scope still waits for a target
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The binder, if no target was given
    pub fn into_binder(self) -> Option<ScopeBinder> {
        match self {
            Self::Pending(binder) => Some(binder),
            _ => None,
        }
    }

    /// The scoped reducer, if the target was a reducer
    pub fn into_reducer(self) -> Option<ScopedReducer<S, A>> {
        match self {
            Self::Reducer(reducer) => Some(reducer),
            _ => None,
        }
    }

    /// The scoped action creators, if the target was a creator map
    pub fn into_action_creators(self) -> Option<ActionCreators<ScopedAction<A::Payload>>> {
        match self {
            Self::ActionCreators(creators) => Some(creators),
            _ => None,
        }
    }
}

impl<S, A: Action> fmt::Debug for WithScope<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(binder) => f.debug_tuple("WithScope::Pending").field(binder).finish(),
            Self::Reducer(reducer) => f.debug_tuple("WithScope::Reducer").field(reducer).finish(),
            Self::ActionCreators(creators) => f
                .debug_tuple("WithScope::ActionCreators")
                .field(&creators.names().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Scope a reducer or a map of action creators
///
/// Without a target, returns [`WithScope::Pending`] holding a
/// [`ScopeBinder`] to apply later.
pub fn with_scope<S, A: Action>(
    scope: impl Into<Scope>,
    target: Option<ScopeTarget<S, A>>,
) -> WithScope<S, A> {
    let scope = scope.into();
    match target {
        None => WithScope::Pending(ScopeBinder { scope }),
        Some(ScopeTarget::Reducer(reducer)) => {
            WithScope::Reducer(ScopedReducer::from_shared(scope, reducer))
        }
        Some(ScopeTarget::ActionCreators(creators)) => {
            WithScope::ActionCreators(action_scope(scope, &creators))
        }
    }
}

/// [`with_scope`] for type-erased targets, see [`ScopeTarget::inspect`]
pub fn try_with_scope<S: Clone + Send + Sync + 'static, A: Action>(
    scope: impl Into<Scope>,
    target: Option<Box<dyn Any + Send>>,
) -> Result<WithScope<S, A>, ScopeError> {
    let target = target.map(ScopeTarget::<S, A>::inspect).transpose()?;
    Ok(with_scope(scope, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PlainAction;
    use crate::bundle::{handler, ActionCreators, Bundle};

    fn counter(state: Option<i64>, action: Option<&ScopedAction<()>>) -> i64 {
        let state = state.unwrap_or(0);
        match action.map(|a| a.action_type.as_str()) {
            Some("INCREMENT") => state + 1,
            Some("DECREMENT") => state - 1,
            _ => state,
        }
    }

    fn plain_creators() -> ActionCreators<PlainAction<()>> {
        let increment: ActionCreator<PlainAction<()>> =
            Arc::new(|_| PlainAction::new("INCREMENT"));
        let decrement: ActionCreator<PlainAction<()>> =
            Arc::new(|_| PlainAction::new("DECREMENT"));
        [("increment", increment), ("decrement", decrement)]
            .into_iter()
            .collect()
    }

    fn scoped_creators(scope: &str) -> ActionCreators<ScopedAction<()>> {
        action_scope(scope, &plain_creators())
    }

    #[test]
    fn test_action_scope_tags_every_creator() {
        let scoped = scoped_creators("counter-1");
        for name in ["increment", "decrement"] {
            let action = scoped[name](None);
            assert_eq!(action.scope(), Some(&Scope::from("counter-1")));
        }
    }

    #[test]
    fn test_action_scope_keeps_shape() {
        let scoped = scoped_creators("counter-1");
        assert_eq!(scoped["increment"](None), PlainAction::<()>::new("INCREMENT"));
        assert_eq!(scoped["decrement"](None), PlainAction::<()>::new("DECREMENT"));
        assert_eq!(
            scoped.names().collect::<Vec<_>>(),
            vec!["increment", "decrement"]
        );
    }

    #[test]
    fn test_action_scope_replaces_existing_scope() {
        let rescoped = action_scope("counter-2", &scoped_creators("counter-1"));
        assert_eq!(
            rescoped["increment"](None).scope(),
            Some(&Scope::from("counter-2"))
        );
    }

    #[test]
    fn test_reducer_scope_initial_state() {
        let reducer = reducer_scope("counter-1", counter);
        assert_eq!(reducer.reduce(None, None), 0);
        let unscoped: ScopedAction<()> = PlainAction::new("INCREMENT").into();
        assert_eq!(reducer.reduce(None, Some(&unscoped)), 0);
    }

    #[test]
    fn test_reducer_scope_applies_matching_scope() {
        let reducer = reducer_scope("counter-1", counter);
        let actions = scoped_creators("counter-1");
        assert_eq!(reducer.reduce(Some(0), Some(&actions["increment"](None))), 1);
        assert_eq!(reducer.reduce(Some(0), Some(&actions["decrement"](None))), -1);
    }

    #[test]
    fn test_reducer_scope_ignores_other_scope() {
        let reducer = reducer_scope("counter-1", counter);
        let other = scoped_creators("counter-2");
        assert_eq!(reducer.reduce(Some(5), Some(&other["increment"](None))), 5);
        assert_eq!(
            reducer.reduce(Some(5), Some(&other["increment"](None))),
            counter(Some(5), None)
        );
    }

    #[test]
    fn test_with_scope_without_target_is_pending() {
        let result = with_scope::<i64, ScopedAction<()>>("counter-1", None);
        assert!(result.is_pending());
        let binder = result.into_binder().unwrap();
        assert_eq!(binder.scope(), &Scope::from("counter-1"));
    }

    #[test]
    fn test_with_scope_action_creators() {
        let target = ScopeTarget::<i64, _>::action_creators(plain_creators());
        let scoped = with_scope("counter-1", Some(target))
            .into_action_creators()
            .unwrap();
        assert_eq!(scoped["increment"](None), PlainAction::<()>::new("INCREMENT"));
        assert_eq!(
            scoped["increment"](None).scope(),
            Some(&Scope::from("counter-1"))
        );
    }

    #[test]
    fn test_with_scope_reducer() {
        let target = ScopeTarget::reducer(counter);
        let reducer = with_scope("counter-1", Some(target)).into_reducer().unwrap();
        assert_eq!(reducer.scope(), &Scope::from("counter-1"));
        let actions = scoped_creators("counter-1");
        assert_eq!(reducer.reduce(Some(1), Some(&actions["increment"](None))), 2);
    }

    #[test]
    fn test_binder_matches_direct_call() {
        let binder = with_scope::<i64, ScopedAction<()>>("counter-1", None)
            .into_binder()
            .unwrap();

        let curried = binder.apply(ScopeTarget::reducer(counter)).into_reducer().unwrap();
        let direct = with_scope("counter-1", Some(ScopeTarget::reducer(counter)))
            .into_reducer()
            .unwrap();

        let action = scoped_creators("counter-1")["increment"](None);
        assert_eq!(
            curried.reduce(Some(3), Some(&action)),
            direct.reduce(Some(3), Some(&action))
        );
    }

    #[test]
    fn test_inspect_accepts_reducers_and_creators() {
        let shared: SharedReducer<i64, ScopedAction<()>> = Arc::new(counter);
        let target = ScopeTarget::<i64, ScopedAction<()>>::inspect(Box::new(shared)).unwrap();
        assert!(matches!(target, ScopeTarget::Reducer(_)));

        let target =
            ScopeTarget::<i64, PlainAction<()>>::inspect(Box::new(plain_creators())).unwrap();
        assert!(matches!(target, ScopeTarget::ActionCreators(_)));
    }

    #[test]
    fn test_try_with_scope_rejects_other_values() {
        let err = try_with_scope::<i64, ScopedAction<()>>("counter-1", Some(Box::new(42_u32)))
            .unwrap_err();
        assert_eq!(err, ScopeError::InvalidScopeTarget);

        let err = try_with_scope::<i64, ScopedAction<()>>("counter-1", Some(Box::new(())))
            .unwrap_err();
        assert_eq!(err, ScopeError::InvalidScopeTarget);
    }

    #[test]
    fn test_try_with_scope_accepts_library_reducers() {
        let descriptor =
            Bundle::of([handler("increment", |s: i64, _: Option<&()>| s + 1)]).build(0, None);
        let mine = action_scope("counter-1", &descriptor.actions());
        let other = action_scope("counter-2", &descriptor.actions());

        let scoped = try_with_scope::<i64, ScopedAction<()>>(
            "counter-1",
            Some(Box::new(descriptor.reducer())),
        )
        .unwrap()
        .into_reducer()
        .unwrap();
        assert_eq!(scoped.reduce(Some(1), Some(&mine["increment"](None))), 2);
        assert_eq!(scoped.reduce(Some(1), Some(&other["increment"](None))), 1);

        let inner = reducer_scope::<i64, ScopedAction<()>, _>("counter-1", descriptor.reducer());
        let rescoped = try_with_scope::<i64, ScopedAction<()>>("counter-1", Some(Box::new(inner)))
            .unwrap()
            .into_reducer()
            .unwrap();
        assert_eq!(rescoped.reduce(Some(1), Some(&mine["increment"](None))), 2);
        assert_eq!(rescoped.reduce(None, Some(&other["increment"](None))), 0);
    }

    #[test]
    fn test_try_with_scope_without_target_is_pending() {
        let result = try_with_scope::<i64, ScopedAction<()>>("counter-1", None).unwrap();
        assert!(result.is_pending());
    }
}
