//! Reducer bundles built from named handlers
//!
//! A bundle is an ordered list of [`Handler`]s. Building it with an initial
//! state and [`BundleOptions`] yields a [`Descriptor`], from which three
//! artifacts are derived:
//!
//! - the action types ([`get_types`]): handler name -> `PREFIX/ACTION_TYPE`
//! - the action creators ([`get_actions`]): handler name -> `payload -> action`
//! - the reducer ([`get_reducer`]): dispatches actions to handlers by type
//!
//! # Example
//!
//! ```
//! use reduxed_core::bundle::{handler, Bundle, BundleOptions};
//! use reduxed_core::Reducer;
//!
//! let descriptor = Bundle::of([
//!     handler("increment", |state: i64, by: Option<&i64>| state + by.copied().unwrap_or(1)),
//!     handler("decrement", |state: i64, by: Option<&i64>| state - by.copied().unwrap_or(1)),
//! ])
//! .build(0, Some(BundleOptions::with_prefix("app")));
//!
//! let types = descriptor.types();
//! assert_eq!(types["increment"], "app/INCREMENT");
//!
//! let actions = descriptor.actions();
//! let reducer = descriptor.reducer();
//!
//! assert_eq!(reducer.reduce(None, None::<&reduxed_core::PlainAction<i64>>), 0);
//! assert_eq!(reducer.reduce(Some(2), Some(&actions["increment"](Some(1)))), 3);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{Action, PlainAction};
use crate::error::BundleError;
use crate::map::NamedMap;
use crate::naming::action_type;
use crate::reducer::Reducer;

/// State transition applied when a handler's action is dispatched
pub type HandlerFn<S, P> = Arc<dyn Fn(S, Option<&P>) -> S + Send + Sync>;

/// Function producing an action from an optional payload
pub type ActionCreator<A> = Arc<dyn Fn(Option<<A as Action>::Payload>) -> A + Send + Sync>;

/// Action creators keyed by handler name
pub type ActionCreators<A> = NamedMap<ActionCreator<A>>;

/// Action types keyed by handler name
pub type ActionTypes = NamedMap<String>;

/// A named state transition
pub struct Handler<S, P = Value> {
    name: String,
    func: HandlerFn<S, P>,
}

impl<S, P> Handler<S, P> {
    /// Pair a name with a state transition
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(S, Option<&P>) -> S + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The human-readable handler name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state transition
    pub fn func(&self) -> &HandlerFn<S, P> {
        &self.func
    }

    /// Apply the transition
    pub fn call(&self, state: S, payload: Option<&P>) -> S {
        (self.func)(state, payload)
    }
}

impl<S, P> Clone for Handler<S, P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<S, P> fmt::Debug for Handler<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

/// Create a handler
pub fn handler<S, P, F>(name: impl Into<String>, func: F) -> Handler<S, P>
where
    F: Fn(S, Option<&P>) -> S + Send + Sync + 'static,
{
    Handler::new(name, func)
}

/// Options applied when building a bundle
///
/// Deserializes from `{"typePrefix": "..."}`; a missing prefix is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleOptions {
    /// Namespace prepended to every action type as `prefix/`
    pub type_prefix: String,
}

impl BundleOptions {
    /// Options with the given type prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            type_prefix: prefix.into(),
        }
    }
}

/// An ordered list of handlers waiting for an initial state
pub struct Bundle<S, P = Value> {
    handlers: Vec<Handler<S, P>>,
}

impl<S, P> Bundle<S, P> {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Create a bundle from handlers, keeping their order
    pub fn of(handlers: impl IntoIterator<Item = Handler<S, P>>) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    /// Append a handler
    pub fn handler<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(S, Option<&P>) -> S + Send + Sync + 'static,
    {
        self.handlers.push(Handler::new(name, func));
        self
    }

    /// Handlers in insertion order
    pub fn handlers(&self) -> &[Handler<S, P>] {
        &self.handlers
    }

    /// Bind the handlers to an initial state
    ///
    /// When two handler names derive the same action type the later handler
    /// wins the dispatch table and a warning is logged. Use
    /// [`Bundle::try_build`] to reject collisions instead.
    pub fn build(&self, initial_state: S, options: Option<BundleOptions>) -> Descriptor<S, P> {
        let options = options.unwrap_or_default();
        let (handlers_by_type, collisions) = index_handlers(&self.handlers, &options.type_prefix);
        for collision in &collisions {
            tracing::warn!(error = %collision, "Duplicate action type, later handler wins");
        }
        Descriptor::from_parts(self.handlers.clone(), handlers_by_type, initial_state, options)
    }

    /// Like [`Bundle::build`], but fail when two handlers share an action type
    pub fn try_build(
        &self,
        initial_state: S,
        options: Option<BundleOptions>,
    ) -> Result<Descriptor<S, P>, BundleError> {
        let options = options.unwrap_or_default();
        let (handlers_by_type, collisions) = index_handlers(&self.handlers, &options.type_prefix);
        if let Some(collision) = collisions.into_iter().next() {
            return Err(collision);
        }
        Ok(Descriptor::from_parts(
            self.handlers.clone(),
            handlers_by_type,
            initial_state,
            options,
        ))
    }
}

impl<S, P> Default for Bundle<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> fmt::Debug for Bundle<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Start a bundle from a list of handlers
///
/// Call [`Bundle::build`] on the result to bind an initial state.
pub fn create<S, P>(handlers: impl IntoIterator<Item = Handler<S, P>>) -> Bundle<S, P> {
    Bundle::of(handlers)
}

type DispatchTable<S, P> = HashMap<String, HandlerFn<S, P>>;

/// Index handlers by action type, reporting every collision in order
fn index_handlers<S, P>(
    handlers: &[Handler<S, P>],
    prefix: &str,
) -> (DispatchTable<S, P>, Vec<BundleError>) {
    let mut by_type: DispatchTable<S, P> = HashMap::with_capacity(handlers.len());
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(handlers.len());
    let mut collisions = Vec::new();

    for handler in handlers {
        let ty = action_type(prefix, handler.name());
        if let Some(first) = owners.insert(ty.clone(), handler.name()) {
            collisions.push(BundleError::DuplicateActionType {
                action_type: ty.clone(),
                first: first.to_string(),
                second: handler.name().to_string(),
            });
        }
        by_type.insert(ty, Arc::clone(handler.func()));
    }

    (by_type, collisions)
}

struct DescriptorInner<S, P> {
    handlers: Vec<Handler<S, P>>,
    handlers_by_type: DispatchTable<S, P>,
    initial_state: S,
    options: BundleOptions,
}

/// Handlers bound to an initial state and options
///
/// Immutable once built. Cloning is cheap: clones share the same data, and
/// every reducer, type map, and action creator derived from a descriptor
/// keeps it alive.
pub struct Descriptor<S, P = Value> {
    inner: Arc<DescriptorInner<S, P>>,
}

impl<S, P> Descriptor<S, P> {
    fn from_parts(
        handlers: Vec<Handler<S, P>>,
        handlers_by_type: HashMap<String, HandlerFn<S, P>>,
        initial_state: S,
        options: BundleOptions,
    ) -> Self {
        tracing::debug!(
            handlers = handlers.len(),
            type_prefix = %options.type_prefix,
            "Built bundle descriptor"
        );
        Self {
            inner: Arc::new(DescriptorInner {
                handlers,
                handlers_by_type,
                initial_state,
                options,
            }),
        }
    }

    /// Handlers in insertion order
    pub fn handlers(&self) -> &[Handler<S, P>] {
        &self.inner.handlers
    }

    /// Dispatch table from action type to state transition
    pub fn handlers_by_type(&self) -> &HashMap<String, HandlerFn<S, P>> {
        &self.inner.handlers_by_type
    }

    /// State used when the reducer receives no state
    pub fn initial_state(&self) -> &S {
        &self.inner.initial_state
    }

    /// Options the descriptor was built with
    pub fn options(&self) -> &BundleOptions {
        &self.inner.options
    }

    /// Shorthand for [`get_types`]
    pub fn types(&self) -> ActionTypes {
        get_types(self)
    }
}

impl<S, P> Descriptor<S, P>
where
    P: Clone + fmt::Debug + Send + 'static,
{
    /// Shorthand for [`get_actions`]
    pub fn actions(&self) -> ActionCreators<PlainAction<P>> {
        get_actions(self)
    }
}

impl<S, P> Descriptor<S, P>
where
    S: Clone + Send + Sync,
{
    /// Shorthand for [`get_reducer`]
    pub fn reducer(&self) -> BundleReducer<S, P> {
        get_reducer(self)
    }
}

impl<S, P> Clone for Descriptor<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Descriptor<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.inner.handlers_by_type.keys().collect();
        types.sort();
        f.debug_struct("Descriptor")
            .field("handlers", &self.inner.handlers)
            .field("handlers_by_type", &types)
            .field("initial_state", &self.inner.initial_state)
            .field("options", &self.inner.options)
            .finish()
    }
}

/// Reducer dispatching actions to a descriptor's handlers by type
///
/// - A missing state is replaced by the descriptor's initial state.
/// - An absent action, or one whose type has no handler, returns the
///   current state unchanged.
/// - Otherwise the matching handler receives the current state and the
///   action's payload.
///
/// Scope markers are ignored; wrap the reducer with
/// [`reducer_scope`](crate::scope::reducer_scope) to filter by scope.
pub struct BundleReducer<S, P = Value> {
    descriptor: Descriptor<S, P>,
}

impl<S, P> BundleReducer<S, P> {
    /// The descriptor this reducer dispatches to
    pub fn descriptor(&self) -> &Descriptor<S, P> {
        &self.descriptor
    }
}

impl<S, P> Clone for BundleReducer<S, P> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<S, P, A> Reducer<S, A> for BundleReducer<S, P>
where
    S: Clone + Send + Sync,
    A: Action<Payload = P>,
{
    fn reduce(&self, state: Option<S>, action: Option<&A>) -> S {
        let inner = &self.descriptor.inner;
        let current = state.unwrap_or_else(|| inner.initial_state.clone());

        let Some(action) = action else {
            tracing::trace!("Empty action, keeping state");
            return current;
        };

        match inner.handlers_by_type.get(action.action_type()) {
            Some(func) => {
                tracing::debug!(action = %action.action_type(), "Applying handler");
                func(current, action.payload())
            }
            None => {
                tracing::trace!(action = %action.action_type(), "No handler for action");
                current
            }
        }
    }
}

/// Build the reducer for a descriptor
pub fn get_reducer<S, P>(descriptor: &Descriptor<S, P>) -> BundleReducer<S, P>
where
    S: Clone + Send + Sync,
{
    BundleReducer {
        descriptor: descriptor.clone(),
    }
}

/// Map every handler name to its action type
pub fn get_types<S, P>(descriptor: &Descriptor<S, P>) -> ActionTypes {
    let prefix = &descriptor.options().type_prefix;
    descriptor
        .handlers()
        .iter()
        .map(|h| (h.name().to_string(), action_type(prefix, h.name())))
        .collect()
}

/// Map every handler name to an action creator
///
/// Each creator wraps its payload in a [`PlainAction`] of the handler's type.
pub fn get_actions<S, P>(descriptor: &Descriptor<S, P>) -> ActionCreators<PlainAction<P>>
where
    P: Clone + fmt::Debug + Send + 'static,
{
    let prefix = &descriptor.options().type_prefix;
    descriptor
        .handlers()
        .iter()
        .map(|h| {
            let ty = action_type(prefix, h.name());
            let creator: ActionCreator<PlainAction<P>> = Arc::new(move |payload| PlainAction {
                action_type: ty.clone(),
                payload,
            });
            (h.name().to_string(), creator)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter_bundle() -> Bundle<i64, i64> {
        Bundle::new()
            .handler("increment", |state: i64, by: Option<&i64>| {
                state + by.copied().unwrap_or(1)
            })
            .handler("decrement", |state: i64, by: Option<&i64>| {
                state - by.copied().unwrap_or(1)
            })
    }

    fn reduce(
        reducer: &BundleReducer<i64, i64>,
        state: Option<i64>,
        action: Option<&PlainAction<i64>>,
    ) -> i64 {
        reducer.reduce(state, action)
    }

    #[test]
    fn test_handler_keeps_name_and_fn() {
        let h: Handler<i64, i64> = handler("foo", |state: i64, _: Option<&i64>| state * 2);
        assert_eq!(h.name(), "foo");
        assert_eq!(h.call(21, None), 42);
    }

    #[test]
    fn test_build_keeps_handlers_in_order() {
        let descriptor = counter_bundle().build(0, None);
        let names: Vec<&str> = descriptor.handlers().iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["increment", "decrement"]);
    }

    #[test]
    fn test_build_indexes_by_prefixed_type() {
        let descriptor = create([
            handler("fooAction", |s: i64, _: Option<&i64>| s),
            handler("barAction", |s: i64, _: Option<&i64>| s),
        ])
        .build(0, Some(BundleOptions::with_prefix("app/foo")));

        let mut types: Vec<&String> = descriptor.handlers_by_type().keys().collect();
        types.sort();
        assert_eq!(types, vec!["app/foo/BAR_ACTION", "app/foo/FOO_ACTION"]);
        assert_eq!(descriptor.options().type_prefix, "app/foo");
    }

    #[test]
    fn test_build_defaults_to_empty_prefix() {
        let descriptor = counter_bundle().build(5, None);
        assert_eq!(descriptor.options(), &BundleOptions::default());
        assert_eq!(*descriptor.initial_state(), 5);
        assert!(descriptor.handlers_by_type().contains_key("INCREMENT"));
    }

    #[test]
    fn test_duplicate_types_last_write_wins() {
        let descriptor = Bundle::new()
            .handler("fooBar", |_: i64, _: Option<&i64>| 1)
            .handler("foo_bar", |_: i64, _: Option<&i64>| 2)
            .build(0, None);

        assert_eq!(descriptor.handlers().len(), 2);
        assert_eq!(descriptor.handlers_by_type().len(), 1);

        let reducer = descriptor.reducer();
        assert_eq!(
            reduce(&reducer, Some(0), Some(&PlainAction::new("FOO_BAR"))),
            2
        );
    }

    #[test]
    fn test_try_build_rejects_duplicates() {
        let err = Bundle::new()
            .handler("fooBar", |s: i64, _: Option<&i64>| s)
            .handler("foo_bar", |s: i64, _: Option<&i64>| s)
            .try_build(0, Some(BundleOptions::with_prefix("app")))
            .unwrap_err();

        assert_eq!(
            err,
            BundleError::DuplicateActionType {
                action_type: "app/FOO_BAR".to_string(),
                first: "fooBar".to_string(),
                second: "foo_bar".to_string(),
            }
        );
    }

    #[test]
    fn test_try_build_accepts_unique_types() {
        let descriptor = counter_bundle().try_build(0, None).unwrap();
        assert_eq!(descriptor.handlers_by_type().len(), 2);
    }

    #[test]
    fn test_get_types() {
        let descriptor = create([
            handler("anotherFooAction", |s: i64, _: Option<&i64>| s),
            handler("oneMoreBarAction", |s: i64, _: Option<&i64>| s),
        ])
        .build(0, Some(BundleOptions::with_prefix("app")));

        let types = get_types(&descriptor);
        assert_eq!(types["anotherFooAction"], "app/ANOTHER_FOO_ACTION");
        assert_eq!(types["oneMoreBarAction"], "app/ONE_MORE_BAR_ACTION");
        assert_eq!(
            types.names().collect::<Vec<_>>(),
            vec!["anotherFooAction", "oneMoreBarAction"]
        );
    }

    #[test]
    fn test_types_match_dispatch_table() {
        let descriptor = counter_bundle().build(0, Some(BundleOptions::with_prefix("app")));
        for (_, ty) in descriptor.types().iter() {
            assert!(descriptor.handlers_by_type().contains_key(ty));
        }
    }

    #[test]
    fn test_get_actions() {
        let descriptor: Descriptor<i64, Value> = create([handler("foo", |s: i64, _| s)])
            .build(0, Some(BundleOptions::with_prefix("app")));

        let actions = get_actions(&descriptor);
        assert_eq!(
            actions["foo"](Some(json!("value"))),
            PlainAction::with_payload("app/FOO", json!("value"))
        );
        assert_eq!(actions["foo"](None), PlainAction::new("app/FOO"));
    }

    #[test]
    fn test_reducer_initial_state() {
        let reducer = counter_bundle().build(0, None).reducer();
        assert_eq!(reduce(&reducer, None, None), 0);
        assert_eq!(reduce(&reducer, None, Some(&PlainAction::new("@@INIT"))), 0);
    }

    #[test]
    fn test_reducer_applies_handler() {
        let descriptor = counter_bundle().build(0, Some(BundleOptions::with_prefix("app")));
        let reducer = descriptor.reducer();
        let actions = descriptor.actions();

        assert_eq!(reduce(&reducer, Some(2), Some(&actions["increment"](Some(1)))), 3);
        assert_eq!(reduce(&reducer, None, Some(&actions["increment"](None))), 1);
        assert_eq!(reduce(&reducer, Some(2), Some(&actions["decrement"](Some(5)))), -3);
    }

    #[test]
    fn test_reducer_keeps_state_for_unknown_type() {
        let reducer = counter_bundle().build(0, None).reducer();
        assert_eq!(reduce(&reducer, Some(7), Some(&PlainAction::new("__unknown__"))), 7);
        assert_eq!(reduce(&reducer, Some(7), None), 7);
    }

    #[test]
    fn test_reducer_is_pure() {
        let reducer = counter_bundle().build(0, None).reducer();
        let action = PlainAction::with_payload("INCREMENT", 3);
        let first = reduce(&reducer, Some(1), Some(&action));
        let second = reduce(&reducer, Some(1), Some(&action));
        assert_eq!(first, second);
        assert_eq!(action, PlainAction::with_payload("INCREMENT", 3));
    }

    #[test]
    fn test_one_bundle_many_prefixes() {
        let bundle = counter_bundle();
        let left = bundle.build(0, Some(BundleOptions::with_prefix("left")));
        let right = bundle.build(10, Some(BundleOptions::with_prefix("right")));

        let action = left.actions()["increment"](None);
        assert_eq!(reduce(&left.reducer(), None, Some(&action)), 1);
        assert_eq!(reduce(&right.reducer(), None, Some(&action)), 10);
    }

    #[test]
    fn test_options_deserialize() {
        let options: BundleOptions = serde_json::from_str(r#"{"typePrefix":"app"}"#).unwrap();
        assert_eq!(options, BundleOptions::with_prefix("app"));

        let options: BundleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.type_prefix, "");
    }
}
