//! Core naming, bundle and scope primitives for reduxed
//!
//! This crate turns a list of named update handlers into everything a
//! Redux-style store needs, following a unidirectional state-update
//! architecture. It never holds state itself: the host store calls the
//! produced reducer with `(state, action)` and keeps the result.
//!
//! # Core Concepts
//!
//! - **Handler**: a named pure transition `(state, payload) -> state`
//! - **Bundle**: an ordered list of handlers, built into a **Descriptor**
//! - **Action types**: `PREFIX/UPPER_SNAKE_NAME`, derived from handler names
//! - **Action creators**: `payload -> { type, payload }`, one per handler
//! - **Reducer**: dispatches an action to the handler registered for its type
//! - **Scope**: a marker that lets several instances of one bundle share an
//!   action stream without cross-talk
//!
//! # Basic Example
//!
//! ```
//! use reduxed_core::prelude::*;
//!
//! let counter = Bundle::of([
//!     handler("increment", |s: i64, by: Option<&i64>| s + by.copied().unwrap_or(1)),
//!     handler("decrement", |s: i64, by: Option<&i64>| s - by.copied().unwrap_or(1)),
//! ])
//! .build(0, Some(BundleOptions::with_prefix("app")));
//!
//! let types = counter.types();
//! let actions = counter.actions();
//! let reducer = counter.reducer();
//!
//! assert_eq!(types["increment"], "app/INCREMENT");
//! assert_eq!(actions["increment"](Some(2)), PlainAction::with_payload("app/INCREMENT", 2));
//! assert_eq!(reducer.reduce(None, None::<&PlainAction<i64>>), 0);
//! assert_eq!(reducer.reduce(Some(2), Some(&actions["increment"](Some(1)))), 3);
//! ```
//!
//! # Scoped Instances
//!
//! Two counters built from the same bundle live side by side when each gets
//! its own scope:
//!
//! ```
//! use reduxed_core::prelude::*;
//!
//! let counter = Bundle::of([handler("increment", |s: i64, _: Option<&i64>| s + 1)]).build(0, None);
//!
//! let left = action_scope("left", &counter.actions());
//! let left_reducer = reducer_scope::<_, ScopedAction<i64>, _>("left", counter.reducer());
//! let right_reducer = reducer_scope::<_, ScopedAction<i64>, _>("right", counter.reducer());
//!
//! let action = left["increment"](None);
//! assert_eq!(left_reducer.reduce(Some(0), Some(&action)), 1);
//! assert_eq!(right_reducer.reduce(Some(0), Some(&action)), 0);
//! ```

pub mod action;
pub mod bundle;
pub mod error;
pub mod map;
pub mod naming;
pub mod reducer;
pub mod scope;
pub mod testing;

// Action exports
pub use action::{Action, PlainAction, Scope, ScopedAction, SCOPE_PROPERTY};

// Bundle exports
pub use bundle::{
    create, get_actions, get_reducer, get_types, handler, ActionCreator, ActionCreators,
    ActionTypes, Bundle, BundleOptions, BundleReducer, Descriptor, Handler, HandlerFn,
};
pub use map::NamedMap;
pub use naming::{action_type, to_snake_case};
pub use reducer::{share, Reducer, SharedReducer};

// Scope exports
pub use scope::{
    action_scope, reducer_scope, try_with_scope, with_scope, ScopeBinder, ScopeTarget,
    ScopedReducer, WithScope,
};

// Error exports
pub use error::{BundleError, ScopeError};

// Testing exports
pub use testing::{same_action, TestHarness};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, PlainAction, Scope, ScopedAction};
    pub use crate::bundle::{
        create, get_actions, get_reducer, get_types, handler, ActionCreators, ActionTypes,
        Bundle, BundleOptions, Descriptor, Handler,
    };
    pub use crate::error::{BundleError, ScopeError};
    pub use crate::naming::action_type;
    pub use crate::reducer::{Reducer, SharedReducer};
    pub use crate::scope::{
        action_scope, reducer_scope, with_scope, ScopeBinder, ScopeTarget, ScopedReducer,
        WithScope,
    };
}
