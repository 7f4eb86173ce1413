//! reduxed: reducer and action-creator bundles for Redux-style stores
//!
//! Name your update handlers once; get action types, action creators and a
//! dispatching reducer for free. Scopes let several instances of the same
//! bundle share one state tree and one action stream.
//!
//! # Example
//! ```
//! use reduxed::prelude::*;
//!
//! let todos = Bundle::<Vec<String>, String>::new()
//!     .handler("addTodo", |mut todos, text: Option<&String>| {
//!         todos.extend(text.cloned());
//!         todos
//!     })
//!     .handler("clearTodos", |_, _| Vec::new())
//!     .build(Vec::new(), Some(BundleOptions::with_prefix("todos")));
//!
//! assert_eq!(todos.types()["addTodo"], "todos/ADD_TODO");
//!
//! let actions = todos.actions();
//! let add = &actions["addTodo"];
//! let state = todos.reducer().reduce(None, Some(&add(Some("write docs".into()))));
//! assert_eq!(state, vec!["write docs".to_string()]);
//! ```

// Re-export everything from core
pub use reduxed_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Actions
    pub use reduxed_core::{Action, PlainAction, Scope, ScopedAction};

    // Bundles
    pub use reduxed_core::{
        create, get_actions, get_reducer, get_types, handler, ActionCreators, ActionTypes, Bundle,
        BundleOptions, Descriptor, Handler,
    };

    // Naming
    pub use reduxed_core::{action_type, to_snake_case};

    // Reducers and scopes
    pub use reduxed_core::{
        action_scope, reducer_scope, with_scope, Reducer, ScopeBinder, ScopeTarget,
        ScopedReducer, SharedReducer, WithScope,
    };

    // Errors
    pub use reduxed_core::{BundleError, ScopeError};
}
