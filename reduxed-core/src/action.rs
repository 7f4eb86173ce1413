//! Action types dispatched to reducers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug};

/// Key a scope is read from when a scoped action is deserialized
pub const SCOPE_PROPERTY: &str = "reduxed-scope";

/// An action that can be fed to a reducer
///
/// Actions are data records describing a state transition request. They
/// should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple reducers
/// - Debug: For debugging and logging
/// - Send + 'static: For dispatch across threads
pub trait Action: Clone + Debug + Send + 'static {
    /// Payload carried by the action
    type Payload: Clone + Debug + Send + 'static;

    /// The dispatchable action type, e.g. `app/INCREMENT`
    fn action_type(&self) -> &str;

    /// The payload, `None` when the action creator was called without one
    fn payload(&self) -> Option<&Self::Payload>;

    /// The scope marker, if any
    fn scope(&self) -> Option<&Scope> {
        None
    }
}

/// Opaque marker separating instances of the same bundle
///
/// Scopes are only ever compared for equality.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Create a scope from any string-like value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The scope as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({:?})", self.0)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Scope {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Scope {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A `{ type, payload }` action, as produced by bundle action creators
///
/// # Example
/// ```
/// use reduxed_core::PlainAction;
///
/// let action = PlainAction::with_payload("app/INCREMENT", 2);
/// assert_eq!(action.action_type, "app/INCREMENT");
/// assert_eq!(action.payload, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainAction<P = Value> {
    /// Action type
    #[serde(rename = "type")]
    pub action_type: String,
    /// Payload, if the creator was given one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
}

impl<P> PlainAction<P> {
    /// Create an action without payload
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
        }
    }

    /// Create an action carrying a payload
    pub fn with_payload(action_type: impl Into<String>, payload: P) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Some(payload),
        }
    }
}

impl<P> Action for PlainAction<P>
where
    P: Clone + Debug + Send + 'static,
{
    type Payload = P;

    fn action_type(&self) -> &str {
        &self.action_type
    }

    fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

/// An action tagged with the scope of the instance it targets
///
/// The scope is hidden metadata. Equality looks at type and payload only,
/// whether the other side is a [`PlainAction`] or another `ScopedAction`,
/// and serializing skips it. Deserialization still reads it back from
/// [`SCOPE_PROPERTY`] when present.
///
/// ```
/// use reduxed_core::{Action, PlainAction, ScopedAction};
///
/// let scoped = ScopedAction::<i32>::new("INCREMENT", None, "counter-1");
/// assert_eq!(scoped, PlainAction::new("INCREMENT"));
/// assert_eq!(scoped.scope().map(|s| s.as_str()), Some("counter-1"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedAction<P = Value> {
    /// Action type
    #[serde(rename = "type")]
    pub action_type: String,
    /// Payload, if the creator was given one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
    /// Scope marker, `None` for actions that were never scoped
    #[serde(rename = "reduxed-scope", default, skip_serializing)]
    scope: Option<Scope>,
}

impl<P> ScopedAction<P> {
    /// Create an action carrying a scope
    pub fn new(action_type: impl Into<String>, payload: Option<P>, scope: impl Into<Scope>) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
            scope: Some(scope.into()),
        }
    }

    /// Tag any action with a scope
    pub fn tag<A>(action: A, scope: Scope) -> Self
    where
        P: Clone,
        A: Action<Payload = P>,
    {
        Self {
            action_type: action.action_type().to_owned(),
            payload: action.payload().cloned(),
            scope: Some(scope),
        }
    }

    /// Drop the scope, keeping type and payload
    pub fn into_plain(self) -> PlainAction<P> {
        PlainAction {
            action_type: self.action_type,
            payload: self.payload,
        }
    }
}

impl<P> From<PlainAction<P>> for ScopedAction<P> {
    fn from(action: PlainAction<P>) -> Self {
        Self {
            action_type: action.action_type,
            payload: action.payload,
            scope: None,
        }
    }
}

impl<P> Action for ScopedAction<P>
where
    P: Clone + Debug + Send + 'static,
{
    type Payload = P;

    fn action_type(&self) -> &str {
        &self.action_type
    }

    fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }
}

impl<P: PartialEq> PartialEq for ScopedAction<P> {
    fn eq(&self, other: &Self) -> bool {
        self.action_type == other.action_type && self.payload == other.payload
    }
}

impl<P: PartialEq> PartialEq<PlainAction<P>> for ScopedAction<P> {
    fn eq(&self, other: &PlainAction<P>) -> bool {
        self.action_type == other.action_type && self.payload == other.payload
    }
}

impl<P: PartialEq> PartialEq<ScopedAction<P>> for PlainAction<P> {
    fn eq(&self, other: &ScopedAction<P>) -> bool {
        other == self
    }
}
