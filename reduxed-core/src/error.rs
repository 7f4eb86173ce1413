//! Error types

use thiserror::Error;

/// Errors raised while scoping a target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The target is neither a reducer nor a map of action creators
    #[error("invalid scope target: expected a reducer or a map of action creators")]
    InvalidScopeTarget,
}

/// Errors raised by strict bundle construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    /// Two handler names derive the same action type
    #[error("handlers `{first}` and `{second}` both map to action type `{action_type}`")]
    DuplicateActionType {
        action_type: String,
        first: String,
        second: String,
    },
}
