//! Error types for Switchboard.
//!
//! - [`DispatchError`] - Everything an invocation can fail with
//! - [`UnsupportedOperation`] - Raised by strategies for operations they lack

use crate::contract::Operation;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by resolving or invoking a delegated operation.
///
/// Only the first two variants are produced by the framework itself. Failures
/// raised by a hook or a strategy abort the pipeline and are carried through
/// [`DispatchError::Component`] untouched.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The operation was never declared for the contract.
    #[error("operation `{operation}` is not declared for contract `{contract}`")]
    UnknownOperation {
        /// Name of the contract.
        contract: &'static str,
        /// The requested operation.
        operation: Operation,
    },

    /// The operation is declared but the contract has no active strategy.
    #[error("no strategy registered for contract `{contract}`")]
    NotConfigured {
        /// Name of the contract.
        contract: &'static str,
    },

    /// A before-hook, the strategy or an after-hook failed.
    #[error(transparent)]
    Component(#[from] BoxError),
}

impl DispatchError {
    /// Whether this is an [`UnknownOperation`](DispatchError::UnknownOperation) error.
    pub fn is_unknown_operation(&self) -> bool {
        matches!(self, Self::UnknownOperation { .. })
    }

    /// Whether this is a [`NotConfigured`](DispatchError::NotConfigured) error.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }

    /// The error raised by a hook or strategy, if that is what failed.
    pub fn component(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Component(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Take the hook or strategy error out, if that is what failed.
    pub fn into_component(self) -> Option<BoxError> {
        match self {
            Self::Component(err) => Some(err),
            _ => None,
        }
    }
}

/// Returned by a strategy asked to run an operation it does not implement.
///
/// The registry never checks that a strategy covers every declared operation,
/// so this only shows up when such an operation is actually invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("strategy `{strategy}` does not implement operation `{operation}`")]
pub struct UnsupportedOperation {
    strategy: &'static str,
    operation: Operation,
}

impl UnsupportedOperation {
    /// Create a new error for the given strategy type name and operation.
    pub fn new(strategy: &'static str, operation: impl Into<Operation>) -> Self {
        Self {
            strategy,
            operation: operation.into(),
        }
    }

    /// Type name of the strategy that was asked.
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// The operation it lacks.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}
