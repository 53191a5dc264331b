//! Testing utilities for Switchboard.
//!
//! Small strategies and wrappers for exercising dispatch setups without
//! writing bespoke implementations.
//!
//! - [`EchoStrategy`]: returns its arguments
//! - [`FailingStrategy`] / [`FailingWrapper`]: fail with [`InjectedFailure`]
//! - [`PassthroughWrapper`]: hooks everything, changes nothing

use switchboard_core::{BoxError, Contract, Hooks, Operation, Strategy, Wrapper};
use thiserror::Error;

/// The error raised by the failing test components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("injected failure in {stage}")]
pub struct InjectedFailure {
    /// Which component failed: `"strategy"`, `"before"` or `"after"`.
    pub stage: &'static str,
}

// ============================================================================
// Strategies
// ============================================================================

/// A strategy that returns a clone of its arguments for every operation.
///
/// Only applies to contracts whose output type equals their argument type.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoStrategy;

impl<C, T> Strategy<C> for EchoStrategy
where
    C: Contract<Args = T, Output = T>,
    T: Clone + Send + Sync + 'static,
{
    async fn call(&self, _operation: &Operation, args: &C::Args) -> Result<C::Output, BoxError> {
        Ok(args.clone())
    }
}

/// A strategy that fails every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStrategy;

impl<C: Contract> Strategy<C> for FailingStrategy {
    async fn call(&self, _operation: &Operation, _args: &C::Args) -> Result<C::Output, BoxError> {
        Err(InjectedFailure { stage: "strategy" }.into())
    }
}

// ============================================================================
// Wrappers
// ============================================================================

/// A wrapper whose before-hook fails for every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingWrapper;

impl<C: Contract> Wrapper<C> for FailingWrapper {
    fn hooks() -> Hooks {
        Hooks::all()
    }

    async fn before(&self, _operation: &Operation, _args: C::Args) -> Result<C::Args, BoxError> {
        Err(InjectedFailure { stage: "before" }.into())
    }
}

/// A wrapper that hooks every operation and leaves everything untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughWrapper;

impl<C: Contract> Wrapper<C> for PassthroughWrapper {
    fn hooks() -> Hooks {
        Hooks::all()
    }
}
