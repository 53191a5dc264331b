//! # Strategies
//!
//! A strategy is the concrete implementation a contract's operations resolve
//! to. Strategies are registered as *types*: the framework builds a fresh
//! instance through [`Default`] for every invocation, so no instance state
//! survives between calls.

use crate::{
    contract::{Contract, Operation},
    error::BoxError,
};
use std::{
    any::{TypeId, type_name},
    fmt,
    future::Future,
    pin::Pin,
};

/// A boxed, sendable future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The concrete implementation behind a contract.
///
/// `call` receives the operation name and the arguments as left by the
/// before-hooks. Operations the strategy does not provide should fail with
/// [`UnsupportedOperation`](crate::UnsupportedOperation).
///
/// This trait uses native `async fn` for static dispatch; the registry stores
/// strategies through [`DynStrategy`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a strategy for `{C}`",
    label = "missing `Strategy<{C}>` implementation",
    note = "Strategies must implement `call` for the contract `{C}` and be `Default`."
)]
pub trait Strategy<C: Contract>: Default + Send + Sync + 'static {
    /// Run `operation` with the given arguments.
    fn call(
        &self,
        operation: &Operation,
        args: &C::Args,
    ) -> impl Future<Output = Result<C::Output, BoxError>> + Send;
}

/// Object-safe version of [`Strategy`].
pub trait DynStrategy<C: Contract>: Send + Sync + 'static {
    /// Run `operation` (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: &'a C::Args,
    ) -> BoxFuture<'a, Result<C::Output, BoxError>>;
}

// Blanket implementation: every Strategy is usable as a DynStrategy.
impl<C: Contract, S: Strategy<C>> DynStrategy<C> for S {
    fn call_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: &'a C::Args,
    ) -> BoxFuture<'a, Result<C::Output, BoxError>> {
        Box::pin(self.call(operation, args))
    }
}

/// A registered strategy type.
///
/// This is what the registry stores in place of an instance: the type's
/// identity plus a constructor used to build one instance per call.
pub struct StrategyType<C: Contract> {
    name: &'static str,
    type_id: TypeId,
    construct: fn() -> Box<dyn DynStrategy<C>>,
}

fn construct<C: Contract, S: Strategy<C>>() -> Box<dyn DynStrategy<C>> {
    Box::new(S::default())
}

impl<C: Contract> StrategyType<C> {
    /// Describe the strategy type `S`.
    pub fn of<S: Strategy<C>>() -> Self {
        Self {
            name: type_name::<S>(),
            type_id: TypeId::of::<S>(),
            construct: construct::<C, S>,
        }
    }

    /// Type name of the strategy.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this describes the strategy type `S`.
    pub fn is<S: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<S>()
    }

    /// Build a fresh instance.
    pub fn instantiate(&self) -> Box<dyn DynStrategy<C>> {
        (self.construct)()
    }
}

impl<C: Contract> Clone for StrategyType<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Contract> Copy for StrategyType<C> {}

impl<C: Contract> PartialEq for StrategyType<C> {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl<C: Contract> Eq for StrategyType<C> {}

impl<C: Contract> fmt::Debug for StrategyType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StrategyType").field(&self.name).finish()
    }
}
