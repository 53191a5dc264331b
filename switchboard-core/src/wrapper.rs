//! # Wrappers
//!
//! Wrappers are interceptors registered against a contract in an ordered
//! list. For every operation a wrapper may contribute a before-hook, an
//! after-hook, both, or neither; which ones it contributes is declared up
//! front through [`Wrapper::hooks`], so dispatch plans can be partitioned
//! without building an instance.
//!
//! # Ordering
//!
//! Before-hooks run in registration order, each receiving the previous
//! hook's arguments. After-hooks run in reverse registration order, each
//! receiving the arguments the strategy was called with and the previous
//! hook's output.

use crate::{
    contract::{Contract, Operation},
    error::BoxError,
    strategy::BoxFuture,
};
use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    fmt,
    future::Future,
    sync::Arc,
};

bitflags::bitflags! {
    /// The pipeline phases a wrapper can hook into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Phase: u8 {
        /// Runs before the strategy and may rewrite the arguments.
        const BEFORE = 0b01;
        /// Runs after the strategy and may rewrite the output.
        const AFTER = 0b10;
    }
}

/// Declares which operations a wrapper intercepts, and in which phases.
///
/// # Example
///
/// ```rust,ignore
/// fn hooks() -> Hooks {
///     Hooks::new().before("quote").around("discount")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Hooks {
    every: Phase,
    operations: HashMap<Operation, Phase>,
}

impl Hooks {
    /// No hooks at all.
    pub fn new() -> Self {
        Self {
            every: Phase::empty(),
            operations: HashMap::new(),
        }
    }

    /// Before- and after-hooks for every operation.
    pub fn all() -> Self {
        Self::new().every(Phase::all())
    }

    /// Hook `phase` for every operation of the contract.
    pub fn every(mut self, phase: Phase) -> Self {
        self.every |= phase;
        self
    }

    /// Hook `phase` for one operation.
    pub fn on(mut self, operation: impl Into<Operation>, phase: Phase) -> Self {
        *self
            .operations
            .entry(operation.into())
            .or_insert(Phase::empty()) |= phase;
        self
    }

    /// Add a before-hook for `operation`.
    pub fn before(self, operation: impl Into<Operation>) -> Self {
        self.on(operation, Phase::BEFORE)
    }

    /// Add an after-hook for `operation`.
    pub fn after(self, operation: impl Into<Operation>) -> Self {
        self.on(operation, Phase::AFTER)
    }

    /// Add both hooks for `operation`.
    pub fn around(self, operation: impl Into<Operation>) -> Self {
        self.on(operation, Phase::all())
    }

    /// The phases hooked for `operation`.
    pub fn phases(&self, operation: &str) -> Phase {
        self.every
            | self
                .operations
                .get(operation)
                .copied()
                .unwrap_or(Phase::empty())
    }

    /// Whether `operation` is hooked in `phase`.
    pub fn intercepts(&self, operation: &str, phase: Phase) -> bool {
        self.phases(operation).contains(phase)
    }

    /// Whether nothing is hooked.
    pub fn is_empty(&self) -> bool {
        self.every.is_empty() && self.operations.values().all(|phase| phase.is_empty())
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

/// An interceptor around a contract's operations.
///
/// Like strategies, wrappers are registered as types. For each invocation the
/// framework builds one instance of every wrapper that hooks the operation and
/// uses that same instance for both phases, so state recorded in `before`
/// (a start time, a span) is visible in `after`.
///
/// Both hooks default to passing their input through unchanged; only the
/// phases declared in [`hooks`](Wrapper::hooks) are ever called.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a wrapper for `{C}`",
    label = "missing `Wrapper<{C}>` implementation",
    note = "Wrappers must declare their `hooks` for the contract `{C}` and be `Default`."
)]
pub trait Wrapper<C: Contract>: Default + Send + Sync + 'static {
    /// The operations and phases this wrapper intercepts.
    fn hooks() -> Hooks;

    /// Transform the arguments before the strategy runs.
    fn before(
        &self,
        operation: &Operation,
        args: C::Args,
    ) -> impl Future<Output = Result<C::Args, BoxError>> + Send {
        let _ = operation;
        async move { Ok(args) }
    }

    /// Transform the output after the strategy ran.
    fn after(
        &self,
        operation: &Operation,
        args: &C::Args,
        output: C::Output,
    ) -> impl Future<Output = Result<C::Output, BoxError>> + Send {
        let _ = (operation, args);
        async move { Ok(output) }
    }
}

/// Object-safe version of [`Wrapper`].
pub trait DynWrapper<C: Contract>: Send + Sync + 'static {
    /// Before-hook (dynamic dispatch version).
    fn before_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: C::Args,
    ) -> BoxFuture<'a, Result<C::Args, BoxError>>;

    /// After-hook (dynamic dispatch version).
    fn after_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: &'a C::Args,
        output: C::Output,
    ) -> BoxFuture<'a, Result<C::Output, BoxError>>;
}

impl<C: Contract, W: Wrapper<C>> DynWrapper<C> for W {
    fn before_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: C::Args,
    ) -> BoxFuture<'a, Result<C::Args, BoxError>> {
        Box::pin(self.before(operation, args))
    }

    fn after_dyn<'a>(
        &'a self,
        operation: &'a Operation,
        args: &'a C::Args,
        output: C::Output,
    ) -> BoxFuture<'a, Result<C::Output, BoxError>> {
        Box::pin(self.after(operation, args, output))
    }
}

/// A registered wrapper type.
///
/// Captures the wrapper's declared [`Hooks`] once, at registration, together
/// with a constructor for per-call instances.
pub struct WrapperType<C: Contract> {
    name: &'static str,
    type_id: TypeId,
    hooks: Arc<Hooks>,
    construct: fn() -> Box<dyn DynWrapper<C>>,
}

fn construct<C: Contract, W: Wrapper<C>>() -> Box<dyn DynWrapper<C>> {
    Box::new(W::default())
}

impl<C: Contract> WrapperType<C> {
    /// Describe the wrapper type `W`.
    pub fn of<W: Wrapper<C>>() -> Self {
        Self {
            name: type_name::<W>(),
            type_id: TypeId::of::<W>(),
            hooks: Arc::new(W::hooks()),
            construct: construct::<C, W>,
        }
    }

    /// Type name of the wrapper.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this describes the wrapper type `W`.
    pub fn is<W: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<W>()
    }

    /// The hooks the wrapper declared.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Build a fresh instance.
    pub fn instantiate(&self) -> Box<dyn DynWrapper<C>> {
        (self.construct)()
    }
}

impl<C: Contract> Clone for WrapperType<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            type_id: self.type_id,
            hooks: Arc::clone(&self.hooks),
            construct: self.construct,
        }
    }
}

impl<C: Contract> fmt::Debug for WrapperType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperType")
            .field("name", &self.name)
            .field("hooks", &self.hooks)
            .finish()
    }
}
