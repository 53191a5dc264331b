//! The [`Switchboard`]: registration, resolution and invocation in one place.

use crate::{
    cache::PlanCache,
    config::{InvalidationPolicy, SwitchboardConfig},
    pipeline::execute,
    plan::{DispatchPlan, build_plan},
    registry::Registry,
};
use std::sync::Arc;
use switchboard_core::{Contract, DispatchError, Operation, Strategy, Wrapper};
#[cfg(feature = "tracing")]
use tracing::Instrument;

/// Whether a plan has been resolved for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// No plan cached; the next call builds one.
    Unresolved,
    /// A plan is cached and serves every call.
    Cached,
}

/// Dispatches contract operations to their registered strategy through the
/// registered wrappers.
///
/// Cloning is cheap and clones share the registry and the plan cache, so a
/// switchboard can be handed to every component that registers or invokes.
///
/// # Example
///
/// ```rust,ignore
/// let board = Switchboard::new();
/// board
///     .declare_contract::<Calculator>()
///     .register_strategy::<Calculator, Adder>()
///     .register_wrapper::<Calculator, Audit>();
///
/// let sum = board.invoke::<Calculator>("add", (1, 2)).await?;
/// ```
#[derive(Clone, Debug)]
pub struct Switchboard {
    registry: Arc<Registry>,
    cache: Arc<PlanCache>,
    config: SwitchboardConfig,
}

impl Switchboard {
    /// Create a switchboard with an empty registry and default configuration.
    pub fn new() -> Self {
        Self::with_config(SwitchboardConfig::default())
    }

    /// Create a switchboard with an empty registry and the given configuration.
    pub fn with_config(config: SwitchboardConfig) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            cache: Arc::new(PlanCache::new()),
            config,
        }
    }

    /// Start building a switchboard.
    pub fn builder() -> SwitchboardBuilder {
        SwitchboardBuilder::new()
    }

    /// The underlying registry.
    ///
    /// Writes made directly on the registry bypass the invalidation policy.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The plan cache.
    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    /// The active configuration.
    pub fn config(&self) -> &SwitchboardConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Declare `operation` as dynamically dispatchable for `C`.
    pub fn declare_operation<C: Contract>(&self, operation: impl Into<Operation>) -> &Self {
        self.registry.declare_operation::<C>(operation);
        self
    }

    /// Declare every operation listed in [`Contract::OPERATIONS`].
    pub fn declare_contract<C: Contract>(&self) -> &Self {
        self.registry.declare_contract::<C>();
        self
    }

    /// Make `S` the active strategy for `C`.
    pub fn register_strategy<C: Contract, S: Strategy<C>>(&self) -> &Self {
        self.registry.register_strategy::<C, S>();
        self.registration_changed::<C>();
        self
    }

    /// Append `W` to the wrapper chain of `C`.
    pub fn register_wrapper<C: Contract, W: Wrapper<C>>(&self) -> &Self {
        self.registry.register_wrapper::<C, W>();
        self.registration_changed::<C>();
        self
    }

    /// Drop the strategy and wrappers of `C`, keeping declared operations.
    pub fn reset<C: Contract>(&self) -> &Self {
        self.registry.reset::<C>();
        self.registration_changed::<C>();
        self
    }

    // Called after the registry write lock is released: a plan build holds its
    // cache entry while reading the registry, so the two locks are never
    // taken in the opposite order.
    fn registration_changed<C: Contract>(&self) {
        if self.config.invalidation == InvalidationPolicy::OnRegistration {
            self.cache.invalidate::<C>(None);
        }
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolve the plan for `operation` on `C`, building it on first use.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownOperation`] if `operation` is not declared
    ///   for `C`, whether or not the strategy could run it.
    /// - [`DispatchError::NotConfigured`] if `C` has no strategy.
    pub fn resolve<C: Contract>(
        &self,
        operation: impl Into<Operation>,
    ) -> Result<Arc<DispatchPlan<C>>, DispatchError> {
        self.resolve_operation::<C>(&operation.into())
    }

    fn resolve_operation<C: Contract>(
        &self,
        operation: &Operation,
    ) -> Result<Arc<DispatchPlan<C>>, DispatchError> {
        if !self.registry.is_declared::<C>(operation.as_str()) {
            return Err(DispatchError::UnknownOperation {
                contract: C::NAME,
                operation: operation.clone(),
            });
        }
        self.cache
            .get_or_try_insert_with(operation, || build_plan::<C>(&self.registry, operation))
    }

    /// Resolve every declared operation of `C` up front.
    ///
    /// Returns the number of plans now cached for `C`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotConfigured`] if `C` has no strategy.
    pub fn prepare<C: Contract>(&self) -> Result<usize, DispatchError> {
        let operations = self.registry.operations::<C>();
        for operation in &operations {
            self.resolve_operation::<C>(operation)?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(contract = C::NAME, plans = operations.len(), "prepared dispatch plans");
        Ok(operations.len())
    }

    /// Drop cached plans of `C`: one operation, or all of them with `None`.
    ///
    /// Returns how many plans were removed.
    pub fn invalidate<C: Contract>(&self, operation: Option<&str>) -> usize {
        self.cache.invalidate::<C>(operation)
    }

    /// Whether a plan is cached for `operation` on `C`.
    pub fn plan_state<C: Contract>(&self, operation: &str) -> PlanState {
        if self.cache.is_cached::<C>(operation) {
            PlanState::Cached
        } else {
            PlanState::Unresolved
        }
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    /// Invoke `operation` on `C` with `args`.
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`resolve`](Self::resolve), or the error of the
    /// first hook or strategy that failed.
    pub async fn invoke<C: Contract>(
        &self,
        operation: impl Into<Operation> + Send,
        args: C::Args,
    ) -> Result<C::Output, DispatchError> {
        let operation = operation.into();
        let plan = self.resolve_operation::<C>(&operation)?;

        #[cfg(feature = "tracing")]
        let pipeline = {
            let span = if self.config.instrument {
                tracing::debug_span!("invoke", contract = C::NAME, %operation)
            } else {
                tracing::Span::none()
            };
            execute(&plan, args).instrument(span)
        };
        #[cfg(not(feature = "tracing"))]
        let pipeline = execute(&plan, args);

        pipeline.await
    }

    /// Invoke `operation` on `C`, driving the pipeline on the current thread.
    ///
    /// Must not be called from within an async runtime's worker thread if any
    /// hook or strategy relies on that runtime.
    ///
    /// # Errors
    ///
    /// As for [`invoke`](Self::invoke).
    pub fn invoke_blocking<C: Contract>(
        &self,
        operation: impl Into<Operation> + Send,
        args: C::Args,
    ) -> Result<C::Output, DispatchError> {
        futures::executor::block_on(self.invoke::<C>(operation, args))
    }
}

impl Default for Switchboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Switchboard`].
///
/// # Example
/// ```ignore
/// let board = Switchboard::builder()
///     .invalidation(InvalidationPolicy::Manual)
///     .instrument(false)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SwitchboardBuilder {
    config: SwitchboardConfig,
    registry: Option<Arc<Registry>>,
}

impl SwitchboardBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache invalidation policy.
    pub fn invalidation(mut self, policy: InvalidationPolicy) -> Self {
        self.config.invalidation = policy;
        self
    }

    /// Enable or disable the per-invocation tracing span.
    pub fn instrument(mut self, instrument: bool) -> Self {
        self.config.instrument = instrument;
        self
    }

    /// Use an existing registry.
    ///
    /// The switchboard still gets its own cache; registrations made through
    /// another switchboard sharing this registry do not invalidate it.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SwitchboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the switchboard.
    pub fn build(self) -> Switchboard {
        Switchboard {
            registry: self.registry.unwrap_or_default(),
            cache: Arc::new(PlanCache::new()),
            config: self.config,
        }
    }
}
