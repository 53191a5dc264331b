//! Dispatch plans.
//!
//! A [`DispatchPlan`] is the resolved form of one `(contract, operation)`
//! pair: the active strategy plus the wrappers that hook the operation,
//! partitioned by phase. Plans are immutable; a changed registration is
//! picked up by building a new plan, never by editing an old one.

use crate::registry::Registry;
use std::fmt;
use switchboard_core::{Contract, DispatchError, Operation, Phase, StrategyType, WrapperType};

/// The resolved strategy and applicable wrappers for one operation.
pub struct DispatchPlan<C: Contract> {
    operation: Operation,
    strategy: StrategyType<C>,
    /// Wrappers hooking this operation in at least one phase, in registration order.
    wrappers: Vec<WrapperType<C>>,
    /// Indices into `wrappers`, registration order.
    before: Vec<usize>,
    /// Indices into `wrappers`, registration order. The executor walks these in reverse.
    after: Vec<usize>,
    skip_before: bool,
    skip_after: bool,
}

impl<C: Contract> DispatchPlan<C> {
    /// Name of the contract this plan belongs to.
    pub fn contract(&self) -> &'static str {
        C::NAME
    }

    /// The operation this plan dispatches.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The strategy resolved when the plan was built.
    pub fn strategy(&self) -> &StrategyType<C> {
        &self.strategy
    }

    /// Every wrapper instantiated per call, in registration order.
    pub fn wrappers(&self) -> &[WrapperType<C>] {
        &self.wrappers
    }

    /// Wrappers with a before-hook for this operation, in registration order.
    pub fn before_wrappers(&self) -> impl Iterator<Item = &WrapperType<C>> {
        self.before.iter().map(|&index| &self.wrappers[index])
    }

    /// Wrappers with an after-hook for this operation, in registration order.
    pub fn after_wrappers(&self) -> impl Iterator<Item = &WrapperType<C>> {
        self.after.iter().map(|&index| &self.wrappers[index])
    }

    /// No before-hook applies; arguments reach the strategy untouched.
    pub fn skip_before(&self) -> bool {
        self.skip_before
    }

    /// No after-hook applies; the strategy's output is returned untouched.
    pub fn skip_after(&self) -> bool {
        self.skip_after
    }

    /// Neither phase has work: the plan is a bare strategy call.
    pub fn is_passthrough(&self) -> bool {
        self.skip_before && self.skip_after
    }

    pub(crate) fn before_indices(&self) -> &[usize] {
        &self.before
    }

    pub(crate) fn after_indices(&self) -> &[usize] {
        &self.after
    }
}

impl<C: Contract> fmt::Debug for DispatchPlan<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPlan")
            .field("contract", &C::NAME)
            .field("operation", &self.operation)
            .field("strategy", &self.strategy.name())
            .field(
                "before",
                &self.before_wrappers().map(WrapperType::name).collect::<Vec<_>>(),
            )
            .field(
                "after",
                &self.after_wrappers().map(WrapperType::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Build the plan for `operation` on `C` from the current registry state.
///
/// Reads the registry and nothing else. Whether `operation` is declared is
/// the caller's concern.
///
/// # Errors
///
/// [`DispatchError::NotConfigured`] if `C` has no active strategy.
pub fn build_plan<C: Contract>(
    registry: &Registry,
    operation: &Operation,
) -> Result<DispatchPlan<C>, DispatchError> {
    let (strategy, registered) = registry.snapshot::<C>()?;

    let mut wrappers = Vec::new();
    let mut before = Vec::new();
    let mut after = Vec::new();

    for wrapper in registered {
        let phases = wrapper.hooks().phases(operation.as_str());
        if phases.is_empty() {
            continue;
        }
        let index = wrappers.len();
        if phases.contains(Phase::BEFORE) {
            before.push(index);
        }
        if phases.contains(Phase::AFTER) {
            after.push(index);
        }
        wrappers.push(wrapper);
    }

    let plan = DispatchPlan {
        operation: operation.clone(),
        strategy,
        skip_before: before.is_empty(),
        skip_after: after.is_empty(),
        wrappers,
        before,
        after,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        contract = C::NAME,
        operation = %plan.operation,
        strategy = plan.strategy.name(),
        before = plan.before.len(),
        after = plan.after.len(),
        "built dispatch plan"
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::{BoxError, Hooks, Strategy, Wrapper};

    struct Inventory;

    impl Contract for Inventory {
        const NAME: &'static str = "Inventory";
        type Args = String;
        type Output = usize;
    }

    #[derive(Default)]
    struct Warehouse;

    impl Strategy<Inventory> for Warehouse {
        async fn call(&self, _operation: &Operation, args: &String) -> Result<usize, BoxError> {
            Ok(args.len())
        }
    }

    #[derive(Default)]
    struct Normalize;

    impl Wrapper<Inventory> for Normalize {
        fn hooks() -> Hooks {
            Hooks::new().before("count")
        }
    }

    #[derive(Default)]
    struct Clamp;

    impl Wrapper<Inventory> for Clamp {
        fn hooks() -> Hooks {
            Hooks::new().after("count")
        }
    }

    #[derive(Default)]
    struct Trace;

    impl Wrapper<Inventory> for Trace {
        fn hooks() -> Hooks {
            Hooks::all()
        }
    }

    #[derive(Default)]
    struct Unrelated;

    impl Wrapper<Inventory> for Unrelated {
        fn hooks() -> Hooks {
            Hooks::new().around("restock")
        }
    }

    #[test]
    fn test_build_plan_requires_strategy() {
        let registry = Registry::new();
        registry.register_wrapper::<Inventory, Normalize>();

        let err = build_plan::<Inventory>(&registry, &Operation::from("count")).unwrap_err();
        assert!(err.is_not_configured());
    }

    #[test]
    fn test_build_plan_without_wrappers_is_passthrough() {
        let registry = Registry::new();
        registry.register_strategy::<Inventory, Warehouse>();

        let plan = build_plan::<Inventory>(&registry, &Operation::from("count")).unwrap();

        assert!(plan.strategy().is::<Warehouse>());
        assert!(plan.is_passthrough());
        assert!(plan.wrappers().is_empty());
        assert_eq!(plan.contract(), "Inventory");
    }

    #[test]
    fn test_build_plan_partitions_by_phase() {
        let registry = Registry::new();
        registry.register_strategy::<Inventory, Warehouse>();
        registry.register_wrapper::<Inventory, Normalize>();
        registry.register_wrapper::<Inventory, Unrelated>();
        registry.register_wrapper::<Inventory, Clamp>();
        registry.register_wrapper::<Inventory, Trace>();

        let plan = build_plan::<Inventory>(&registry, &Operation::from("count")).unwrap();

        let before: Vec<_> = plan.before_wrappers().map(WrapperType::name).collect();
        let after: Vec<_> = plan.after_wrappers().map(WrapperType::name).collect();
        assert_eq!(
            before,
            vec![
                std::any::type_name::<Normalize>(),
                std::any::type_name::<Trace>()
            ]
        );
        assert_eq!(
            after,
            vec![std::any::type_name::<Clamp>(), std::any::type_name::<Trace>()]
        );
        assert_eq!(plan.wrappers().len(), 3);
        assert!(!plan.skip_before());
        assert!(!plan.skip_after());
    }

    #[test]
    fn test_build_plan_skips_phase_without_hooks() {
        let registry = Registry::new();
        registry.register_strategy::<Inventory, Warehouse>();
        registry.register_wrapper::<Inventory, Normalize>();

        let plan = build_plan::<Inventory>(&registry, &Operation::from("count")).unwrap();
        assert!(!plan.skip_before());
        assert!(plan.skip_after());

        let plan = build_plan::<Inventory>(&registry, &Operation::from("restock")).unwrap();
        assert!(plan.is_passthrough());
    }
}
