//! Pipeline executor.
//!
//! Runs one call through a [`DispatchPlan`]: before-hooks in registration
//! order, the strategy, then after-hooks in reverse registration order. The
//! first failure aborts the rest of the pipeline and is returned as is.

use crate::plan::DispatchPlan;
use switchboard_core::{Contract, DispatchError, DynWrapper};

/// Execute `plan` with `args`.
///
/// Each wrapper in the plan is instantiated once for this call and serves
/// both of its phases. The strategy is instantiated after the before-hooks
/// have run. After-hooks see the arguments the strategy was called with.
///
/// # Errors
///
/// [`DispatchError::Component`] carrying the error of the first hook or
/// strategy that failed.
pub async fn execute<C: Contract>(
    plan: &DispatchPlan<C>,
    args: C::Args,
) -> Result<C::Output, DispatchError> {
    let operation = plan.operation();
    let wrappers: Vec<Box<dyn DynWrapper<C>>> = plan
        .wrappers()
        .iter()
        .map(|wrapper| wrapper.instantiate())
        .collect();

    let mut args = args;
    if !plan.skip_before() {
        for &index in plan.before_indices() {
            args = wrappers[index].before_dyn(operation, args).await?;
        }
    }

    let strategy = plan.strategy().instantiate();
    let mut output = strategy.call_dyn(operation, &args).await?;

    if !plan.skip_after() {
        for &index in plan.after_indices().iter().rev() {
            output = wrappers[index].after_dyn(operation, &args, output).await?;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{plan::build_plan, registry::Registry};
    use std::sync::Mutex;
    use switchboard_core::{BoxError, Hooks, Operation, Strategy, Wrapper};

    struct Calculator;

    impl Contract for Calculator {
        const NAME: &'static str = "Calculator";
        type Args = i64;
        type Output = i64;
    }

    #[derive(Default)]
    struct Increment;

    impl Strategy<Calculator> for Increment {
        async fn call(&self, _operation: &Operation, args: &i64) -> Result<i64, BoxError> {
            Ok(args + 1)
        }
    }

    #[derive(Default)]
    struct AddTenDouble;

    impl Wrapper<Calculator> for AddTenDouble {
        fn hooks() -> Hooks {
            Hooks::new().around("foo")
        }

        async fn before(&self, _operation: &Operation, args: i64) -> Result<i64, BoxError> {
            Ok(args + 10)
        }

        async fn after(
            &self,
            _operation: &Operation,
            _args: &i64,
            output: i64,
        ) -> Result<i64, BoxError> {
            Ok(output * 2)
        }
    }

    /// Records the argument it saw in `before` and checks it in `after`.
    #[derive(Default)]
    struct SameInstance {
        seen: Mutex<Option<i64>>,
    }

    impl Wrapper<Calculator> for SameInstance {
        fn hooks() -> Hooks {
            Hooks::new().around("foo")
        }

        async fn before(&self, _operation: &Operation, args: i64) -> Result<i64, BoxError> {
            *self.seen.lock().unwrap() = Some(args);
            Ok(args)
        }

        async fn after(
            &self,
            _operation: &Operation,
            _args: &i64,
            output: i64,
        ) -> Result<i64, BoxError> {
            let seen = self.seen.lock().unwrap().take();
            seen.ok_or_else(|| "after-hook ran on a different instance".into())
                .map(|_| output)
        }
    }

    fn plan_for(registry: &Registry) -> DispatchPlan<Calculator> {
        build_plan::<Calculator>(registry, &Operation::from("foo")).unwrap()
    }

    #[tokio::test]
    async fn test_execute_passthrough() {
        let registry = Registry::new();
        registry.register_strategy::<Calculator, Increment>();

        let output = execute(&plan_for(&registry), 5).await.unwrap();
        assert_eq!(output, 6);
    }

    #[tokio::test]
    async fn test_execute_before_strategy_after() {
        let registry = Registry::new();
        registry.register_strategy::<Calculator, Increment>();
        registry.register_wrapper::<Calculator, AddTenDouble>();

        // before: 5 + 10 = 15, strategy: 16, after: 32
        let output = execute(&plan_for(&registry), 5).await.unwrap();
        assert_eq!(output, 32);
    }

    #[tokio::test]
    async fn test_execute_shares_wrapper_instance_between_phases() {
        let registry = Registry::new();
        registry.register_strategy::<Calculator, Increment>();
        registry.register_wrapper::<Calculator, SameInstance>();

        let output = execute(&plan_for(&registry), 1).await.unwrap();
        assert_eq!(output, 2);
    }
}
