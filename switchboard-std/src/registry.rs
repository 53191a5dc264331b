//! Registry of contracts, their declared operations, strategies and wrappers.
//!
//! The registry is a plain object: build one, share it behind an `Arc`, and
//! pass it to whatever needs to register or resolve. Reads (every plan build)
//! take a shared lock; registrations take the exclusive lock only for the
//! duration of the write.

use parking_lot::RwLock;
use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
};
use switchboard_core::{
    Contract, DispatchError, Operation, Strategy, StrategyType, Wrapper, WrapperType,
};

/// Everything registered for one contract.
struct Registration<C: Contract> {
    operations: HashSet<Operation>,
    strategy: Option<StrategyType<C>>,
    wrappers: Vec<WrapperType<C>>,
}

impl<C: Contract> Default for Registration<C> {
    fn default() -> Self {
        Self {
            operations: HashSet::new(),
            strategy: None,
            wrappers: Vec::new(),
        }
    }
}

type Slot = Box<dyn Any + Send + Sync>;

/// Process-wide store mapping contracts to their registrations.
///
/// Contracts are keyed by `TypeId`; each slot holds the typed registration
/// for that contract.
#[derive(Default)]
pub struct Registry {
    contracts: RwLock<HashMap<TypeId, Slot>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<C: Contract, R>(&self, f: impl FnOnce(Option<&Registration<C>>) -> R) -> R {
        let contracts = self.contracts.read();
        f(contracts
            .get(&TypeId::of::<C>())
            .and_then(|slot| slot.downcast_ref::<Registration<C>>()))
    }

    fn write<C: Contract, R>(&self, f: impl FnOnce(&mut Registration<C>) -> R) -> R {
        let mut contracts = self.contracts.write();
        let slot = contracts
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(Registration::<C>::default()) as Slot);
        let registration = slot
            .downcast_mut::<Registration<C>>()
            .expect("registry slots are keyed by the TypeId of their contract");
        f(registration)
    }

    /// Declare `operation` as dynamically dispatchable for `C`.
    ///
    /// Idempotent; returns whether the operation was newly declared.
    pub fn declare_operation<C: Contract>(&self, operation: impl Into<Operation>) -> bool {
        let operation = operation.into();
        let added = self.write::<C, _>(|registration| {
            registration.operations.insert(operation.clone())
        });
        #[cfg(feature = "tracing")]
        if added {
            tracing::debug!(contract = C::NAME, %operation, "declared operation");
        }
        added
    }

    /// Declare every operation listed in [`Contract::OPERATIONS`].
    ///
    /// Returns how many were newly declared.
    pub fn declare_contract<C: Contract>(&self) -> usize {
        C::OPERATIONS
            .iter()
            .filter(|&&operation| self.declare_operation::<C>(operation))
            .count()
    }

    /// Make `S` the active strategy for `C`, returning the one it replaces.
    pub fn register_strategy<C: Contract, S: Strategy<C>>(&self) -> Option<StrategyType<C>> {
        let strategy = StrategyType::<C>::of::<S>();
        let previous = self.write::<C, _>(|registration| registration.strategy.replace(strategy));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            contract = C::NAME,
            strategy = strategy.name(),
            replaced = previous.map(|p| p.name()),
            "registered strategy"
        );
        previous
    }

    /// Append `W` to the wrapper chain of `C`, returning its zero-based
    /// position in the chain.
    ///
    /// No de-duplication: registering the same type twice runs it twice.
    pub fn register_wrapper<C: Contract, W: Wrapper<C>>(&self) -> usize {
        let wrapper = WrapperType::<C>::of::<W>();
        let position = self.write::<C, _>(|registration| {
            registration.wrappers.push(wrapper.clone());
            registration.wrappers.len() - 1
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(
            contract = C::NAME,
            wrapper = wrapper.name(),
            position,
            "registered wrapper"
        );
        position
    }

    /// The active strategy for `C`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotConfigured`] if no strategy is registered.
    pub fn strategy_for<C: Contract>(&self) -> Result<StrategyType<C>, DispatchError> {
        self.read::<C, _>(|registration| registration.and_then(|r| r.strategy))
            .ok_or(DispatchError::NotConfigured { contract: C::NAME })
    }

    /// The wrapper chain of `C` in registration order; empty if none.
    pub fn wrappers_for<C: Contract>(&self) -> Vec<WrapperType<C>> {
        self.read::<C, _>(|registration| {
            registration
                .map(|r| r.wrappers.clone())
                .unwrap_or_default()
        })
    }

    /// Strategy and wrappers of `C`, read under a single lock acquisition.
    pub(crate) fn snapshot<C: Contract>(
        &self,
    ) -> Result<(StrategyType<C>, Vec<WrapperType<C>>), DispatchError> {
        self.read::<C, _>(|registration| match registration {
            Some(Registration {
                strategy: Some(strategy),
                wrappers,
                ..
            }) => Ok((*strategy, wrappers.clone())),
            _ => Err(DispatchError::NotConfigured { contract: C::NAME }),
        })
    }

    /// Whether `operation` is declared for `C`.
    pub fn is_declared<C: Contract>(&self, operation: &str) -> bool {
        self.read::<C, _>(|registration| {
            registration.is_some_and(|r| r.operations.contains(operation))
        })
    }

    /// The declared operations of `C`, sorted by name.
    pub fn operations<C: Contract>(&self) -> Vec<Operation> {
        let mut operations = self.read::<C, _>(|registration| {
            registration
                .map(|r| r.operations.iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        });
        operations.sort();
        operations
    }

    /// Whether anything has been registered or declared for `C`.
    pub fn contains<C: Contract>(&self) -> bool {
        self.contracts.read().contains_key(&TypeId::of::<C>())
    }

    /// Drop the strategy and wrappers of `C`, keeping its declared operations.
    pub fn reset<C: Contract>(&self) {
        self.write::<C, _>(|registration| {
            registration.strategy = None;
            registration.wrappers.clear();
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(contract = C::NAME, "reset registration");
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("contracts", &self.contracts.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::{BoxError, Hooks};

    struct Pricing;

    impl Contract for Pricing {
        const NAME: &'static str = "Pricing";
        const OPERATIONS: &'static [&'static str] = &["quote", "discount"];
        type Args = u32;
        type Output = u32;
    }

    #[derive(Default)]
    struct Flat;

    impl Strategy<Pricing> for Flat {
        async fn call(&self, _operation: &Operation, _args: &u32) -> Result<u32, BoxError> {
            Ok(10)
        }
    }

    #[derive(Default)]
    struct Premium;

    impl Strategy<Pricing> for Premium {
        async fn call(&self, _operation: &Operation, _args: &u32) -> Result<u32, BoxError> {
            Ok(20)
        }
    }

    #[derive(Default)]
    struct Audit;

    impl Wrapper<Pricing> for Audit {
        fn hooks() -> Hooks {
            Hooks::new().before("quote")
        }
    }

    #[test]
    fn test_declare_operation_is_idempotent() {
        let registry = Registry::new();

        assert!(registry.declare_operation::<Pricing>("quote"));
        assert!(!registry.declare_operation::<Pricing>("quote"));
        assert!(registry.is_declared::<Pricing>("quote"));
        assert!(!registry.is_declared::<Pricing>("refund"));
    }

    #[test]
    fn test_declare_contract_uses_static_operations() {
        let registry = Registry::new();
        registry.declare_operation::<Pricing>("quote");

        assert_eq!(registry.declare_contract::<Pricing>(), 1);
        assert_eq!(
            registry.operations::<Pricing>(),
            vec![Operation::from("discount"), Operation::from("quote")]
        );
    }

    #[test]
    fn test_strategy_for_unconfigured_contract() {
        let registry = Registry::new();
        registry.declare_contract::<Pricing>();

        let err = registry.strategy_for::<Pricing>().unwrap_err();
        assert!(err.is_not_configured());
    }

    #[test]
    fn test_register_strategy_replaces_previous() {
        let registry = Registry::new();

        assert!(registry.register_strategy::<Pricing, Flat>().is_none());
        let replaced = registry.register_strategy::<Pricing, Premium>().unwrap();

        assert!(replaced.is::<Flat>());
        assert!(registry.strategy_for::<Pricing>().unwrap().is::<Premium>());
    }

    #[test]
    fn test_wrappers_keep_registration_order_and_duplicates() {
        let registry = Registry::new();
        assert!(registry.wrappers_for::<Pricing>().is_empty());

        assert_eq!(registry.register_wrapper::<Pricing, Audit>(), 0);
        assert_eq!(registry.register_wrapper::<Pricing, Audit>(), 1);

        let wrappers = registry.wrappers_for::<Pricing>();
        assert_eq!(wrappers.len(), 2);
        assert!(wrappers.iter().all(|w| w.is::<Audit>()));
    }

    #[test]
    fn test_reset_keeps_declared_operations() {
        let registry = Registry::new();
        registry.declare_contract::<Pricing>();
        registry.register_strategy::<Pricing, Flat>();
        registry.register_wrapper::<Pricing, Audit>();

        registry.reset::<Pricing>();

        assert!(registry.contains::<Pricing>());
        assert!(registry.is_declared::<Pricing>("quote"));
        assert!(registry.strategy_for::<Pricing>().is_err());
        assert!(registry.wrappers_for::<Pricing>().is_empty());
    }
}
