//! Plan cache keyed by `(contract, operation)`.
//!
//! Plans are built lazily on first resolution and kept until invalidated.
//! A miss builds the plan while holding the key's map entry, so concurrent
//! first resolutions of one key run the builder once and every caller gets
//! the same `Arc`. Failed builds are not stored.

use crate::plan::DispatchPlan;
use dashmap::{DashMap, mapref::entry::Entry};
use std::{
    any::{Any, TypeId},
    sync::Arc,
};
use switchboard_core::{Contract, Operation};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PlanKey {
    contract: TypeId,
    operation: Operation,
}

impl PlanKey {
    fn of<C: Contract>(operation: &Operation) -> Self {
        Self {
            contract: TypeId::of::<C>(),
            operation: operation.clone(),
        }
    }
}

type CachedPlan = Arc<dyn Any + Send + Sync>;

/// Memoized [`DispatchPlan`]s for any number of contracts.
#[derive(Default)]
pub struct PlanCache {
    plans: DashMap<PlanKey, CachedPlan>,
}

impl PlanCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached plan for `operation` on `C`, if any.
    pub fn get<C: Contract>(&self, operation: &Operation) -> Option<Arc<DispatchPlan<C>>> {
        self.plans
            .get(&PlanKey::of::<C>(operation))
            .and_then(|entry| entry.value().clone().downcast::<DispatchPlan<C>>().ok())
    }

    /// The cached plan for `operation` on `C`, building and storing it on a miss.
    ///
    /// `build` must not touch this cache.
    ///
    /// # Errors
    ///
    /// Whatever `build` fails with; nothing is stored in that case.
    pub fn get_or_try_insert_with<C: Contract, E>(
        &self,
        operation: &Operation,
        build: impl FnOnce() -> Result<DispatchPlan<C>, E>,
    ) -> Result<Arc<DispatchPlan<C>>, E> {
        match self.plans.entry(PlanKey::of::<C>(operation)) {
            Entry::Occupied(mut entry) => match entry.get().clone().downcast::<DispatchPlan<C>>() {
                Ok(plan) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(contract = C::NAME, %operation, "dispatch plan cache hit");
                    Ok(plan)
                }
                Err(_) => {
                    let plan = Arc::new(build()?);
                    entry.insert(plan.clone());
                    Ok(plan)
                }
            },
            Entry::Vacant(entry) => {
                let plan = Arc::new(build()?);
                entry.insert(plan.clone());
                Ok(plan)
            }
        }
    }

    /// Drop cached plans of `C`: one operation, or all of them with `None`.
    ///
    /// Returns how many plans were removed.
    pub fn invalidate<C: Contract>(&self, operation: Option<&str>) -> usize {
        let contract = TypeId::of::<C>();
        let removed = match operation {
            Some(operation) => {
                let key = PlanKey {
                    contract,
                    operation: Operation::new(operation.to_owned()),
                };
                usize::from(self.plans.remove(&key).is_some())
            }
            None => {
                let mut removed = 0;
                self.plans.retain(|key, _| {
                    let keep = key.contract != contract;
                    if !keep {
                        removed += 1;
                    }
                    keep
                });
                removed
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(contract = C::NAME, ?operation, removed, "invalidated dispatch plans");
        removed
    }

    /// Whether a plan for `operation` on `C` is cached.
    pub fn is_cached<C: Contract>(&self, operation: &str) -> bool {
        self.plans.contains_key(&PlanKey {
            contract: TypeId::of::<C>(),
            operation: Operation::new(operation.to_owned()),
        })
    }

    /// Number of cached plans across all contracts.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether no plan is cached.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Drop every cached plan.
    pub fn clear(&self) {
        self.plans.clear();
    }
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCache")
            .field("plans", &self.plans.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{plan::build_plan, registry::Registry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use switchboard_core::{BoxError, DispatchError, Strategy};

    struct Ledger;

    impl Contract for Ledger {
        const NAME: &'static str = "Ledger";
        type Args = i64;
        type Output = i64;
    }

    struct Journal;

    impl Contract for Journal {
        const NAME: &'static str = "Journal";
        type Args = i64;
        type Output = i64;
    }

    #[derive(Default)]
    struct Identity;

    impl Strategy<Ledger> for Identity {
        async fn call(&self, _operation: &Operation, args: &i64) -> Result<i64, BoxError> {
            Ok(*args)
        }
    }

    impl Strategy<Journal> for Identity {
        async fn call(&self, _operation: &Operation, args: &i64) -> Result<i64, BoxError> {
            Ok(*args)
        }
    }

    fn registry() -> Registry {
        let registry = Registry::new();
        registry.register_strategy::<Ledger, Identity>();
        registry.register_strategy::<Journal, Identity>();
        registry
    }

    #[test]
    fn test_builds_once_per_key() {
        let registry = registry();
        let cache = PlanCache::new();
        let builds = AtomicUsize::new(0);
        let operation = Operation::from("post");

        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            build_plan::<Ledger>(&registry, &operation)
        };
        let first = cache.get_or_try_insert_with(&operation, build).unwrap();
        let second = cache
            .get_or_try_insert_with(&operation, || {
                builds.fetch_add(1, Ordering::SeqCst);
                build_plan::<Ledger>(&registry, &operation)
            })
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached::<Ledger>("post"));
        assert!(!cache.is_cached::<Journal>("post"));
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let registry = Registry::new();
        let cache = PlanCache::new();
        let operation = Operation::from("post");

        let err = cache
            .get_or_try_insert_with(&operation, || build_plan::<Ledger>(&registry, &operation))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotConfigured { contract: "Ledger" }));
        assert!(cache.is_empty());

        registry.register_strategy::<Ledger, Identity>();
        let plan = cache
            .get_or_try_insert_with(&operation, || build_plan::<Ledger>(&registry, &operation))
            .unwrap();
        assert!(plan.strategy().is::<Identity>());
    }

    #[test]
    fn test_invalidate_single_and_all() {
        let registry = registry();
        let cache = PlanCache::new();
        for name in ["post", "void", "close"] {
            let operation = Operation::from(name);
            cache
                .get_or_try_insert_with(&operation, || build_plan::<Ledger>(&registry, &operation))
                .unwrap();
        }
        let operation = Operation::from("post");
        cache
            .get_or_try_insert_with(&operation, || build_plan::<Journal>(&registry, &operation))
            .unwrap();
        assert_eq!(cache.len(), 4);

        assert_eq!(cache.invalidate::<Ledger>(Some("void")), 1);
        assert_eq!(cache.invalidate::<Ledger>(Some("void")), 0);
        assert!(!cache.is_cached::<Ledger>("void"));

        assert_eq!(cache.invalidate::<Ledger>(None), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get::<Journal>(&operation).is_some());
        assert!(cache.get::<Ledger>(&operation).is_none());
    }
}
