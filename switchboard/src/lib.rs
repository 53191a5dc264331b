//! # switchboard - Strategy Dispatch with Interceptor Chains
//!
//! `switchboard` lets callers invoke operations on an abstract *contract*
//! while the concrete *strategy* behind it is chosen at configuration time and
//! resolved at call time. Every call runs through the contract's *wrappers*:
//! before-hooks in registration order, the strategy, then after-hooks in
//! reverse order.
//!
//! Resolution is memoized: the first call of an operation builds an immutable
//! [`DispatchPlan`] and later calls reuse it until it is invalidated, either
//! explicitly or by a registration (see [`InvalidationPolicy`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchboard::prelude::*;
//!
//! struct Calculator;
//! impl Contract for Calculator {
//!     const NAME: &'static str = "Calculator";
//!     const OPERATIONS: &'static [&'static str] = &["foo"];
//!     type Args = i64;
//!     type Output = i64;
//! }
//!
//! let board = Switchboard::new();
//! board
//!     .declare_contract::<Calculator>()
//!     .register_strategy::<Calculator, Increment>()
//!     .register_wrapper::<Calculator, AddTenThenDouble>();
//!
//! assert_eq!(board.invoke::<Calculator>("foo", 5).await?, 32);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use switchboard_core::{
    // Error types
    BoxError,
    BoxFuture,
    // Contracts
    Contract,
    DispatchError,
    // Strategies
    DynStrategy,
    // Wrappers
    DynWrapper,
    Hooks,
    Message,
    Operation,
    Phase,
    Strategy,
    StrategyType,
    UnsupportedOperation,
    Wrapper,
    WrapperType,
};

// Engine
pub use switchboard_std::{
    DispatchPlan, InvalidationPolicy, PlanCache, PlanState, Registry, Switchboard,
    SwitchboardBuilder, SwitchboardConfig, build_plan, execute,
};

/// Standard wrapper implementations.
pub mod wrappers {
    pub use switchboard_std::wrappers::{LoggingWrapper, TimingWrapper};
}

/// Testing utilities.
pub mod testing {
    pub use switchboard_std::testing::{
        EchoStrategy, FailingStrategy, FailingWrapper, InjectedFailure, PassthroughWrapper,
    };
}

/// Prelude module - common imports for Switchboard.
///
/// # Usage
///
/// ```rust,ignore
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Contract, DispatchError, Hooks, InvalidationPolicy, Operation, Strategy,
        Switchboard, Wrapper,
    };
}

#[cfg(feature = "macros")]
pub use switchboard_macros::{Contract, strategy, wrapper};
