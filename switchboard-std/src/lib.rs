//! # switchboard-std
//!
//! The dispatch engine for the Switchboard framework.
//!
//! This crate provides:
//! - **Registry**: [`Registry`] of declared operations, strategies and wrappers
//! - **Plans**: [`DispatchPlan`] and [`build_plan`]
//! - **Cache**: [`PlanCache`], memoizing plans per `(contract, operation)`
//! - **Pipeline**: [`execute`], running before-hooks, strategy and after-hooks
//! - **Facade**: [`Switchboard`] with [`SwitchboardConfig`] and [`SwitchboardBuilder`]
//! - **Standard wrappers**: Logging, Timing
//! - **Testing utilities**

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use switchboard_core;

// Modules
pub mod cache;
pub mod config;
pub mod pipeline;
pub mod plan;
pub mod registry;
pub mod switchboard;
pub mod testing;
pub mod wrappers;

pub use cache::PlanCache;
pub use config::{InvalidationPolicy, SwitchboardConfig};
pub use pipeline::execute;
pub use plan::{DispatchPlan, build_plan};
pub use registry::Registry;
pub use switchboard::{PlanState, Switchboard, SwitchboardBuilder};
