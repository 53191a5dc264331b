//! # switchboard-core
//!
//! Core traits for the Switchboard strategy dispatch framework.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that only provide strategies or wrappers and do not need the dispatch
//! engine in `switchboard-std`.
//!
//! # Vocabulary
//!
//! - [`Contract`] - An abstract capability with declared operations. Callers
//!   only ever name the contract and an [`Operation`].
//! - [`Strategy`] - The concrete implementation a contract resolves to. One
//!   strategy is active per contract; a fresh instance serves every call.
//! - [`Wrapper`] - An interceptor contributing optional before/after hooks per
//!   operation, declared through [`Hooks`].
//!
//! The `Dyn*` twins are the object-safe forms the registry stores, and
//! [`StrategyType`] / [`WrapperType`] are the registered type descriptors.
//!
//! # Error Types
//!
//! - [`DispatchError`] - Resolution and pipeline failures
//! - [`UnsupportedOperation`] - Strategy asked for an operation it lacks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod contract;
mod error;
mod message;
mod strategy;
mod wrapper;

// Re-exports
pub use contract::{Contract, Operation};
pub use error::{BoxError, DispatchError, UnsupportedOperation};
pub use message::Message;
pub use strategy::{BoxFuture, DynStrategy, Strategy, StrategyType};
pub use wrapper::{DynWrapper, Hooks, Phase, Wrapper, WrapperType};
