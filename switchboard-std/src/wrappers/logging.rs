//! Logging wrapper for call observation.

use std::fmt::Debug;
use switchboard_core::{BoxError, Contract, Hooks, Operation, Wrapper};

/// A wrapper that logs the arguments and output of every operation.
///
/// Hooks both phases of every operation, so registering it first makes it
/// see the caller's arguments and the final output.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingWrapper;

impl<C> Wrapper<C> for LoggingWrapper
where
    C: Contract,
    C::Args: Debug,
    C::Output: Debug,
{
    fn hooks() -> Hooks {
        Hooks::all()
    }

    async fn before(&self, operation: &Operation, args: C::Args) -> Result<C::Args, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(contract = C::NAME, %operation, ?args, "dispatching");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = operation;
        }
        Ok(args)
    }

    async fn after(
        &self,
        operation: &Operation,
        _args: &C::Args,
        output: C::Output,
    ) -> Result<C::Output, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(contract = C::NAME, %operation, ?output, "dispatched");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = operation;
        }
        Ok(output)
    }
}
