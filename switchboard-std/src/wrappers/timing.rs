//! Timing wrapper measuring the inner pipeline.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use switchboard_core::{BoxError, Contract, Hooks, Operation, Wrapper};

/// A wrapper that logs how long everything inside it took.
///
/// The start instant is taken in `before` and read back in `after` on the
/// same per-call instance; the measured span covers the wrappers registered
/// after this one plus the strategy.
#[derive(Debug, Default)]
pub struct TimingWrapper {
    started: Mutex<Option<Instant>>,
}

impl TimingWrapper {
    fn start(&self) {
        *self.started.lock() = Some(Instant::now());
    }

    /// Time since `start` on this instance; `None` if it never started or
    /// was already finished.
    fn finish(&self) -> Option<Duration> {
        self.started.lock().take().map(|started| started.elapsed())
    }
}

impl<C: Contract> Wrapper<C> for TimingWrapper {
    fn hooks() -> Hooks {
        Hooks::all()
    }

    async fn before(&self, _operation: &Operation, args: C::Args) -> Result<C::Args, BoxError> {
        self.start();
        Ok(args)
    }

    async fn after(
        &self,
        operation: &Operation,
        _args: &C::Args,
        output: C::Output,
    ) -> Result<C::Output, BoxError> {
        let elapsed = self.finish();
        #[cfg(feature = "tracing")]
        if let Some(elapsed) = elapsed {
            tracing::debug!(contract = C::NAME, %operation, ?elapsed, "operation completed");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (operation, elapsed);
        }
        Ok(output)
    }
}
