//! Switchboard configuration.

/// What happens to cached plans when a contract's registration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidationPolicy {
    /// Every strategy or wrapper registration (and reset) for a contract drops
    /// all cached plans of that contract, so the next call resolves afresh.
    #[default]
    OnRegistration,
    /// Registrations never touch the cache. Plans resolved before a
    /// registration keep being served until [`invalidate`] is called.
    ///
    /// [`invalidate`]: crate::Switchboard::invalidate
    Manual,
}

/// Configuration for a [`Switchboard`](crate::Switchboard).
#[derive(Debug, Clone)]
pub struct SwitchboardConfig {
    /// Cache invalidation behaviour on registration.
    pub invalidation: InvalidationPolicy,
    /// Run every invocation inside a `tracing` span. No effect without the
    /// `tracing` feature.
    pub instrument: bool,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            invalidation: InvalidationPolicy::default(),
            instrument: true,
        }
    }
}
