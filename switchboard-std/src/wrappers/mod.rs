//! Standard wrapper implementations.

pub mod logging;
pub mod timing;

pub use logging::LoggingWrapper;
pub use timing::TimingWrapper;
