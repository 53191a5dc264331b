//! Message trait for argument and output values.

/// A marker trait for every value that travels through a dispatch pipeline.
///
/// Arguments and outputs cross `await` points and may be handed to wrappers
/// on other threads, so they must be `Send + Sync + 'static`. Every such type
/// is a `Message` automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Contract arguments and outputs must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Message for T {}
