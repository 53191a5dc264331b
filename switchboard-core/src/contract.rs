//! # Contracts and operation names
//!
//! A contract is the abstract capability a caller dispatches against. It is
//! a plain marker type: it owns no behaviour, it only names the argument and
//! output types shared by its operations and, optionally, the operations it
//! delegates.
//!
//! ```rust,ignore
//! struct Pricing;
//!
//! impl Contract for Pricing {
//!     const NAME: &'static str = "Pricing";
//!     const OPERATIONS: &'static [&'static str] = &["quote", "discount"];
//!     type Args = Order;
//!     type Output = Money;
//! }
//! ```

use crate::message::Message;
use std::{borrow::Borrow, borrow::Cow, fmt};

/// An abstract capability whose operations are bound to a strategy at call time.
///
/// Multi-argument operations package their inputs into one aggregate
/// [`Args`](Contract::Args) value; that single value is what before-hooks
/// receive and return.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a Contract",
    label = "missing `Contract` implementation",
    note = "Implement `Contract` (or derive it with the `macros` feature) to dispatch through `{Self}`."
)]
pub trait Contract: Send + Sync + 'static {
    /// Human readable name used in logs and errors.
    const NAME: &'static str;

    /// Operations declared statically for this contract.
    ///
    /// These are only registered once the contract is declared on a
    /// registry; operations can also be declared one at a time at runtime.
    const OPERATIONS: &'static [&'static str] = &[];

    /// The aggregate argument threaded through before-hooks and the strategy.
    type Args: Message;

    /// The value produced by the strategy and threaded through after-hooks.
    type Output: Message;
}

/// The name of a delegated operation.
///
/// Static names are stored without allocating. `Operation` borrows as `str`,
/// so sets and maps keyed by it can be queried with plain string slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation(Cow<'static, str>);

impl Operation {
    /// Create an operation name from a static string.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create an operation name from any owned or static string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The operation name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Operation {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&Operation> for Operation {
    fn from(operation: &Operation) -> Self {
        operation.clone()
    }
}

impl Borrow<str> for Operation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Operation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Operation {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Operation {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
