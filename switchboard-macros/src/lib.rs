use proc_macro::TokenStream;

mod contract;
mod strategy;
mod wrapper;

/// Derive macro for implementing `Contract`.
///
/// ```rust,ignore
/// #[derive(Contract)]
/// #[contract(args = (u32, u32), output = u32, operations(add, sub))]
/// struct Calculator;
/// ```
///
/// `name = "..."` overrides the contract name, which defaults to the type name.
#[proc_macro_derive(Contract, attributes(contract))]
pub fn derive_contract(input: TokenStream) -> TokenStream {
    contract::derive_contract_impl(input)
}

/// Implements `Strategy<C>` for the type of an inherent impl block.
///
/// Every `&self` method taking exactly one argument by reference (`&C::Args`)
/// and returning a `Result` (`Result<C::Output, E>` or an alias named
/// `Result`) becomes the operation of the same name. Methods may be `async`.
/// Other methods, such as helpers taking arguments by value or returning
/// plain values, are left alone.
///
/// ```rust,ignore
/// #[strategy(Calculator)]
/// impl Arithmetic {
///     fn add(&self, (a, b): &(u32, u32)) -> Result<u32, BoxError> {
///         Ok(a + b)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn strategy(attr: TokenStream, item: TokenStream) -> TokenStream {
    strategy::strategy_impl(attr, item)
}

/// Implements `Wrapper<C>` for the type of an inherent impl block.
///
/// Methods named `before_<op>(&self, C::Args)` and
/// `after_<op>(&self, &C::Args, C::Output)` become hooks for `<op>`; an
/// operation without such a method is not hooked in that phase.
///
/// ```rust,ignore
/// #[wrapper(Calculator)]
/// impl Audit {
///     fn before_add(&self, args: (u32, u32)) -> Result<(u32, u32), BoxError> {
///         Ok(args)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn wrapper(attr: TokenStream, item: TokenStream) -> TokenStream {
    wrapper::wrapper_impl(attr, item)
}
