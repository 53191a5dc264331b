//! `#[derive(Contract)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Type, parse_macro_input};

pub(crate) fn derive_contract_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut args: Option<Type> = None;
    let mut output: Option<Type> = None;
    let mut name: Option<LitStr> = None;
    let mut operations: Vec<String> = Vec::new();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("contract")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("args") {
                args = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("output") {
                output = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("operations") {
                meta.parse_nested_meta(|operation| {
                    let op = operation
                        .path
                        .get_ident()
                        .ok_or_else(|| operation.error("operation names must be identifiers"))?;
                    operations.push(op.to_string());
                    Ok(())
                })
            } else {
                Err(meta.error(
                    "unknown contract attribute, expected `args`, `output`, `name` or `operations`",
                ))
            }
        })?;
    }

    let args = args.ok_or_else(|| {
        syn::Error::new_spanned(ident, "missing `#[contract(args = ...)]` attribute")
    })?;
    let output = output.ok_or_else(|| {
        syn::Error::new_spanned(ident, "missing `#[contract(output = ...)]` attribute")
    })?;
    let name = name
        .map(|lit| lit.value())
        .unwrap_or_else(|| ident.to_string());

    Ok(quote! {
        impl #impl_generics ::switchboard::Contract for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const OPERATIONS: &'static [&'static str] = &[#(#operations),*];
            type Args = #args;
            type Output = #output;
        }
    })
}
