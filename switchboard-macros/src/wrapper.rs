//! `#[wrapper(Contract)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{ImplItem, ItemImpl, Type, parse_macro_input};

pub(crate) fn wrapper_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let contract = parse_macro_input!(attr as Type);
    let input = parse_macro_input!(item as ItemImpl);
    match expand(&contract, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(contract: &Type, input: &ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[wrapper]` expects an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let mut hooks = Vec::new();
    let mut before_arms = Vec::new();
    let mut after_arms = Vec::new();

    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let ident = &method.sig.ident;
        let name = ident.to_string();
        let awaits = method.sig.asyncness.is_some();

        if let Some(op) = name.strip_prefix("before_").filter(|op| !op.is_empty()) {
            if method.sig.inputs.len() != 2 {
                return Err(syn::Error::new_spanned(
                    &method.sig,
                    "before-hooks take `&self` and the contract's arguments",
                ));
            }
            let call = if awaits {
                quote! { self.#ident(args).await }
            } else {
                quote! { self.#ident(args) }
            };
            hooks.push(quote! { .before(#op) });
            before_arms.push(quote! {
                #op => #call.map_err(::core::convert::Into::into),
            });
        } else if let Some(op) = name.strip_prefix("after_").filter(|op| !op.is_empty()) {
            if method.sig.inputs.len() != 3 {
                return Err(syn::Error::new_spanned(
                    &method.sig,
                    "after-hooks take `&self`, the arguments and the output",
                ));
            }
            let call = if awaits {
                quote! { self.#ident(args, output).await }
            } else {
                quote! { self.#ident(args, output) }
            };
            hooks.push(quote! { .after(#op) });
            after_arms.push(quote! {
                #op => #call.map_err(::core::convert::Into::into),
            });
        }
    }

    Ok(quote! {
        #input

        impl #impl_generics ::switchboard::Wrapper<#contract> for #self_ty #where_clause {
            fn hooks() -> ::switchboard::Hooks {
                ::switchboard::Hooks::new() #(#hooks)*
            }

            async fn before(
                &self,
                operation: &::switchboard::Operation,
                args: <#contract as ::switchboard::Contract>::Args,
            ) -> ::core::result::Result<
                <#contract as ::switchboard::Contract>::Args,
                ::switchboard::BoxError,
            > {
                match operation.as_str() {
                    #(#before_arms)*
                    _ => ::core::result::Result::Ok(args),
                }
            }

            async fn after(
                &self,
                operation: &::switchboard::Operation,
                args: &<#contract as ::switchboard::Contract>::Args,
                output: <#contract as ::switchboard::Contract>::Output,
            ) -> ::core::result::Result<
                <#contract as ::switchboard::Contract>::Output,
                ::switchboard::BoxError,
            > {
                let _ = args;
                match operation.as_str() {
                    #(#after_arms)*
                    _ => ::core::result::Result::Ok(output),
                }
            }
        }
    })
}
