//! `#[strategy(Contract)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, ReturnType, Type, parse_macro_input};

pub(crate) fn strategy_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let contract = parse_macro_input!(attr as Type);
    let input = parse_macro_input!(item as ItemImpl);
    match expand(&contract, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// `&self`, exactly one argument taken by reference, and a `Result` return.
fn is_operation(method: &ImplItemFn) -> bool {
    let sig = &method.sig;
    if sig.inputs.len() != 2 {
        return false;
    }
    let mut inputs = sig.inputs.iter();
    let by_ref = matches!(
        inputs.next(),
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none()
    );
    let args_by_ref = matches!(
        inputs.next(),
        Some(FnArg::Typed(arg)) if matches!(*arg.ty, Type::Reference(_))
    );
    by_ref && args_by_ref && returns_result(&sig.output)
}

fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match &**ty {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Result"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

fn expand(contract: &Type, input: &ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[strategy]` expects an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let arms = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) if is_operation(method) => Some(method),
            _ => None,
        })
        .map(|method| {
            let ident = &method.sig.ident;
            let name = ident.to_string();
            let call = if method.sig.asyncness.is_some() {
                quote! { self.#ident(args).await }
            } else {
                quote! { self.#ident(args) }
            };
            quote! {
                #name => #call.map_err(::core::convert::Into::into),
            }
        });

    Ok(quote! {
        #input

        impl #impl_generics ::switchboard::Strategy<#contract> for #self_ty #where_clause {
            async fn call(
                &self,
                operation: &::switchboard::Operation,
                args: &<#contract as ::switchboard::Contract>::Args,
            ) -> ::core::result::Result<
                <#contract as ::switchboard::Contract>::Output,
                ::switchboard::BoxError,
            > {
                match operation.as_str() {
                    #(#arms)*
                    _ => ::core::result::Result::Err(::core::convert::Into::into(
                        ::switchboard::UnsupportedOperation::new(
                            ::core::any::type_name::<Self>(),
                            operation,
                        ),
                    )),
                }
            }
        }
    })
}
