//! Hook attribute macro implementation
//!
//! Provides the `#[hook]` attribute for ergonomic hook registration.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse::Parse, parse::ParseStream, Expr, FnArg, Ident, ItemFn, Token, Type};

/// Arguments to the hook attribute
///
/// Usage:
/// - `#[hook(targets::NEXT_WEAPON)]`
/// - `#[hook("Module.Class:Method", phase = after)]`
/// - `#[hook(targets::RESOLVE_MARKUP, disabled)]`
pub struct HookArgs {
    /// Target identity expression
    pub target: Expr,
    /// True for `phase = after`
    pub after: bool,
    /// Register disabled
    pub disabled: bool,
}

impl Parse for HookArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let target: Expr = input.parse()?;
        let mut after = false;
        let mut disabled = false;

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            let ident: Ident = input.parse()?;
            if ident == "phase" {
                input.parse::<Token![=]>()?;
                let phase: Ident = input.parse()?;
                after = match phase.to_string().as_str() {
                    "before" => false,
                    "after" => true,
                    _ => {
                        return Err(syn::Error::new(
                            phase.span(),
                            "expected `before` or `after`",
                        ))
                    }
                };
            } else if ident == "disabled" {
                disabled = true;
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    "expected `phase` or `disabled`",
                ));
            }
        }

        Ok(Self {
            target,
            after,
            disabled,
        })
    }
}

/// The state type `S` of a `fn(state: &S, ctx: &mut CallContext)` hook
fn state_type(func: &ItemFn) -> syn::Result<Option<Type>> {
    match func.sig.inputs.len() {
        1 => Ok(None),
        2 => match func.sig.inputs.first() {
            Some(FnArg::Typed(pat)) => match pat.ty.as_ref() {
                Type::Reference(reference) if reference.mutability.is_none() => {
                    Ok(Some((*reference.elem).clone()))
                }
                other => Err(syn::Error::new_spanned(
                    other,
                    "hook state must be taken by shared reference",
                )),
            },
            Some(other) => Err(syn::Error::new_spanned(other, "hooks cannot take self")),
            None => Ok(None),
        },
        _ => Err(syn::Error::new_spanned(
            &func.sig,
            "hook functions take `(ctx)` or `(state, ctx)`",
        )),
    }
}

/// Generate the hook implementation
pub fn generate_hook(args: HookArgs, func: ItemFn) -> TokenStream {
    let state = match state_type(&func) {
        Ok(state) => state,
        Err(e) => return e.to_compile_error(),
    };

    let fn_name = &func.sig.ident;
    let fn_vis = &func.vis;
    let name_str = fn_name.to_string();
    let target = &args.target;
    let enabled = !args.disabled;

    let register_fn_name = format_ident!("{}_register", fn_name);

    let phase = if args.after {
        quote! { ::hookwork_core::hooks::Phase::AfterUnconditional }
    } else {
        quote! { ::hookwork_core::hooks::Phase::Before }
    };

    let register_fn = match state {
        None => quote! {
            /// Register this hook with the dispatcher
            #fn_vis fn #register_fn_name(
                dispatcher: &::hookwork_core::hooks::Dispatcher,
            ) -> ::hookwork_core::hooks::HookKey {
                dispatcher.register_named(#target, #phase, #name_str, #enabled, #fn_name)
            }
        },
        Some(state_ty) => quote! {
            /// Register this hook with the dispatcher, sharing `state` with it
            #fn_vis fn #register_fn_name(
                dispatcher: &::hookwork_core::hooks::Dispatcher,
                state: ::std::sync::Arc<#state_ty>,
            ) -> ::hookwork_core::hooks::HookKey {
                dispatcher.register_named(
                    #target,
                    #phase,
                    #name_str,
                    #enabled,
                    move |ctx: &mut ::hookwork_core::hooks::CallContext<'_>| #fn_name(&state, ctx),
                )
            }
        },
    };

    quote! {
        #func

        #register_fn
    }
}
