//! hookwork Proc Macros
//!
//! This crate provides proc macros for the hookwork framework:
//!
//! - `#[derive(ObjectView)]` - Generate typed field accessors over an engine object
//! - `#[hook]` - Generate a registration helper for a hook function
//!
//! # ObjectView Example
//!
//! ```ignore
//! use std::marker::PhantomData;
//! use hookwork_engine::ObjectHandle;
//! use hookwork_macros::ObjectView;
//!
//! #[derive(ObjectView)]
//! #[view(class = "WillowPickup")]
//! pub struct Pickup {
//!     handle: ObjectHandle,
//!
//!     #[view(field = "bPickupable", readonly)]
//!     pickupable: PhantomData<bool>,
//!
//!     #[view(field = "PickupShrinkDuration")]
//!     shrink_duration: PhantomData<f64>,
//! }
//!
//! // Generated methods:
//! // - pickup.pickupable() -> Result<bool, EngineError>
//! // - pickup.shrink_duration() -> Result<f64, EngineError>
//! // - pickup.set_shrink_duration(0.5) -> Result<(), EngineError>
//! ```
//!
//! # Hook Example
//!
//! ```ignore
//! use hookwork_core::hooks::{CallContext, Decision};
//! use hookwork_macros::hook;
//!
//! #[hook("WillowGame.WillowPlayerController:NextWeapon")]
//! fn on_swap(gate: &SwapGate, _ctx: &mut CallContext) -> Decision {
//!     gate.decision()
//! }
//!
//! // Generated:
//! // - on_swap_register(dispatcher, Arc<SwapGate>) -> HookKey
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes (ObjectView)
//!
//! - `#[view(class = "ClassName")]` - **Required.** The engine class name.
//!
//! ## Field Attributes (ObjectView)
//!
//! - `#[view(field = "FieldName")]` - Mark as an engine field with the given name.
//! - `#[view(readonly)]` - Don't generate a setter.
//!
//! ## Hook Arguments
//!
//! - First argument: target identity, any expression evaluating to `&str`
//! - `phase = before` (default) or `phase = after`
//! - `disabled` - register the hook disabled

mod hook;
mod object_view;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemFn};

/// Derive macro for typed engine object views
///
/// The struct must have a `handle: ObjectHandle` field. Every field marked
/// `#[view(field = "...")]` should be a `PhantomData<T>` where `T`
/// implements `FromValue` (and `Into<Value>` unless `readonly`).
///
/// # Generated Code
///
/// For each view field, the macro generates:
///
/// - A getter method (`fn pickupable(&self) -> Result<bool, EngineError>`)
/// - A setter method (`fn set_pickupable(&self, value: bool)`) unless `readonly`
/// - A constant holding the engine field name
/// - An `ObjectView` trait implementation
#[proc_macro_derive(ObjectView, attributes(view))]
pub fn derive_object_view(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object_view::derive_object_view(input).into()
}

/// Attribute macro for hook registration
///
/// Marks a function as a hook and generates a `{name}_register` function.
///
/// Supported signatures:
///
/// - `fn(ctx: &mut CallContext) -> Decision` generates
///   `{name}_register(dispatcher: &Dispatcher) -> HookKey`
/// - `fn(state: &S, ctx: &mut CallContext) -> Decision` generates
///   `{name}_register(dispatcher: &Dispatcher, state: Arc<S>) -> HookKey`
///
/// The function name doubles as the registration name, so registering the
/// same hook twice returns the existing key.
#[proc_macro_attribute]
pub fn hook(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as hook::HookArgs);
    let func = parse_macro_input!(item as ItemFn);
    hook::generate_hook(args, func).into()
}
