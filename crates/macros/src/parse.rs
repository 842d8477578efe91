//! Attribute parsing for the ObjectView derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Ident, Type};

/// Parsed #[view(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(view), supports(struct_named))]
pub struct ObjectViewArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Struct fields
    pub data: darling::ast::Data<(), ViewFieldArgs>,

    /// Engine class name (e.g., "WillowPickup")
    #[darling(rename = "class")]
    pub class_name: String,
}

/// Parsed #[view(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(view))]
pub struct ViewFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Engine field name (e.g., "bPickupable")
    /// If not specified, this is not a view field (e.g., the handle field)
    #[darling(rename = "field")]
    pub field_name: Option<String>,

    /// Whether this field is read-only (no setter generated)
    #[darling(default)]
    pub readonly: bool,
}

impl ViewFieldArgs {
    /// Check if this is an engine field (has field attribute)
    pub fn is_view_field(&self) -> bool {
        self.field_name.is_some()
    }

    /// Check if this is the wrapped handle field
    pub fn is_handle_field(&self) -> bool {
        self.ident.as_ref().map(|i| i == "handle").unwrap_or(false)
    }
}

/// Parse a DeriveInput into ObjectViewArgs
pub fn parse_object_view(input: &DeriveInput) -> darling::Result<ObjectViewArgs> {
    ObjectViewArgs::from_derive_input(input)
}
