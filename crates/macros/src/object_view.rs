//! ObjectView derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericArgument, PathArguments, Type};

use crate::parse::{parse_object_view, ObjectViewArgs, ViewFieldArgs};

/// Extract the inner type from `PhantomData<T>` if present, otherwise return the type as-is
fn extract_inner_type(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "PhantomData" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}

/// Check if a type is PhantomData
fn is_phantom_data(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "PhantomData";
        }
    }
    false
}

/// Accessor base name: the field ident without a leading underscore
fn clean_name(field: &ViewFieldArgs) -> Option<String> {
    let name = field.ident.as_ref()?.to_string();
    Some(name.strip_prefix('_').unwrap_or(&name).to_string())
}

/// Generate the ObjectView implementation
pub fn derive_object_view(input: syn::DeriveInput) -> TokenStream {
    match parse_object_view(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ObjectViewArgs) -> TokenStream {
    let struct_name = &args.ident;
    let class_name = &args.class_name;

    let fields = match args.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        _ => {
            return syn::Error::new_spanned(&args.ident, "ObjectView can only be derived for structs")
                .to_compile_error()
        }
    };

    if !fields.iter().any(|f| f.is_handle_field()) {
        return syn::Error::new_spanned(
            &args.ident,
            "ObjectView requires a `handle: ObjectHandle` field",
        )
        .to_compile_error();
    }

    let constants = generate_constants(&fields);
    let accessors: Vec<_> = fields
        .iter()
        .filter(|f| f.is_view_field())
        .map(generate_accessors)
        .collect();
    let view_impl = generate_view_impl(struct_name, class_name, &fields);

    quote! {
        impl #struct_name {
            #constants
            #(#accessors)*
        }

        #view_impl
    }
}

fn generate_constants(fields: &[ViewFieldArgs]) -> TokenStream {
    let field_constants = fields.iter().filter(|f| f.is_view_field()).filter_map(|f| {
        let clean = clean_name(f)?;
        let field_name = f.field_name.as_ref()?;
        let const_name = format_ident!("{}_FIELD", clean.to_uppercase());
        let doc = format!("Engine field name for `{}`", clean);

        Some(quote! {
            #[doc = #doc]
            pub const #const_name: &'static str = #field_name;
        })
    });

    quote! {
        #(#field_constants)*
    }
}

fn generate_accessors(field: &ViewFieldArgs) -> TokenStream {
    let (Some(clean), Some(field_name)) = (clean_name(field), field.field_name.as_ref()) else {
        return quote! {};
    };
    let field_ty = extract_inner_type(&field.ty);

    let getter_name = format_ident!("{}", clean);
    let setter_name = format_ident!("set_{}", clean);
    let const_name = format_ident!("{}_FIELD", clean.to_uppercase());

    let getter_doc = format!("Read `{}`", field_name);
    let setter_doc = format!("Write `{}`", field_name);

    let getter = quote! {
        #[doc = #getter_doc]
        #[inline]
        pub fn #getter_name(&self) -> ::std::result::Result<#field_ty, ::hookwork_engine::EngineError> {
            self.handle.get_as::<#field_ty>(Self::#const_name)
        }
    };

    let setter = if field.readonly {
        quote! {}
    } else {
        quote! {
            #[doc = #setter_doc]
            #[inline]
            pub fn #setter_name(&self, value: #field_ty) -> ::std::result::Result<(), ::hookwork_engine::EngineError> {
                self.handle.set(Self::#const_name, value)
            }
        }
    };

    quote! {
        #getter
        #setter
    }
}

fn generate_view_impl(
    struct_name: &syn::Ident,
    class_name: &str,
    fields: &[ViewFieldArgs],
) -> TokenStream {
    let field_inits: Vec<_> = fields
        .iter()
        .filter(|f| !f.is_handle_field())
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            if is_phantom_data(&f.ty) {
                Some(quote! { #ident: ::std::marker::PhantomData })
            } else {
                Some(quote! { #ident: ::std::default::Default::default() })
            }
        })
        .collect();

    quote! {
        impl ::hookwork_engine::ObjectView for #struct_name {
            const CLASS_NAME: &'static str = #class_name;

            fn from_handle(handle: ::hookwork_engine::ObjectHandle) -> Self {
                Self {
                    handle,
                    #(#field_inits),*
                }
            }

            fn handle(&self) -> &::hookwork_engine::ObjectHandle {
                &self.handle
            }
        }
    }
}
