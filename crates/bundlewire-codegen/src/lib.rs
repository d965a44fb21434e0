// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

/// Upper bound on identifier length, mirrored from `bundlewire::config`.
const MAX_TYPE_ID_LEN: usize = 1024;

/// How a field travels through `InstanceData`.
#[derive(Clone, Copy)]
enum FieldKind {
    /// Any `IntoInstanceValue + FromInstanceValue + Clone` type
    Value,
    /// `Vec<u8>`, stored as a compact byte array
    ByteVec,
}

struct FieldInfo {
    ident: syn::Ident,
    key: String,
    kind: FieldKind,
    skip: bool,
}

/// `#[derive(Bundleable)]` macro: generates `Bundleable`, `RawInstance`,
/// `IntoInstanceValue` and `FromInstanceValue`.
///
/// Attributes:
/// - `#[bundle(type_id = "...")]` on the struct (defaults to the struct name)
/// - `#[bundle(rename = "...")]` on a field (defaults to the field name)
/// - `#[bundle(skip)]` on a field: not written, left at its default on decode
///
/// Every non-skipped field must be `Clone` and convertible to and from
/// `InstanceValue`; every field must be `Default`.
///
/// Example:
/// ```ignore
/// use bundlewire::Bundleable;
///
/// #[derive(Debug, Clone, Bundleable)]
/// #[bundle(type_id = "shapes.Circle")]
/// struct Circle {
///     #[bundle(rename = "r")]
///     radius: f64,
///     label: Option<String>,
///     #[bundle(skip)]
///     cached_area: f64,
/// }
/// ```
#[proc_macro_derive(Bundleable, attributes(bundle))]
pub fn derive_bundleable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input).unwrap_or_else(|e| e.to_compile_error()).into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic structs are not supported",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let type_id = parse_type_id(input)?;

    let mut field_infos = Vec::new();
    let mut keys_seen: HashMap<String, syn::Ident> = HashMap::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let (rename, skip) = parse_field_attrs(field)?;
        let key = rename.unwrap_or_else(|| ident.unraw().to_string());
        if !skip {
            if let Some(previous) = keys_seen.insert(key.clone(), ident.clone()) {
                return Err(syn::Error::new_spanned(
                    field,
                    format!("key \"{key}\" is already used by field `{previous}`"),
                ));
            }
        }
        field_infos.push(FieldInfo {
            key,
            kind: get_field_kind(&field.ty),
            ident,
            skip,
        });
    }

    let all_idents: Vec<_> = field_infos.iter().map(|f| &f.ident).collect();
    let carried: Vec<_> = field_infos.iter().filter(|f| !f.skip).collect();

    let write_fields: Vec<_> = carried
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let key = &f.key;
            match f.kind {
                FieldKind::Value => quote! {
                    out.put(#key, ::core::clone::Clone::clone(&self.#ident));
                },
                FieldKind::ByteVec => quote! {
                    out.put_bytes(#key, self.#ident.as_slice());
                },
            }
        })
        .collect();

    // Read everything first so a failure leaves no half-assigned fields.
    let read_locals: Vec<_> = carried
        .iter()
        .map(|f| format_ident!("__bundle_{}", f.ident))
        .collect();
    let read_fields: Vec<_> = carried
        .iter()
        .zip(&read_locals)
        .map(|(f, local)| {
            let key = &f.key;
            match f.kind {
                FieldKind::Value => quote! {
                    let #local = data.get_as(#key)?;
                },
                FieldKind::ByteVec => quote! {
                    let #local = data.get_bytes(#key)?.to_vec();
                },
            }
        })
        .collect();
    let assign_fields: Vec<_> = carried
        .iter()
        .zip(&read_locals)
        .map(|(f, local)| {
            let ident = &f.ident;
            quote! { self.#ident = #local; }
        })
        .collect();

    let into_fields: Vec<_> = carried
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let key = &f.key;
            match f.kind {
                FieldKind::Value => quote! { data.put(#key, self.#ident); },
                FieldKind::ByteVec => quote! { data.put_bytes(#key, self.#ident); },
            }
        })
        .collect();

    let expanded = quote! {
        impl ::bundlewire::Bundleable for #name {
            fn type_identifier(&self) -> &str {
                #type_id
            }

            #[allow(unused_variables)]
            fn write_instance_data(
                &self,
                out: &mut ::bundlewire::InstanceData,
            ) -> ::core::result::Result<(), ::bundlewire::BundleError> {
                #(#write_fields)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn construct_from_instance_data(
                &mut self,
                data: &::bundlewire::InstanceData,
            ) -> ::core::result::Result<(), ::bundlewire::BundleError> {
                #(#read_fields)*
                #(#assign_fields)*
                ::core::result::Result::Ok(())
            }
        }

        impl ::bundlewire::RawInstance for #name {
            const TYPE_ID: &'static str = #type_id;

            fn raw_instance() -> Self {
                Self {
                    #(#all_idents: ::core::default::Default::default()),*
                }
            }
        }

        impl ::bundlewire::IntoInstanceValue for #name {
            #[allow(unused_mut)]
            fn into_instance_value(self) -> ::bundlewire::InstanceValue {
                let mut data = ::bundlewire::InstanceData::new();
                #(#into_fields)*
                ::bundlewire::InstanceValue::Data(data)
            }
        }

        impl ::bundlewire::FromInstanceValue for #name {
            fn from_instance_value(
                value: &::bundlewire::InstanceValue,
            ) -> ::core::result::Result<Self, ::bundlewire::BundleError> {
                match value {
                    ::bundlewire::InstanceValue::Data(data) => {
                        let mut instance = <Self as ::bundlewire::RawInstance>::raw_instance();
                        ::bundlewire::Bundleable::construct_from_instance_data(&mut instance, data)?;
                        ::core::result::Result::Ok(instance)
                    }
                    other => ::core::result::Result::Err(::bundlewire::BundleError::TypeMismatch {
                        key: ::std::string::String::new(),
                        expected: "data",
                        found: other.kind_name(),
                    }),
                }
            }
        }
    };

    Ok(expanded)
}

/// Identifier from `#[bundle(type_id = "...")]`, or the struct name.
fn parse_type_id(input: &DeriveInput) -> syn::Result<String> {
    let mut type_id = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("bundle")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_id") {
                let lit: LitStr = meta.value()?.parse()?;
                let value = lit.value();
                if value.is_empty() {
                    return Err(meta.error("type_id must not be empty"));
                }
                if value.len() > MAX_TYPE_ID_LEN {
                    return Err(meta.error(format!(
                        "type_id exceeds {MAX_TYPE_ID_LEN} bytes"
                    )));
                }
                type_id = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported struct attribute, expected `type_id`"))
            }
        })?;
    }
    Ok(type_id.unwrap_or_else(|| input.ident.to_string()))
}

/// `(rename, skip)` from the field's `#[bundle(...)]` attributes.
fn parse_field_attrs(field: &syn::Field) -> syn::Result<(Option<String>, bool)> {
    let mut rename = None;
    let mut skip = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bundle")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `rename` or `skip`"))
            }
        })?;
    }
    Ok((rename, skip))
}

/// `Vec<u8>` gets the compact byte-array encoding; everything else goes
/// through the value conversions.
fn get_field_kind(ty: &Type) -> FieldKind {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Vec" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(Type::Path(inner))) = args.args.first() {
                        if inner.path.is_ident("u8") {
                            return FieldKind::ByteVec;
                        }
                    }
                }
            }
        }
    }
    FieldKind::Value
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        match expand(&input) {
            Ok(_) => panic!("expected the derive to fail"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_rename_collision_rejected() {
        let msg = expand_err(parse_quote! {
            struct Sample {
                #[bundle(rename = "v")]
                a: i32,
                #[bundle(rename = "v")]
                b: i32,
            }
        });
        assert!(msg.contains("key \"v\" is already used by field `a`"), "{}", msg);
    }

    #[test]
    fn test_rename_onto_field_name_rejected() {
        let msg = expand_err(parse_quote! {
            struct Sample {
                x: i32,
                #[bundle(rename = "x")]
                y: i32,
            }
        });
        assert!(msg.contains("key \"x\""), "{}", msg);
    }

    #[test]
    fn test_skipped_field_does_not_collide() {
        let input: DeriveInput = parse_quote! {
            struct Sample {
                x: i32,
                #[bundle(rename = "x", skip)]
                shadow: i32,
            }
        };
        assert!(expand(&input).is_ok());
    }

    #[test]
    fn test_raw_identifier_key() {
        let input: DeriveInput = parse_quote! {
            struct Sample {
                r#type: i32,
            }
        };
        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("\"type\""), "{}", tokens);
        assert!(!tokens.contains("\"r#type\""), "{}", tokens);
    }
}
