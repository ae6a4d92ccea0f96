//! `#[derive(Options)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, Type, parse2};

use crate::rename::RenameRule;

/// Struct-level options parsed from `#[option(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct StructOptions {
    rename_all: Option<RenameRule>,
}

/// Where a field goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FieldKind {
    #[default]
    Query,
    Body,
    File,
    /// Embedded base collection.
    Flatten,
    /// `Vec<OptionField>` of ad-hoc options.
    Custom,
    Skip,
}

/// Field options parsed from `#[option(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct FieldOptions {
    kind: FieldKind,
    rename: Option<String>,
}

/// Expand the `#[derive(Options)]` macro.
pub fn expand_options_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_struct_options(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Options derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Options derive only supports structs",
            ));
        }
    };

    let mut own = Vec::new();
    let mut bases = Vec::new();
    let mut customs = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;

        match options.kind {
            FieldKind::Skip => {}
            FieldKind::Flatten => bases.push(field_name),
            FieldKind::Custom => customs.push(field_name),
            kind @ (FieldKind::Query | FieldKind::Body | FieldKind::File) => {
                let key = if let Some(rename) = options.rename {
                    rename
                } else if let Some(rule) = struct_options.rename_all {
                    rule.apply(&field_name.to_string())
                } else {
                    field_name.to_string()
                };
                own.push(generate_field(field_name, &field.ty, &key, kind));
            }
        }
    }

    Ok(quote! {
        impl #impl_generics ::tanuki::Options for #name #ty_generics #where_clause {
            fn declared(&self) -> ::std::vec::Vec<::tanuki::OptionField> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(fields.push(#own);)*
                #(fields.extend(::tanuki::Options::declared(&self.#bases));)*
                fields
            }

            fn custom(&self) -> ::std::vec::Vec<::tanuki::OptionField> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(fields.extend(::tanuki::Options::custom(&self.#bases));)*
                #(fields.extend(self.#customs.iter().cloned());)*
                fields
            }
        }
    })
}

/// Parse struct-level options from `#[option(...)]` attributes.
fn parse_struct_options(attrs: &[syn::Attribute]) -> syn::Result<StructOptions> {
    let mut options = StructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("option") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename_all = Some(RenameRule::from_lit(&value)?);
                Ok(())
            } else {
                Err(meta.error("expected `rename_all = \"...\"`"))
            }
        })?;
    }

    Ok(options)
}

/// Parse field options from `#[option(...)]` attributes.
fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("option") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let kind = if meta.path.is_ident("query") {
                FieldKind::Query
            } else if meta.path.is_ident("body") {
                FieldKind::Body
            } else if meta.path.is_ident("file") {
                FieldKind::File
            } else if meta.path.is_ident("flatten") {
                FieldKind::Flatten
            } else if meta.path.is_ident("custom") {
                FieldKind::Custom
            } else if meta.path.is_ident("skip") {
                FieldKind::Skip
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                return Ok(());
            } else {
                return Err(meta.error(
                    "expected one of `query`, `body`, `file`, `flatten`, `custom`, `skip`, `rename`",
                ));
            };
            options.kind = kind;
            Ok(())
        })?;
    }

    Ok(options)
}

/// Generate the `OptionField` expression for one declared field.
fn generate_field(
    field_name: &syn::Ident,
    field_ty: &Type,
    key: &str,
    kind: FieldKind,
) -> TokenStream {
    let location = match kind {
        FieldKind::Body => quote! { ::tanuki::OptionLocation::Body },
        FieldKind::File => quote! { ::tanuki::OptionLocation::File },
        _ => quote! { ::tanuki::OptionLocation::Query },
    };

    let value = if is_option_type(field_ty) {
        quote! {
            ::std::clone::Clone::clone(&self.#field_name)
                .map(::std::convert::Into::<::tanuki::Value>::into)
        }
    } else {
        quote! {
            ::std::option::Option::Some(::std::convert::Into::<::tanuki::Value>::into(
                ::std::clone::Clone::clone(&self.#field_name),
            ))
        }
    };

    quote! {
        ::tanuki::OptionField::new(#key, #location, #value)
    }
}

/// Check if a type is `Option<T>`.
fn is_option_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.path.segments.last()
            .is_some_and(|seg| seg.ident == "Option"))
}
