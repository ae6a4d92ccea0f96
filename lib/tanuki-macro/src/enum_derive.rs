//! `#[derive(OptionEnum)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, parse2};

use crate::rename::RenameRule;

/// Expand the `#[derive(OptionEnum)]` macro.
///
/// Variants map to `snake_case` wire tokens unless renamed.
pub fn expand_option_enum_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let syn::Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input,
            "OptionEnum derive only supports enums",
        ));
    };

    let rule = parse_rename_all(&input.attrs)?.unwrap_or(RenameRule::SnakeCase);

    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "OptionEnum variants cannot carry data",
            ));
        }
        let ident = &variant.ident;
        let token = parse_rename(&variant.attrs)?.unwrap_or_else(|| rule.apply(&ident.to_string()));
        arms.push(quote! { Self::#ident => #token });
    }

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Wire token of this value.
            #[must_use]
            pub const fn as_wire(&self) -> &'static str {
                match self {
                    #(#arms,)*
                }
            }
        }

        impl #impl_generics ::std::convert::From<#name #ty_generics> for ::tanuki::Value #where_clause {
            fn from(value: #name #ty_generics) -> Self {
                ::tanuki::Value::wire(value.as_wire())
            }
        }

        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    })
}

fn parse_rename_all(attrs: &[syn::Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut rule = None;
    for attr in attrs {
        if !attr.path().is_ident("option") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                rule = Some(RenameRule::from_lit(&value)?);
                Ok(())
            } else {
                Err(meta.error("expected `rename_all = \"...\"`"))
            }
        })?;
    }
    Ok(rule)
}

fn parse_rename(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("option") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"`"))
            }
        })?;
    }
    Ok(rename)
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn default_tokens_are_snake_case() {
        let output = expand_option_enum_derive(quote! {
            enum Scope { Projects, MergeRequests, #[option(rename = "wiki_blobs")] Wiki }
        })
        .expect("expand")
        .to_string();

        check!(output.contains("Self :: Projects => \"projects\""));
        check!(output.contains("Self :: MergeRequests => \"merge_requests\""));
        check!(output.contains("Self :: Wiki => \"wiki_blobs\""));
        check!(output.contains(":: tanuki :: Value :: wire"));
    }

    #[test]
    fn rename_all_overrides_default() {
        let output = expand_option_enum_derive(quote! {
            #[option(rename_all = "UPPERCASE")]
            enum Direction { Asc, Desc }
        })
        .expect("expand")
        .to_string();
        check!(output.contains("Self :: Asc => \"ASC\""));
    }

    #[test]
    fn rejects_data_variants() {
        let result = expand_option_enum_derive(quote! {
            enum Bad { A(u32) }
        });
        assert!(result.is_err());
    }

    #[test]
    fn rejects_structs() {
        let result = expand_option_enum_derive(quote! {
            struct NotAnEnum;
        });
        assert!(result.is_err());
    }
}
