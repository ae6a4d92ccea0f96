//! Procedural macros for the tanuki REST client.
//!
//! - `#[derive(Options)]` - statically declared option descriptors for a struct
//! - `#[derive(OptionEnum)]` - wire tokens for enum-like option values
//!
//! # Example
//!
//! ```ignore
//! use tanuki::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, OptionEnum)]
//! pub enum State { Opened, Closed, All }
//!
//! #[derive(Debug, Default, Options)]
//! pub struct ListIssues {
//!     #[option(query)]
//!     state: Option<State>,
//!     #[option(query)]
//!     labels: Option<Vec<String>>,
//! }
//! ```

mod enum_derive;
mod options_derive;
mod rename;

use proc_macro::TokenStream;

/// Derive `tanuki::Options` for a struct with named fields.
///
/// Each field becomes one option; `Option<T>` fields are unset when `None`,
/// other fields are always set. Field types must be `Clone` and convert into
/// `tanuki::Value`.
///
/// # Field attributes
///
/// - `#[option(query)]` (default), `#[option(body)]`, `#[option(file)]`: location
/// - `#[option(rename = "ref")]`: wire key
/// - `#[option(flatten)]`: embedded base collection, its options follow the own fields
/// - `#[option(custom)]`: a `Vec<OptionField>` of ad-hoc options
/// - `#[option(skip)]`: not an option
///
/// # Struct attributes
///
/// - `#[option(rename_all = "...")]`: case rule for keys without `rename`
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Options)]
/// struct CreateBranch {
///     #[option(body)]
///     branch: String,
///     #[option(body, rename = "ref")]
///     reference: String,
/// }
///
/// #[derive(Default, Options)]
/// struct CreateProtectedBranch {
///     #[option(flatten)]
///     base: CreateBranch,
///     #[option(query)]
///     allowed_to_push: Option<Vec<tanuki::Hash>>,
/// }
/// ```
#[proc_macro_derive(Options, attributes(option))]
pub fn derive_options(input: TokenStream) -> TokenStream {
    options_derive::expand_options_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive wire tokens for a field-less enum.
///
/// Generates `as_wire()`, `Display` and `From<Enum> for tanuki::Value`.
/// Tokens are the `snake_case` variant names unless changed with
/// `#[option(rename = "...")]` on a variant or `#[option(rename_all = "...")]`
/// on the enum.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, OptionEnum)]
/// enum OrderBy {
///     CreatedAt,
///     UpdatedAt,
///     #[option(rename = "last_activity_at")]
///     Activity,
/// }
///
/// assert_eq!(OrderBy::CreatedAt.as_wire(), "created_at");
/// ```
#[proc_macro_derive(OptionEnum, attributes(option))]
pub fn derive_option_enum(input: TokenStream) -> TokenStream {
    enum_derive::expand_option_enum_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
