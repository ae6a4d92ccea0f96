//! Option collections and their encoded payload.
//!
//! A typed option struct implements [`Options`] (usually through
//! `#[derive(Options)]`) and lists its fields as [`OptionField`] descriptors.
//! [`OptionCollection`] adds the built-in `page` / `per_page` options and the
//! ad-hoc custom options, and encodes everything into an [`EncodedPayload`].
//!
//! Encoding order is fixed: declared options (own fields first, then embedded
//! base collections), then `page` and `per_page`, then custom options. Query
//! items with the same name are all kept; JSON fragments with the same key are
//! concatenated into one array.

use serde_json::Map;

use crate::{Form, Fragment, OptionField, OptionLocation, Part, Result, Value};

/// Key of the built-in page option.
pub const PAGE_KEY: &str = "page";
/// Key of the built-in page-size option.
pub const PER_PAGE_KEY: &str = "per_page";

/// A typed set of request options.
///
/// # Example
///
/// ```
/// use tanuki_core::{OptionField, OptionLocation, Options};
///
/// #[derive(Default)]
/// struct ListBranches {
///     search: Option<String>,
/// }
///
/// impl Options for ListBranches {
///     fn declared(&self) -> Vec<OptionField> {
///         vec![OptionField::new(
///             "search",
///             OptionLocation::Query,
///             self.search.clone().map(Into::into),
///         )]
///     }
/// }
/// ```
pub trait Options {
    /// Declared option descriptors: own fields first, in declaration order,
    /// then those of embedded base collections.
    fn declared(&self) -> Vec<OptionField>;

    /// Ad-hoc options outside the declared set.
    fn custom(&self) -> Vec<OptionField> {
        Vec::new()
    }
}

impl Options for () {
    fn declared(&self) -> Vec<OptionField> {
        Vec::new()
    }
}

/// Options of one API call, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionCollection {
    declared: Vec<OptionField>,
    page: OptionField,
    per_page: OptionField,
    custom: Vec<OptionField>,
}

impl Default for OptionCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Options> From<O> for OptionCollection {
    fn from(options: O) -> Self {
        Self::new()
            .with_declared(options.declared())
            .with_custom(options.custom())
    }
}

impl OptionCollection {
    /// Empty collection: no declared options, `page` and `per_page` unset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
            page: OptionField::empty(PAGE_KEY, OptionLocation::Query),
            per_page: OptionField::empty(PER_PAGE_KEY, OptionLocation::Query),
            custom: Vec::new(),
        }
    }

    /// Replace the declared options.
    #[must_use]
    pub fn with_declared(mut self, declared: Vec<OptionField>) -> Self {
        self.declared = declared;
        self
    }

    /// Replace the custom options.
    #[must_use]
    pub fn with_custom(mut self, custom: Vec<OptionField>) -> Self {
        self.custom = custom;
        self
    }

    /// Declared options.
    #[must_use]
    pub fn declared(&self) -> &[OptionField] {
        &self.declared
    }

    /// Custom options.
    #[must_use]
    pub fn custom(&self) -> &[OptionField] {
        &self.custom
    }

    /// Append a custom option.
    pub fn push_custom(&mut self, field: OptionField) {
        self.custom.push(field);
    }

    /// Requested page, if set.
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        page_number(&self.page)
    }

    /// Set the requested page.
    pub fn set_page(&mut self, page: u32) {
        self.page.set(page);
    }

    /// Requested page size, if set. The server default is 20.
    #[must_use]
    pub fn per_page(&self) -> Option<u32> {
        page_number(&self.per_page)
    }

    /// Set the requested page size.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page.set(per_page);
    }

    /// Every option in encoding order.
    pub fn fields(&self) -> impl Iterator<Item = &OptionField> {
        self.declared
            .iter()
            .chain([&self.page, &self.per_page])
            .chain(self.custom.iter())
    }

    /// Encode every set option.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedValue`] if a value has no encoding
    /// for its location.
    pub fn encode(&self) -> Result<EncodedPayload> {
        let mut payload = EncodedPayload::default();
        for field in self.fields() {
            for fragment in field.encode()? {
                payload.push(fragment);
            }
        }
        Ok(payload)
    }
}

fn page_number(field: &OptionField) -> Option<u32> {
    match field.value()? {
        Value::Unsigned(n) => u32::try_from(*n).ok(),
        Value::Int(n) => u32::try_from(*n).ok(),
        _ => None,
    }
}

/// Both values as one array; array values contribute their elements.
fn concat_json(previous: serde_json::Value, value: serde_json::Value) -> serde_json::Value {
    let mut items = match previous {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    match value {
        serde_json::Value::Array(more) => items.extend(more),
        other => items.push(other),
    }
    serde_json::Value::Array(items)
}

/// Result of encoding an [`OptionCollection`].
///
/// `json_body` and `multipart_form` are `None` when nothing was added, so an
/// absent body is distinguishable from an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedPayload {
    /// Query pairs, in encoding order.
    pub query_items: Vec<(String, String)>,
    /// Top-level JSON body entries.
    pub json_body: Option<Map<String, serde_json::Value>>,
    /// Multipart form with the file parts.
    pub multipart_form: Option<Form>,
}

impl EncodedPayload {
    fn push(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Query(name, value) => self.query_items.push((name, value)),
            Fragment::Json(key, value) => {
                let body = self.json_body.get_or_insert_with(Map::new);
                match body.remove(&key) {
                    Some(previous) => {
                        tracing::debug!(%key, "repeated JSON body key, values concatenated");
                        body.insert(key, concat_json(previous, value));
                    }
                    None => {
                        body.insert(key, value);
                    }
                }
            }
            Fragment::File(name, path) => {
                self.multipart_form
                    .get_or_insert_with(Form::new)
                    .push(Part::file(name, path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct CreateBranch {
        branch: Option<String>,
        reference: Option<String>,
    }

    impl Options for CreateBranch {
        fn declared(&self) -> Vec<OptionField> {
            vec![
                OptionField::new(
                    "branch",
                    OptionLocation::Body,
                    self.branch.clone().map(Into::into),
                ),
                OptionField::new(
                    "ref",
                    OptionLocation::Body,
                    self.reference.clone().map(Into::into),
                ),
            ]
        }
    }

    #[derive(Default)]
    struct ListCommits {
        since: Option<String>,
        with_stats: Option<bool>,
    }

    impl Options for ListCommits {
        fn declared(&self) -> Vec<OptionField> {
            vec![
                OptionField::new(
                    "since",
                    OptionLocation::Query,
                    self.since.clone().map(Into::into),
                ),
                OptionField::new(
                    "with_stats",
                    OptionLocation::Query,
                    self.with_stats.map(Into::into),
                ),
            ]
        }
    }

    // Extends a base set by embedding it.
    #[derive(Default)]
    struct ListProjectCommits {
        base: ListCommits,
        id: Option<u64>,
    }

    impl Options for ListProjectCommits {
        fn declared(&self) -> Vec<OptionField> {
            let mut fields = vec![OptionField::new(
                "id",
                OptionLocation::Query,
                self.id.map(Into::into),
            )];
            fields.extend(self.base.declared());
            fields
        }
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn unset_collection_encodes_to_nothing() {
        let payload = OptionCollection::from(ListCommits::default())
            .encode()
            .expect("encode");
        assert!(payload.query_items.is_empty());
        assert!(payload.json_body.is_none());
        assert!(payload.multipart_form.is_none());
        assert_eq!(payload, EncodedPayload::default());
    }

    #[test]
    fn embedded_base_fields_are_kept() {
        let options = ListProjectCommits {
            base: ListCommits {
                since: Some("2023-01-01".to_string()),
                with_stats: None,
            },
            id: Some(42),
        };
        let payload = OptionCollection::from(options).encode().expect("encode");
        assert_eq!(
            payload.query_items,
            vec![pair("id", "42"), pair("since", "2023-01-01")]
        );
    }

    #[test]
    fn page_follows_declared_and_custom_comes_last() {
        let options = ListCommits {
            since: None,
            with_stats: Some(true),
        };
        let mut collection = OptionCollection::from(options);
        collection.set_page(2);
        collection.set_per_page(50);
        collection.push_custom(OptionField::query("page", 9));

        assert_eq!(collection.page(), Some(2));
        assert_eq!(collection.per_page(), Some(50));

        let payload = collection.encode().expect("encode");
        assert_eq!(
            payload.query_items,
            vec![
                pair("with_stats", "true"),
                pair("page", "2"),
                pair("per_page", "50"),
                pair("page", "9"),
            ]
        );
    }

    #[test]
    fn body_fragments_merge_into_one_object() {
        let options = CreateBranch {
            branch: Some("feature".to_string()),
            reference: Some("main".to_string()),
        };
        let payload = OptionCollection::from(options).encode().expect("encode");
        assert!(payload.query_items.is_empty());
        assert_eq!(
            payload.json_body.map(serde_json::Value::Object),
            Some(json!({"branch": "feature", "ref": "main"}))
        );
    }

    #[test]
    fn repeated_body_key_concatenates() {
        let mut collection = OptionCollection::from(CreateBranch {
            branch: Some("feature".to_string()),
            reference: None,
        });
        collection.push_custom(OptionField::body("branch", "hotfix"));
        collection.push_custom(OptionField::body("branch", vec!["a", "b"]));

        let payload = collection.encode().expect("encode");
        assert_eq!(
            payload.json_body.map(serde_json::Value::Object),
            Some(json!({"branch": ["feature", "hotfix", "a", "b"]}))
        );
    }

    #[test]
    fn json_and_query_coexist() {
        let mut collection = OptionCollection::from(CreateBranch {
            branch: Some("feature".to_string()),
            reference: None,
        });
        collection.push_custom(OptionField::query("dry_run", true));

        let payload = collection.encode().expect("encode");
        assert_eq!(payload.query_items, vec![pair("dry_run", "true")]);
        assert!(payload.json_body.is_some());
    }

    #[test]
    fn file_option_becomes_form_part() {
        let mut collection = OptionCollection::new();
        collection.push_custom(OptionField::file("avatar", PathBuf::from("/tmp/a.png")));

        let payload = collection.encode().expect("encode");
        let form = payload.multipart_form.expect("form");
        assert_eq!(form.parts().len(), 1);
        assert_eq!(form.parts()[0].name(), "file");
        assert_eq!(
            form.parts()[0].pending_path(),
            Some(std::path::Path::new("/tmp/a.png"))
        );
        assert!(payload.json_body.is_none());
    }

    #[test]
    fn encoding_errors_propagate() {
        let mut collection = OptionCollection::new();
        collection.push_custom(OptionField::query("avatar", PathBuf::from("a.png")));
        assert!(collection.encode().is_err());
    }
}
