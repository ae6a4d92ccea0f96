//! Endpoint path templates.
//!
//! An [`EndpointTemplate`] is a path such as `/projects/{id}/repository/commits/{sha}`.
//! Expansion fills the placeholders from the encoded query items; the items
//! whose names are not placeholders stay in the query string.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::{Captures, Regex};

use crate::{Error, Result};

/// Characters escaped in a substituted path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; `/` is escaped
/// so that a value like `group/project` stays a single segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").expect("valid placeholder pattern"));

/// A URL path pattern with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    /// Create a template from its path pattern.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Get the template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder names, in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.0)
            .filter_map(|caps| caps.get(1))
            .map(|name| name.as_str())
            .collect()
    }

    /// Substitute every placeholder with the escaped value of the query item
    /// of the same name. The first item wins when a name repeats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPathParameter`] when a placeholder has no value,
    /// and [`Error::InvalidRequest`] when a value is `.` or `..`, which URL
    /// parsing would resolve as a dot segment.
    pub fn expand(&self, query_items: &[(String, String)]) -> Result<String> {
        let mut values: HashMap<&str, &str> = HashMap::new();
        for (name, value) in query_items {
            values.entry(name.as_str()).or_insert(value.as_str());
        }

        let mut failure = None;
        let path = PLACEHOLDER.replace_all(&self.0, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |name| name.as_str());
            match values.get(name) {
                Some(&value) if is_dot_segment(value) => {
                    failure.get_or_insert_with(|| {
                        Error::invalid_request(format!(
                            "path parameter '{name}' of endpoint '{}' is the dot segment '{value}'",
                            self.as_str()
                        ))
                    });
                    String::new()
                }
                Some(value) => utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string(),
                None => {
                    failure.get_or_insert_with(|| Error::missing_path_parameter(name, self.as_str()));
                    String::new()
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(path.into_owned()),
        }
    }

    /// Query items not consumed by a placeholder, in their original order.
    #[must_use]
    pub fn residual_query_items(&self, query_items: &[(String, String)]) -> Vec<(String, String)> {
        let placeholders = self.placeholders();
        query_items
            .iter()
            .filter(|(name, _)| !placeholders.contains(&name.as_str()))
            .cloned()
            .collect()
    }
}

// `%2e` is decoded as `.` before dot segments are removed, so escaping does not help.
fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EndpointTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EndpointTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for EndpointTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn placeholders_in_order() {
        let template = EndpointTemplate::new("/projects/{id}/repository/commits/{sha}");
        assert_eq!(template.placeholders(), vec!["id", "sha"]);
        assert!(EndpointTemplate::new("/version").placeholders().is_empty());
    }

    #[test]
    fn expand_partitions_path_and_query() {
        let template = EndpointTemplate::new("/projects/{id}/repository/commits/{sha}");
        let supplied = items(&[("id", "42"), ("sha", "abc"), ("since", "2023-01-01")]);

        assert_eq!(
            template.expand(&supplied).expect("expand"),
            "/projects/42/repository/commits/abc"
        );
        assert_eq!(
            template.residual_query_items(&supplied),
            items(&[("since", "2023-01-01")])
        );
    }

    #[test]
    fn id_is_a_query_param_when_not_referenced() {
        let template = EndpointTemplate::new("/projects");
        let supplied = items(&[("id", "42")]);
        assert_eq!(template.expand(&supplied).expect("expand"), "/projects");
        assert_eq!(template.residual_query_items(&supplied), supplied);
    }

    #[test]
    fn values_are_escaped_as_one_segment() {
        let template = EndpointTemplate::new("/projects/{id}/repository/files/{file_path}");
        let supplied = items(&[("id", "group/project"), ("file_path", "docs/a b.md")]);
        assert_eq!(
            template.expand(&supplied).expect("expand"),
            "/projects/group%2Fproject/repository/files/docs%2Fa%20b.md"
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let template = EndpointTemplate::new("/users/{id}");
        let supplied = items(&[("id", "1"), ("id", "2")]);
        assert_eq!(template.expand(&supplied).expect("expand"), "/users/1");
        assert!(template.residual_query_items(&supplied).is_empty());
    }

    #[test]
    fn missing_placeholder_fails() {
        let template = EndpointTemplate::new("/projects/{id}/repository/commits/{sha}");
        let err = template
            .expand(&items(&[("id", "42")]))
            .expect_err("missing sha");
        assert!(matches!(
            err,
            Error::MissingPathParameter { ref name, .. } if name == "sha"
        ));
    }

    #[test]
    fn dot_segments_are_rejected() {
        let template = EndpointTemplate::new("/projects/{id}/issues");
        for id in [".", ".."] {
            let err = template.expand(&items(&[("id", id)])).expect_err("dot segment");
            assert!(matches!(err, Error::InvalidRequest(_)));
        }
        assert_eq!(
            template.expand(&items(&[("id", "...")])).expect("expand"),
            "/projects/.../issues"
        );
    }

    #[test]
    fn display_is_the_pattern() {
        let template = EndpointTemplate::from("/users/{id}");
        assert_eq!(template.to_string(), "/users/{id}");
        let s: &str = template.as_ref();
        assert_eq!(s, "/users/{id}");
    }
}
