//! Wire fragments produced from option values.
//!
//! Query values follow the bracket convention GitLab-style APIs expect:
//!
//! | Value | Key | Pairs |
//! |-------|-----|-------|
//! | scalar | `state` | `state=opened` |
//! | list | `ids` | `ids[]=1`, `ids[]=2` |
//! | hash | `allowed_to_push` | `allowed_to_push[user_id]=5` |
//! | list of hashes | `variables` | `variables[0][key]=VAR1`, `variables[0][value]=hello` |

use std::path::PathBuf;

use crate::{Error, OptionLocation, Result, Value, value::json_scalar_string};

/// Name of the multipart part that carries an uploaded file.
pub const FILE_PART_NAME: &str = "file";

/// One wire-level piece of an encoded option.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A `name=value` query pair.
    Query(String, String),
    /// A top-level entry of the JSON body.
    Json(String, serde_json::Value),
    /// A multipart part whose content is read from `path` by the transport.
    File(String, PathBuf),
}

/// Encode `value` declared under `key` for the given location.
pub fn encode(key: &str, location: OptionLocation, value: &Value) -> Result<Vec<Fragment>> {
    match location {
        OptionLocation::Query => {
            let mut pairs = Vec::new();
            encode_query(key, key, value, &mut pairs)?;
            Ok(pairs
                .into_iter()
                .map(|(name, value)| Fragment::Query(name, value))
                .collect())
        }
        OptionLocation::Body => Ok(vec![Fragment::Json(key.to_string(), value.to_json(key)?)]),
        OptionLocation::File => match value {
            Value::File(path) => Ok(vec![Fragment::File(
                FILE_PART_NAME.to_string(),
                path.clone(),
            )]),
            Value::String(path) => Ok(vec![Fragment::File(
                FILE_PART_NAME.to_string(),
                PathBuf::from(path),
            )]),
            other => Err(Error::unsupported_value(
                key,
                location,
                format!("expected a file path, got {}", other.kind()),
            )),
        },
    }
}

/// Append the query pairs for `value` named `name` to `pairs`.
fn encode_query(
    key: &str,
    name: &str,
    value: &Value,
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    match value {
        Value::List(items) => encode_query_list(key, name, items.iter().map(ListItem::Value), pairs),
        Value::Hash(map) => encode_query_hash(key, name, map, pairs),
        Value::Json(json) => encode_query_json(key, name, json, pairs),
        Value::File(_) => Err(Error::unsupported_value(
            key,
            OptionLocation::Query,
            "file values can only be uploaded as multipart parts",
        )),
        scalar => {
            if let Some(text) = scalar.scalar_string() {
                pairs.push((name.to_string(), text));
            }
            Ok(())
        }
    }
}

/// Either a typed list element or a raw JSON array element.
enum ListItem<'a> {
    Value(&'a Value),
    Json(&'a serde_json::Value),
}

fn encode_query_list<'a>(
    key: &str,
    name: &str,
    items: impl Iterator<Item = ListItem<'a>>,
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    for (index, item) in items.enumerate() {
        match item {
            ListItem::Value(Value::Hash(map)) => {
                encode_query_hash(key, &format!("{name}[{index}]"), map, pairs)?;
            }
            ListItem::Json(serde_json::Value::Object(map)) => {
                encode_query_hash(key, &format!("{name}[{index}]"), map, pairs)?;
            }
            ListItem::Value(Value::Json(serde_json::Value::Object(map))) => {
                encode_query_hash(key, &format!("{name}[{index}]"), map, pairs)?;
            }
            ListItem::Value(value) if value.is_scalar() => {
                if let Some(text) = value.scalar_string() {
                    pairs.push((format!("{name}[]"), text));
                }
            }
            ListItem::Json(json) if !json.is_array() => {
                if let Some(text) = json_scalar_string(json) {
                    pairs.push((format!("{name}[]"), text));
                }
            }
            ListItem::Value(other) => {
                return Err(Error::unsupported_value(
                    key,
                    OptionLocation::Query,
                    format!("a {} inside a list has no query encoding", other.kind()),
                ));
            }
            ListItem::Json(_) => {
                return Err(Error::unsupported_value(
                    key,
                    OptionLocation::Query,
                    "a list inside a list has no query encoding",
                ));
            }
        }
    }
    Ok(())
}

fn encode_query_hash(
    key: &str,
    name: &str,
    map: &serde_json::Map<String, serde_json::Value>,
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    for (inner, value) in map {
        encode_query_json(key, &format!("{name}[{inner}]"), value, pairs)?;
    }
    Ok(())
}

fn encode_query_json(
    key: &str,
    name: &str,
    json: &serde_json::Value,
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    match json {
        serde_json::Value::Object(map) => encode_query_hash(key, name, map, pairs),
        serde_json::Value::Array(items) => {
            encode_query_list(key, name, items.iter().map(ListItem::Json), pairs)
        }
        scalar => {
            if let Some(text) = json_scalar_string(scalar) {
                pairs.push((name.to_string(), text));
            }
            Ok(())
        }
    }
}
