//! Declared request options.
//!
//! An [`OptionField`] is one named, typed slot of an API call. Its location is
//! fixed when it is declared; its value is set by the caller before the request
//! is built, and an unset field contributes nothing to the request.

use std::fmt;

use crate::{Fragment, Result, Value, encoding};

/// Where an option's encoded value is placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionLocation {
    /// Query string parameter(s).
    Query,
    /// Top-level entry of the JSON body.
    Body,
    /// Multipart file upload.
    File,
}

impl fmt::Display for OptionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::File => write!(f, "file"),
        }
    }
}

/// A single declared option: key, location and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionField {
    key: String,
    location: OptionLocation,
    value: Option<Value>,
}

impl OptionField {
    /// Declare an option with an optional initial value.
    #[must_use]
    pub fn new(key: impl Into<String>, location: OptionLocation, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            location,
            value,
        }
    }

    /// Declare an unset option.
    #[must_use]
    pub fn empty(key: impl Into<String>, location: OptionLocation) -> Self {
        Self::new(key, location, None)
    }

    /// A query option holding `value`.
    #[must_use]
    pub fn query(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, OptionLocation::Query, Some(value.into()))
    }

    /// A JSON body option holding `value`.
    #[must_use]
    pub fn body(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, OptionLocation::Body, Some(value.into()))
    }

    /// A file upload option holding `value` (a path).
    #[must_use]
    pub fn file(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, OptionLocation::File, Some(value.into()))
    }

    /// Option key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Option location.
    #[must_use]
    pub const fn location(&self) -> OptionLocation {
        self.location
    }

    /// Current value, if set.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns `true` if a value is set.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replace the current value.
    pub fn set(&mut self, value: impl Into<Value>) {
        self.value = Some(value.into());
    }

    /// Unset the value.
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Remove and return the current value.
    pub fn take(&mut self) -> Option<Value> {
        self.value.take()
    }

    /// Encode the current value; an unset option yields no fragments.
    pub fn encode(&self) -> Result<Vec<Fragment>> {
        match &self.value {
            Some(value) => encoding::encode(&self.key, self.location, value),
            None => Ok(Vec::new()),
        }
    }
}
