//! Multipart form data for file uploads.
//!
//! The engine only records *which* file goes into which part: file parts hold
//! a path until the transport reads the content with [`Form::load_files`].
//! Parts with in-memory data can be encoded right away.
//!
//! # Example
//!
//! ```
//! use tanuki_core::{Form, Part};
//!
//! let form = Form::with_boundary("b")
//!     .part(Part::text("name", "logo"))
//!     .part(Part::bytes("data", vec![1, 2, 3]));
//!
//! let (content_type, _body) = form.into_body().expect("no pending files");
//! assert_eq!(content_type, "multipart/form-data; boundary=b");
//! ```

use std::path::{Path, PathBuf};

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Error, Result};

/// Content of a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartData {
    /// Data already in memory.
    Bytes(Bytes),
    /// File on disk, not read yet.
    Path(PathBuf),
}

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: PartData,
}

impl Part {
    /// Create a new part with the given name and data.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: PartData::Bytes(data.into()),
        }
    }

    /// Text part, `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value.into()).with_content_type("text/plain; charset=utf-8")
    }

    /// Binary part, `application/octet-stream`.
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, data).with_content_type("application/octet-stream")
    }

    /// Part whose content is the file at `path`.
    ///
    /// The filename is the last path component and the content type is
    /// guessed from its extension.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let content_type = filename.as_deref().map(guess_content_type);
        Self {
            name: name.into(),
            filename,
            content_type,
            data: PartData::Path(path),
        }
    }

    /// Set the filename for this part.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type for this part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Part content.
    #[must_use]
    pub const fn data(&self) -> &PartData {
        &self.data
    }

    /// Path of a file part that has not been read yet.
    #[must_use]
    pub fn pending_path(&self) -> Option<&Path> {
        match &self.data {
            PartData::Path(path) => Some(path),
            PartData::Bytes(_) => None,
        }
    }
}

/// Guess the content type from a filename extension.
fn guess_content_type(filename: &str) -> String {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "yml" | "yaml" => "application/yaml",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" | "tgz" => "application/gzip",
        "patch" | "diff" => "text/x-diff",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// A multipart form containing multiple parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form with a generated boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Create a new form with a custom boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Append a part in place.
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts of this form.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `true` if the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// `multipart/form-data; boundary=<boundary>`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Replace every file part's path with the content returned by `read`.
    ///
    /// Transports call this with their own (possibly async-backed) reader
    /// before encoding the form.
    pub fn load_files<F>(self, mut read: F) -> Result<Self>
    where
        F: FnMut(&Path) -> std::io::Result<Bytes>,
    {
        let parts = self
            .parts
            .into_iter()
            .map(|mut part| {
                if let PartData::Path(path) = &part.data {
                    let content = read(path).map_err(|e| Error::file(path, e.to_string()))?;
                    part.data = PartData::Bytes(content);
                }
                Ok(part)
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            parts,
            boundary: self.boundary,
        })
    }

    /// Convert the form into `(content-type, body)`.
    ///
    /// Fails if a file part was never loaded.
    pub fn into_body(self) -> Result<(String, Bytes)> {
        let content_type = self.content_type();
        let body = self.encode()?;
        Ok((content_type, body))
    }

    fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            let data = match &part.data {
                PartData::Bytes(data) => data,
                PartData::Path(path) => {
                    return Err(Error::file(path, "file part was not loaded"));
                }
            };

            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        Ok(buf.freeze())
    }
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----TanukiBoundary{timestamp:x}")
}
