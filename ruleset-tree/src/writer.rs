use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::find::find_all;
use crate::parser::Format;
use crate::tree::{Document, Number, Scalar};

/// Errors that can occur while serializing a [`Document`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize JSON.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to serialize YAML.
    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Failed to write output file.
    #[error("failed to write document file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON has no representation for NaN or infinity.
    #[error("cannot write {value} at {path} as JSON")]
    NonFiniteFloat { path: String, value: String },
}

/// Serialize as pretty JSON (two-space indent, trailing newline).
///
/// NaN and infinite floats are rejected instead of being written as `null`.
pub fn write_json(doc: &Document) -> Result<String, WriteError> {
    if let Some(path) = find_all(doc, is_non_finite).into_iter().next() {
        let value = doc
            .get_path(&path)
            .and_then(Document::as_scalar)
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(WriteError::NonFiniteFloat {
            path: path.to_string(),
            value,
        });
    }
    let mut out = serde_json::to_string_pretty(doc)?;
    out.push('\n');
    Ok(out)
}

/// Serialize as block-style YAML.
pub fn write_yaml(doc: &Document) -> Result<String, WriteError> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Serialize in the given format.
pub fn write(doc: &Document, format: Format) -> Result<String, WriteError> {
    match format {
        Format::Json => write_json(doc),
        Format::Yaml => write_yaml(doc),
    }
}

/// Serialize `doc` and write it to `path`.
pub fn write_file(doc: &Document, path: &Path, format: Format) -> Result<(), WriteError> {
    let text = write(doc, format)?;
    fs::write(path, text)?;
    Ok(())
}

fn is_non_finite(node: &Document) -> bool {
    matches!(
        node,
        Document::Scalar(Scalar::Number(Number::Float(v))) if !v.is_finite()
    )
}
