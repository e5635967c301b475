use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::tree::{Document, Mapping, Number, Scalar};

/// Serialization formats understood by the parser and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infer a format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// Errors that can occur while parsing text into a [`Document`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not valid JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Input was not valid YAML.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Failed to read input file.
    #[error("failed to read document file: {0}")]
    Io(#[from] std::io::Error),
    /// No format was given and none could be inferred from the file name.
    #[error("cannot infer document format of {0}; expected .json, .yaml or .yml")]
    UnknownFormat(String),
}

/// Parse JSON text into a [`Document`].
pub fn parse_json(input: &str) -> Result<Document, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(from_json(value))
}

/// Parse YAML text into a [`Document`]. An empty stream yields null.
pub fn parse_yaml(input: &str) -> Result<Document, ParseError> {
    if input.trim().is_empty() {
        return Ok(Document::null());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(input)?;
    from_yaml(value)
}

/// Parse text in the given format.
pub fn parse(input: &str, format: Format) -> Result<Document, ParseError> {
    match format {
        Format::Json => parse_json(input),
        Format::Yaml => parse_yaml(input),
    }
}

/// Parse a file, inferring the format from its extension unless `format` is set.
pub fn parse_file(path: &Path, format: Option<Format>) -> Result<Document, ParseError> {
    let format = format
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| ParseError::UnknownFormat(path.display().to_string()))?;
    let raw = fs::read_to_string(path)?;
    parse(&raw, format)
}

fn from_json(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::null(),
        serde_json::Value::Bool(b) => Scalar::Bool(b).into(),
        serde_json::Value::Number(n) => Scalar::Number(json_number(&n)).into(),
        serde_json::Value::String(s) => Scalar::String(s).into(),
        serde_json::Value::Array(items) => {
            Document::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Document::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(v) = n.as_i64() {
        Number::Int(v)
    } else if let Some(v) = n.as_u64() {
        Number::from_u64(v)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn from_yaml(value: serde_yaml::Value) -> Result<Document, ParseError> {
    Ok(match value {
        serde_yaml::Value::Null => Document::null(),
        serde_yaml::Value::Bool(b) => Scalar::Bool(b).into(),
        serde_yaml::Value::Number(n) => Scalar::Number(yaml_number(&n)).into(),
        serde_yaml::Value::String(s) => Scalar::String(s).into(),
        serde_yaml::Value::Sequence(items) => Document::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, value) in map {
                out.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Document::Mapping(out)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Number {
    if let Some(v) = n.as_i64() {
        Number::Int(v)
    } else if let Some(v) = n.as_u64() {
        Number::from_u64(v)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

// Mapping keys are strings; scalar keys such as `1:` or `true:` keep their text.
fn yaml_key(key: serde_yaml::Value) -> Result<String, ParseError> {
    Ok(match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value)?,
        complex => serde_yaml::to_string(&complex)?.trim_end().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_yaml, Format};
    use crate::tree::Document;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("rules.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("rules.list")), None);
    }

    #[test]
    fn yaml_scalar_keys_become_strings() {
        let doc = parse_yaml("1: one\ntrue: yes\n").expect("parse");
        let mapping = doc.as_mapping().expect("mapping");
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["1", "true"]);
    }

    #[test]
    fn empty_yaml_is_null() {
        assert_eq!(parse_yaml("  \n").expect("parse"), Document::null());
    }
}
