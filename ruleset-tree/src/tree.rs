use std::fmt::{self, Display, Formatter};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::path::{DocPath, PathSegment};

/// A numeric scalar as read from JSON or YAML.
///
/// Non-negative integers that fit in `i64` are always stored as [`Number::Int`]
/// so that the same literal compares equal regardless of the source format.
/// Floats compare by bit pattern, so `.nan` equals `.nan`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// Build a number from an unsigned integer, preferring the signed form.
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(signed) => Number::Int(signed),
            Err(_) => Number::UInt(value),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::UInt(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::String(s) => write!(f, "{s}"),
        }
    }
}

/// Ordered set of unique string keys.
///
/// Keys keep insertion order; replacing an existing key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Document)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Return a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> Option<Document> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove `key`, shifting later entries forward.
    pub fn remove(&mut self, key: &str) -> Option<Document> {
        let idx = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Document)> {
        self.into_iter()
    }
}

type EntryRef<'a> = (&'a String, &'a Document);

fn entry_ref(entry: &(String, Document)) -> EntryRef<'_> {
    (&entry.0, &entry.1)
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = EntryRef<'a>;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, Document)>,
        fn(&'a (String, Document)) -> EntryRef<'a>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(entry_ref as fn(&'a (String, Document)) -> EntryRef<'a>)
    }
}

impl<K: Into<String>> FromIterator<(K, Document)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, Document)>>(iter: T) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// A parsed YAML or JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Document>),
    Scalar(Scalar),
}

impl Document {
    pub fn null() -> Self {
        Document::Scalar(Scalar::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Document::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Document::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }

    /// Short shape name used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Mapping(_) => "mapping",
            Document::Sequence(_) => "sequence",
            Document::Scalar(_) => "scalar",
        }
    }

    /// Resolve a path relative to this node.
    pub fn get_path(&self, path: &DocPath) -> Option<&Document> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Document::Mapping(mapping)) => mapping.get(key)?,
                (PathSegment::Index(idx), Document::Sequence(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Resolve a path relative to this node for mutation.
    pub fn get_path_mut(&mut self, path: &DocPath) -> Option<&mut Document> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Document::Mapping(mapping)) => mapping.get_mut(key)?,
                (PathSegment::Index(idx), Document::Sequence(items)) => items.get_mut(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Scalar> for Document {
    fn from(value: Scalar) -> Self {
        Document::Scalar(value)
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Document::Mapping(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Document::Sequence(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::Scalar(Scalar::String(value))
    }
}

impl From<i32> for Document {
    fn from(value: i32) -> Self {
        Document::Scalar(Scalar::Number(Number::Int(value.into())))
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Scalar(Scalar::Number(Number::Int(value)))
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Document::Scalar(Scalar::Number(Number::Float(value)))
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Scalar(Scalar::Bool(value))
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(v) => serializer.serialize_i64(*v),
            Number::UInt(v) => serializer.serialize_u64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(v) => serializer.serialize_bool(*v),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Mapping(mapping) => mapping.serialize(serializer),
            Document::Sequence(items) => serializer.collect_seq(items),
            Document::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}
