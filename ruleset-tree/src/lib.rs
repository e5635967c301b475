//! Ordered YAML/JSON document trees and the non-overwriting merge used by the
//! rule list tools.

pub mod find;
pub mod merge;
pub mod parser;
pub mod path;
pub mod tree;
pub mod writer;

pub use find::{find_all, find_mappings_with_key};
pub use merge::{absorb_conflict, merge, merge_key_values, union_sequences, KeyValueReport};
pub use parser::{parse, parse_file, parse_json, parse_yaml, Format, ParseError};
pub use path::{DocPath, PathSegment};
pub use tree::{Document, Mapping, Number, Scalar};
pub use writer::{write, write_file, write_json, write_yaml, WriteError};
