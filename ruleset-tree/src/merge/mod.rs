//! Non-overwriting document merges.

pub mod engine;
pub mod key_values;

pub use engine::{absorb_conflict, merge, union_sequences};
pub use key_values::{merge_key_values, KeyValueReport};
