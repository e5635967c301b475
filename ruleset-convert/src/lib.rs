//! Traffic rule list conversion and merging.
//!
//! Rule lists are line-oriented `TYPE,VALUE[,OPTION]` files. This crate turns
//! them into sing-box JSON rule-sets and clash YAML payloads, aggregates
//! rule-sets, overlays `key,value` lists onto JSON documents and maintains
//! plain domain lists.
//!
//! # Modules
//!
//! - [`list`]: rule list and `key,value` list parsing
//! - [`rule_types`]: rule type table loaded from TOML, with embedded defaults
//! - [`singbox`]: list → JSON rule-set
//! - [`clash`]: list → YAML payload, merged payload files
//! - [`aggregate`]: union of several JSON rule-sets
//! - [`optimize`]: domain list merge and suffix pruning
//! - [`check`]: list sanity checks
//! - [`sources`]: sources files naming input lists
//! - [`inspect`]: document tree rendering
//! - [`report`]: colored console summaries
//!
//! Document parsing, writing and the non-overwriting merge live in
//! `ruleset-tree`.

pub mod aggregate;
pub mod check;
pub mod clash;
pub mod inspect;
pub mod list;
pub mod optimize;
pub mod report;
pub mod rule_types;
pub mod singbox;
pub mod sources;
