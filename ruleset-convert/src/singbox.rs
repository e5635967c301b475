//! Rule list to sing-box JSON rule-set conversion.

use ruleset_tree::{Document, Mapping};
use serde::Serialize;

use crate::list::RuleList;
use crate::rule_types::RuleTypeTable;

/// Default `version` field written into rule-sets.
pub const DEFAULT_RULE_SET_VERSION: i64 = 2;

/// Number of values emitted under one rule-set key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSetStats {
    pub groups: Vec<GroupCount>,
    /// Rules whose type has no JSON key or is unknown.
    pub ignored: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub document: Document,
    pub stats: RuleSetStats,
}

/// Group rules by JSON key into `{"rules": [{key: [...]}, ...], "version": N}`.
///
/// Groups follow the table's key order and empty groups are left out. Values
/// keep first-seen order without repeats; rule options such as `no-resolve`
/// are dropped.
pub fn build_rule_set(list: &RuleList, table: &RuleTypeTable, version: i64) -> RuleSet {
    let mut groups: Vec<(&str, Vec<Document>)> = table
        .json_keys()
        .into_iter()
        .map(|key| (key, Vec::new()))
        .collect();
    let mut ignored = 0;

    for rule in &list.rules {
        let Some(key) = table.get(&rule.rule_type).and_then(|t| t.json_key.as_deref()) else {
            ignored += 1;
            continue;
        };
        let Some((_, values)) = groups.iter_mut().find(|(k, _)| *k == key) else {
            ignored += 1;
            continue;
        };
        let value = Document::from(rule.value.as_str());
        if !values.contains(&value) {
            values.push(value);
        }
    }

    let mut stats = RuleSetStats {
        ignored,
        ..RuleSetStats::default()
    };
    let mut rules = Vec::new();
    for (key, values) in groups {
        if values.is_empty() {
            continue;
        }
        stats.groups.push(GroupCount {
            key: key.to_string(),
            count: values.len(),
        });
        rules.push(rule_object(key, values));
    }

    RuleSet {
        document: rule_set_document(rules, version),
        stats,
    }
}

/// A single-key rule object `{key: [values]}`.
pub fn rule_object(key: &str, values: Vec<Document>) -> Document {
    let mut object = Mapping::new();
    object.insert(key, Document::Sequence(values));
    Document::Mapping(object)
}

/// Wrap rule objects into a versioned rule-set document.
pub fn rule_set_document(rules: Vec<Document>, version: i64) -> Document {
    let mut root = Mapping::new();
    root.insert("rules", Document::Sequence(rules));
    root.insert("version", Document::from(version));
    Document::Mapping(root)
}
