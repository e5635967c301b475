//! Aggregation of several JSON rule-sets into one.

use std::cmp::Ordering;

use ruleset_tree::{union_sequences, Document};
use serde::Serialize;

use crate::singbox::{rule_object, rule_set_document, GroupCount};

/// Rule key dropped from the filtered variant.
pub const IP_CIDR_KEY: &str = "ip_cidr";

/// Values collected per rule key across every input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Groups in first-seen key order; values sorted and unique.
    pub groups: Vec<(String, Vec<Document>)>,
    /// Inputs that carried a `rules` sequence.
    pub used_inputs: usize,
    /// Problems found in individual inputs.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub inputs: usize,
    pub groups: Vec<GroupCount>,
    pub total: usize,
}

impl Aggregate {
    /// Rule-set holding every group.
    pub fn to_document(&self, version: i64) -> Document {
        self.to_document_excluding(&[], version)
    }

    /// Rule-set without the groups keyed by any of `excluded`.
    pub fn to_document_excluding(&self, excluded: &[&str], version: i64) -> Document {
        let rules = self
            .groups
            .iter()
            .filter(|(key, _)| !excluded.contains(&key.as_str()))
            .map(|(key, values)| rule_object(key, values.clone()))
            .collect();
        rule_set_document(rules, version)
    }

    pub fn stats(&self) -> AggregateStats {
        let groups: Vec<GroupCount> = self
            .groups
            .iter()
            .map(|(key, values)| GroupCount {
                key: key.clone(),
                count: values.len(),
            })
            .collect();
        AggregateStats {
            inputs: self.used_inputs,
            total: groups.iter().map(|g| g.count).sum(),
            groups,
        }
    }
}

/// Union the `rules` of each `(label, document)` input by rule key.
///
/// Each rule object contributes every key it holds; a non-sequence value
/// counts as a single entry. Inputs without a `rules` sequence are skipped
/// with a warning.
pub fn aggregate_rule_sets(inputs: &[(String, Document)]) -> Aggregate {
    let mut out = Aggregate::default();

    for (label, document) in inputs {
        let rules = match document.get("rules") {
            Some(Document::Sequence(rules)) => rules,
            Some(other) => {
                out.warnings.push(format!(
                    "{label}: `rules` is a {}, expected a sequence",
                    other.kind()
                ));
                continue;
            }
            None => {
                out.warnings.push(format!("{label}: missing `rules` key"));
                continue;
            }
        };
        out.used_inputs += 1;

        for (idx, rule) in rules.iter().enumerate() {
            let Some(object) = rule.as_mapping() else {
                out.warnings.push(format!(
                    "{label}: rules[{idx}] is a {}, expected a mapping",
                    rule.kind()
                ));
                continue;
            };
            for (key, value) in object {
                let incoming = match value {
                    Document::Sequence(items) => items.clone(),
                    single => vec![single.clone()],
                };
                match out.groups.iter_mut().find(|(k, _)| k == key) {
                    Some((_, values)) => *values = union_sequences(values, &incoming),
                    None => out
                        .groups
                        .push((key.clone(), union_sequences(&[], &incoming))),
                }
            }
        }
    }

    out.groups.retain(|(_, values)| !values.is_empty());
    for (_, values) in &mut out.groups {
        values.sort_by(compare_values);
    }
    out
}

// Scalars sort by their text; anything else keeps its relative order after them.
fn compare_values(a: &Document, b: &Document) -> Ordering {
    match (a.as_scalar(), b.as_scalar()) {
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ruleset_tree::{parse_json, Document};

    use super::{aggregate_rule_sets, IP_CIDR_KEY};

    fn input(label: &str, raw: &str) -> (String, Document) {
        (label.to_string(), parse_json(raw).expect("fixture parse"))
    }

    #[test]
    fn unions_sorts_and_dedups() {
        let agg = aggregate_rule_sets(&[
            input("a", r#"{"rules":[{"domain":["a.com"]}]}"#),
            input("b", r#"{"rules":[{"domain":["b.com","a.com"]}]}"#),
        ]);

        assert_eq!(
            agg.to_document(2),
            parse_json(r#"{"rules":[{"domain":["a.com","b.com"]}],"version":2}"#).expect("parse")
        );
        assert_eq!(agg.stats().total, 2);
    }

    #[test]
    fn filtered_variant_drops_ip_cidr() {
        let agg = aggregate_rule_sets(&[input(
            "a",
            r#"{"rules":[{"ip_cidr":["10.0.0.0/8"]},{"domain_suffix":["z.org","m.org"]}]}"#,
        )]);

        assert_eq!(
            agg.to_document_excluding(&[IP_CIDR_KEY], 2),
            parse_json(r#"{"rules":[{"domain_suffix":["m.org","z.org"]}],"version":2}"#)
                .expect("parse")
        );
    }

    #[test]
    fn missing_rules_is_a_warning() {
        let agg = aggregate_rule_sets(&[
            input("empty", r#"{"version": 2}"#),
            input("bad", r#"{"rules": {"domain": []}}"#),
            input("ok", r#"{"rules": [{"domain": "x.com"}, "junk"]}"#),
        ]);

        assert_eq!(agg.used_inputs, 1);
        assert_eq!(
            agg.warnings,
            vec![
                "empty: missing `rules` key".to_string(),
                "bad: `rules` is a mapping, expected a sequence".to_string(),
                "ok: rules[1] is a scalar, expected a mapping".to_string(),
            ]
        );
        assert_eq!(
            agg.to_document(2),
            parse_json(r#"{"rules":[{"domain":["x.com"]}],"version":2}"#).expect("parse")
        );
    }

    #[test]
    fn empty_groups_are_dropped() {
        let agg = aggregate_rule_sets(&[input("a", r#"{"rules":[{"domain":[]}]}"#)]);
        assert!(agg.groups.is_empty());
    }
}
