//! Rule list to clash YAML payload conversion.

use std::collections::{BTreeMap, HashSet};

use ruleset_tree::{write_yaml, Document, Mapping, WriteError};
use serde::Serialize;

use crate::list::{ListMetadata, RuleLine, RuleList};
use crate::rule_types::RuleTypeTable;

/// Rules of one type in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub rule_type: String,
    pub count: usize,
}

/// A converted payload file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub metadata: ListMetadata,
    /// `TYPE,VALUE` entries in source order.
    pub entries: Vec<String>,
    /// Known types that clash payloads do not accept.
    pub unsupported: Vec<RuleLine>,
    /// Types missing from the rule type table.
    pub unknown: Vec<RuleLine>,
}

impl Payload {
    pub fn counts(&self) -> Vec<TypeCount> {
        count_types(&self.entries)
    }
}

/// Several payloads combined with duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedPayload {
    pub sources: Vec<String>,
    pub entries: Vec<String>,
}

impl MergedPayload {
    pub fn counts(&self) -> Vec<TypeCount> {
        count_types(&self.entries)
    }
}

/// Keep the rules whose type is accepted in payloads.
pub fn build_payload(list: &RuleList, table: &RuleTypeTable) -> Payload {
    let mut payload = Payload {
        metadata: list.metadata.clone(),
        ..Payload::default()
    };

    for rule in &list.rules {
        match table.get(&rule.rule_type) {
            Some(rule_type) if rule_type.payload => payload.entries.push(rule.payload_entry()),
            Some(_) => payload.unsupported.push(rule.clone()),
            None => payload.unknown.push(rule.clone()),
        }
    }

    payload
}

/// Render a payload file: metadata comment header, then `payload:`.
pub fn render_payload(payload: &Payload) -> Result<String, WriteError> {
    let meta = &payload.metadata;
    let mut header = vec![
        format!("# NAME: {}", meta.name),
        format!("# AUTHOR: {}", meta.author),
        format!("# REPO: {}", meta.repo),
        format!("# UPDATED: {}", meta.updated),
    ];
    for count in payload.counts() {
        header.push(format!("# {}: {}", count.rule_type, count.count));
    }
    header.push(format!("# TOTAL: {}", payload.entries.len()));

    with_header(&header, &payload.entries)
}

/// Combine payloads in order, keeping the first occurrence of each entry.
pub fn merge_payloads(payloads: &[(String, Payload)]) -> MergedPayload {
    let mut merged = MergedPayload::default();
    let mut seen = HashSet::new();

    for (source, payload) in payloads {
        merged.sources.push(source.clone());
        for entry in &payload.entries {
            if seen.insert(entry.as_str()) {
                merged.entries.push(entry.clone());
            }
        }
    }

    merged
}

/// Render the merged payload file with a per-source header.
pub fn render_merged_payload(merged: &MergedPayload, name: &str) -> Result<String, WriteError> {
    let mut header = vec![
        format!("# NAME: {name}"),
        "# AUTHOR: ruleset-convert".to_string(),
        format!("# TOTAL FILES: {}", merged.sources.len()),
    ];
    for source in &merged.sources {
        header.push(format!("# SOURCE: {source}"));
    }
    header.push("#".to_string());
    header.push("# Rule Statistics:".to_string());
    for count in merged.counts() {
        header.push(format!("# {}: {}", count.rule_type, count.count));
    }
    header.push(format!("# TOTAL: {}", merged.entries.len()));
    header.push("#".to_string());

    with_header(&header, &merged.entries)
}

fn with_header(header: &[String], entries: &[String]) -> Result<String, WriteError> {
    let items = entries
        .iter()
        .map(|entry| Document::from(entry.as_str()))
        .collect();
    let mut root = Mapping::new();
    root.insert("payload", Document::Sequence(items));

    let mut out = header.join("\n");
    out.push('\n');
    out.push_str(&write_yaml(&Document::Mapping(root))?);
    Ok(out)
}

fn count_types(entries: &[String]) -> Vec<TypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        let rule_type = entry.split(',').next().unwrap_or_default();
        *counts.entry(rule_type).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(rule_type, count)| TypeCount {
            rule_type: rule_type.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ruleset_tree::parse_yaml;

    use super::{build_payload, merge_payloads, render_merged_payload, render_payload};
    use crate::list::parse_rule_list;
    use crate::rule_types::default_rule_types;

    #[test]
    fn splits_supported_unsupported_and_unknown() {
        let list = parse_rule_list(
            "DOMAIN,a.com\nIP-CIDR,1.2.3.0/24,no-resolve\nUSER-AGENT,x\nFOO,bar\n",
        );
        let payload = build_payload(&list, &default_rule_types());

        assert_eq!(payload.entries, vec!["DOMAIN,a.com", "IP-CIDR,1.2.3.0/24"]);
        assert_eq!(payload.unsupported.len(), 1);
        assert_eq!(payload.unknown[0].line, 4);
    }

    #[test]
    fn rendered_payload_has_header_and_parses_back() {
        let list = parse_rule_list("# NAME: Demo\nDOMAIN,a.com\nDOMAIN-SUFFIX,b.org\n");
        let text = render_payload(&build_payload(&list, &default_rule_types())).expect("render");

        assert!(text.starts_with("# NAME: Demo\n# AUTHOR: \n"));
        assert!(text.contains("# DOMAIN: 1\n# DOMAIN-SUFFIX: 1\n# TOTAL: 2\n"));
        let doc = parse_yaml(&text).expect("yaml");
        assert_eq!(
            doc,
            parse_yaml("payload:\n  - DOMAIN,a.com\n  - DOMAIN-SUFFIX,b.org\n").expect("yaml")
        );
    }

    #[test]
    fn merged_payload_dedups_across_sources() {
        let table = default_rule_types();
        let a = build_payload(&parse_rule_list("DOMAIN,a.com\nDOMAIN,b.com\n"), &table);
        let b = build_payload(&parse_rule_list("DOMAIN,b.com\nGEOIP,CN\n"), &table);

        let merged = merge_payloads(&[("a.yaml".to_string(), a), ("b.yaml".to_string(), b)]);
        assert_eq!(merged.entries, vec!["DOMAIN,a.com", "DOMAIN,b.com", "GEOIP,CN"]);

        let text = render_merged_payload(&merged, "Merged").expect("render");
        assert!(text.contains("# TOTAL FILES: 2\n# SOURCE: a.yaml\n# SOURCE: b.yaml\n"));
        assert!(text.contains("# DOMAIN: 2\n# GEOIP: 1\n# TOTAL: 3\n"));
    }
}
