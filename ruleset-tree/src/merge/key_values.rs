use serde::Serialize;

use crate::find::find_mappings_with_key;
use crate::merge::engine::absorb_conflict;
use crate::tree::Document;

/// Counters describing how a batch of key/value pairs was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyValueReport {
    /// Sites whose value changed.
    pub updated: usize,
    /// Sites that already held the value.
    pub unchanged: usize,
    /// Pairs added to the root because no site held the key.
    pub inserted: usize,
    /// Keys that had no site and could not be added to a non-mapping root.
    pub unapplied: Vec<String>,
}

/// Apply scalar `pairs` to every mapping in `target` that already holds the key.
///
/// Each site follows the keyed merge rule: an equal value is left alone, a
/// sequence gains the value once, anything else becomes `[existing, value]`.
/// Sites are updated deepest first so replacing an outer value never hides an
/// inner site. A key with no site is inserted at the root mapping.
pub fn merge_key_values(
    target: &Document,
    pairs: &[(String, Document)],
) -> (Document, KeyValueReport) {
    let mut out = target.clone();
    let mut report = KeyValueReport::default();

    for (key, value) in pairs {
        let mut sites = find_mappings_with_key(&out, key);

        if sites.is_empty() {
            match out.as_mapping_mut() {
                Some(root) => {
                    root.insert(key.as_str(), value.clone());
                    report.inserted += 1;
                }
                None => report.unapplied.push(key.clone()),
            }
            continue;
        }

        sites.sort_by(|a, b| b.depth().cmp(&a.depth()));
        for site in sites {
            let Some(mapping) = out.get_path_mut(&site).and_then(Document::as_mapping_mut) else {
                continue;
            };
            let Some(existing) = mapping.get(key) else {
                continue;
            };
            if existing == value {
                report.unchanged += 1;
                continue;
            }
            let merged = absorb_conflict(existing, value);
            mapping.insert(key.as_str(), merged);
            report.updated += 1;
        }
    }

    (out, report)
}
