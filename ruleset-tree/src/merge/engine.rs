use crate::tree::{Document, Mapping};

/// Merge `overlay` into `base` without discarding any value.
///
/// - mapping x mapping: keys are merged one by one (see below);
/// - sequence x sequence: `base` followed by overlay items it does not
///   already contain;
/// - anything else: `base` when both are equal, otherwise `[base, overlay]`.
///
/// Under a shared key, equal values are kept once, mappings recurse,
/// sequences are unioned, and any other conflict collects both values into a
/// sequence. An existing sequence absorbs a conflicting non-sequence value
/// instead of being wrapped.
pub fn merge(base: &Document, overlay: &Document) -> Document {
    match (base, overlay) {
        (Document::Mapping(base), Document::Mapping(overlay)) => {
            Document::Mapping(merge_mappings(base, overlay))
        }
        (Document::Sequence(base), Document::Sequence(overlay)) => {
            Document::Sequence(union_sequences(base, overlay))
        }
        _ if base == overlay => base.clone(),
        _ => Document::Sequence(vec![base.clone(), overlay.clone()]),
    }
}

/// Items of `base` followed by overlay items not yet in the result.
pub fn union_sequences(base: &[Document], overlay: &[Document]) -> Vec<Document> {
    let mut out = base.to_vec();
    for item in overlay {
        push_unique(&mut out, item);
    }
    out
}

/// Combine a conflicting `incoming` value into `existing`.
///
/// A sequence gains `incoming` unless it already holds it; anything else
/// becomes `[existing, incoming]`.
pub fn absorb_conflict(existing: &Document, incoming: &Document) -> Document {
    match existing {
        Document::Sequence(items) => {
            let mut items = items.clone();
            push_unique(&mut items, incoming);
            Document::Sequence(items)
        }
        _ => Document::Sequence(vec![existing.clone(), incoming.clone()]),
    }
}

fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut out = base.clone();
    for (key, incoming) in overlay {
        let merged = match out.get(key) {
            None => incoming.clone(),
            Some(existing) if existing == incoming => continue,
            Some(existing) => merge_keyed(existing, incoming),
        };
        out.insert(key.as_str(), merged);
    }
    out
}

fn merge_keyed(existing: &Document, incoming: &Document) -> Document {
    match (existing, incoming) {
        (Document::Mapping(existing), Document::Mapping(incoming)) => {
            Document::Mapping(merge_mappings(existing, incoming))
        }
        (Document::Sequence(existing), Document::Sequence(incoming)) => {
            Document::Sequence(union_sequences(existing, incoming))
        }
        _ => absorb_conflict(existing, incoming),
    }
}

fn push_unique(items: &mut Vec<Document>, item: &Document) {
    if !items.contains(item) {
        items.push(item.clone());
    }
}
