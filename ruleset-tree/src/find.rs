use crate::path::DocPath;
use crate::tree::Document;

/// Return the path of every node in `tree` that satisfies `predicate`.
///
/// Nodes are visited in pre-order: a parent is reported before its children,
/// mapping entries in key order, sequence items in index order.
pub fn find_all<F>(tree: &Document, predicate: F) -> Vec<DocPath>
where
    F: Fn(&Document) -> bool,
{
    let mut out = Vec::new();
    walk(tree, DocPath::root(), &predicate, &mut out);
    out
}

/// Paths of every mapping that holds `key`, at any depth.
pub fn find_mappings_with_key(tree: &Document, key: &str) -> Vec<DocPath> {
    find_all(tree, |node| {
        node.as_mapping()
            .is_some_and(|mapping| mapping.contains_key(key))
    })
}

fn walk<F>(node: &Document, path: DocPath, predicate: &F, out: &mut Vec<DocPath>)
where
    F: Fn(&Document) -> bool,
{
    if predicate(node) {
        out.push(path.clone());
    }

    match node {
        Document::Mapping(mapping) => {
            for (key, child) in mapping {
                walk(child, path.key(key.as_str()), predicate, out);
            }
        }
        Document::Sequence(items) => {
            for (idx, child) in items.iter().enumerate() {
                walk(child, path.index(idx), predicate, out);
            }
        }
        Document::Scalar(_) => {}
    }
}
