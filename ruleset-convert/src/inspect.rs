use ruleset_tree::Document;

/// Render a document tree with a configurable max depth.
pub fn render_tree(doc: &Document, max_depth: usize) -> String {
    let mut out = format!("{}\n", describe(doc));
    render_children(doc, 1, max_depth, &mut out);
    out
}

fn render_children(node: &Document, depth: usize, max_depth: usize, out: &mut String) {
    if depth > max_depth {
        return;
    }
    let indent = "  ".repeat(depth);

    match node {
        Document::Mapping(mapping) => {
            for (key, child) in mapping {
                out.push_str(&format!("{indent}{key}: {}\n", describe(child)));
                render_children(child, depth + 1, max_depth, out);
            }
        }
        Document::Sequence(items) => {
            for (idx, child) in items.iter().enumerate() {
                out.push_str(&format!("{indent}[{idx}]: {}\n", describe(child)));
                render_children(child, depth + 1, max_depth, out);
            }
        }
        Document::Scalar(_) => {}
    }
}

fn describe(node: &Document) -> String {
    match node {
        Document::Mapping(mapping) => format!("mapping ({} keys)", mapping.len()),
        Document::Sequence(items) => format!("sequence ({} items)", items.len()),
        Document::Scalar(scalar) => scalar.to_string(),
    }
}
