use std::path::PathBuf;

use pretty_assertions::assert_eq;
use ruleset_tree::{merge, parse_file, parse_json, parse_yaml, Document};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn json(raw: &str) -> Document {
    parse_json(raw).expect("fixture JSON should parse")
}

#[test]
fn merge_yaml_fixtures_keeps_every_value() {
    let base = parse_file(&fixture("fixtures/base.yaml"), None).expect("base parse");
    let overlay = parse_file(&fixture("fixtures/overlay.yaml"), None).expect("overlay parse");

    let merged = merge(&base, &overlay);

    let expected = parse_yaml(
        r#"
name: proxy-rules
version: [2, 3]
settings:
  mode: rule
  dns:
    enable: true
    servers: [1.1.1.1, 8.8.8.8, 9.9.9.9]
  log-level: info
payload:
  - DOMAIN,example.com
  - DOMAIN-SUFFIX,google.com
  - DOMAIN-KEYWORD,youtube
"#,
    )
    .expect("expected parse");
    assert_eq!(merged, expected);
}

#[test]
fn new_keys_follow_base_keys_in_overlay_order() {
    let merged = merge(&json(r#"{"b": 1, "a": 2}"#), &json(r#"{"d": 3, "a": 2, "c": 4}"#));
    let keys: Vec<&str> = merged.as_mapping().expect("mapping").keys().collect();
    assert_eq!(keys, vec!["b", "a", "d", "c"]);
}

#[test]
fn mapping_and_sequence_of_different_shapes_are_kept_together() {
    let merged = merge(
        &json(r#"{"k": {"x": 1}}"#),
        &json(r#"{"k": [1, 2]}"#),
    );
    assert_eq!(merged, json(r#"{"k": [{"x": 1}, [1, 2]]}"#));
}

#[test]
fn deep_equal_nested_values_are_not_duplicated() {
    let merged = merge(
        &json(r#"{"k": [{"x": [1]}, "s"]}"#),
        &json(r#"{"k": [{"x": [1]}, "t"]}"#),
    );
    assert_eq!(merged, json(r#"{"k": [{"x": [1]}, "s", "t"]}"#));
}

#[test]
fn inputs_are_left_untouched() {
    let base = json(r#"{"a": {"b": 1}}"#);
    let overlay = json(r#"{"a": {"b": 2}}"#);
    let base_before = base.clone();
    let overlay_before = overlay.clone();

    let _ = merge(&base, &overlay);

    assert_eq!(base, base_before);
    assert_eq!(overlay, overlay_before);
}

#[test]
fn integer_and_float_are_distinct_values() {
    let merged = merge(&json(r#"{"n": 1}"#), &json(r#"{"n": 1.0}"#));
    assert_eq!(merged, json(r#"{"n": [1, 1.0]}"#));
}
