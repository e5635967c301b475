//! Parsing of `TYPE,VALUE` rule lists and `key,value` override lists.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use ruleset_tree::{Document, Number, Scalar};
use serde::Serialize;
use thiserror::Error;

/// One rule line such as `IP-CIDR,10.0.0.0/8,no-resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// Upper-cased rule type.
    pub rule_type: String,
    pub value: String,
    /// Trailing fields such as `no-resolve`.
    pub options: Vec<String>,
}

impl RuleLine {
    /// `TYPE,VALUE` without trailing options.
    pub fn payload_entry(&self) -> String {
        format!("{},{}", self.rule_type, self.value)
    }
}

/// Header metadata carried in `# KEY: value` comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListMetadata {
    pub name: String,
    pub author: String,
    pub repo: String,
    pub updated: String,
}

/// A parsed rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleList {
    pub metadata: ListMetadata,
    pub rules: Vec<RuleLine>,
    /// Number of lines in the source text, comments and blanks included.
    pub total_lines: usize,
    /// Line numbers that held neither a comment nor a `TYPE,VALUE` rule.
    pub malformed: Vec<usize>,
}

/// `key,value` pairs ready for [`ruleset_tree::merge_key_values`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueList {
    pub pairs: Vec<(String, Document)>,
    pub malformed: Vec<usize>,
}

/// Errors raised while reading list files.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read list file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Read and parse a rule list file.
pub fn read_rule_list(path: &Path) -> Result<RuleList, ListError> {
    Ok(parse_rule_list(&read_text(path)?))
}

/// Read and parse a `key,value` list file.
pub fn read_key_values(path: &Path) -> Result<KeyValueList, ListError> {
    Ok(parse_key_values(&read_text(path)?))
}

pub(crate) fn read_text(path: &Path) -> Result<String, ListError> {
    fs::read_to_string(path).map_err(|source| ListError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse rule list text. Blank lines are skipped, `#` lines are comments.
pub fn parse_rule_list(text: &str) -> RuleList {
    let mut list = RuleList::default();

    for (idx, raw) in text.lines().enumerate() {
        list.total_lines += 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            read_metadata(comment, &mut list.metadata);
            continue;
        }

        let mut fields = line.split(',').map(str::trim);
        let rule_type = fields.next().unwrap_or_default().to_ascii_uppercase();
        let value = fields.next().unwrap_or_default().to_string();
        if rule_type.is_empty() || value.is_empty() {
            list.malformed.push(idx + 1);
            continue;
        }

        list.rules.push(RuleLine {
            line: idx + 1,
            rule_type,
            value,
            options: fields
                .filter(|f| !f.is_empty())
                .map(ToString::to_string)
                .collect(),
        });
    }

    list
}

fn read_metadata(comment: &str, metadata: &mut ListMetadata) {
    let Some((key, value)) = comment.split_once(':') else {
        return;
    };
    let value = value.trim().to_string();
    match key.trim().to_ascii_uppercase().as_str() {
        "NAME" => metadata.name = value,
        "AUTHOR" => metadata.author = value,
        "REPO" => metadata.repo = value,
        "UPDATED" => metadata.updated = value,
        _ => {}
    }
}

/// Parse `key,value` lines. Keys are lower-cased, values typed by [`typed_value`].
///
/// Lines are split at the first comma, so values may contain commas.
pub fn parse_key_values(text: &str) -> KeyValueList {
    let mut list = KeyValueList::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once(',') {
            Some((key, value)) if !key.trim().is_empty() => {
                list.pairs
                    .push((key.trim().to_lowercase(), typed_value(value.trim())));
            }
            _ => list.malformed.push(idx + 1),
        }
    }

    list
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("numeric pattern is valid"))
}

/// Type a raw list value: decimal literals become numbers, anything else a string.
pub fn typed_value(raw: &str) -> Document {
    if numeric_pattern().is_match(raw) {
        if !raw.contains('.') {
            if let Ok(int) = raw.parse::<i64>() {
                return Scalar::Number(Number::Int(int)).into();
            }
        }
        if let Ok(float) = raw.parse::<f64>() {
            return Scalar::Number(Number::Float(float)).into();
        }
    }
    Document::from(raw)
}

#[cfg(test)]
mod tests {
    use ruleset_tree::Document;

    use super::{parse_key_values, parse_rule_list, typed_value};

    #[test]
    fn rule_lines_keep_options_and_metadata() {
        let list = parse_rule_list(
            "# NAME: Proxy\n# AUTHOR: ops\n\ndomain-suffix, example.com \nIP-CIDR,10.0.0.0/8,no-resolve\nbroken\n",
        );

        assert_eq!(list.metadata.name, "Proxy");
        assert_eq!(list.metadata.author, "ops");
        assert_eq!(list.total_lines, 6);
        assert_eq!(list.malformed, vec![6]);
        assert_eq!(list.rules.len(), 2);
        assert_eq!(list.rules[0].rule_type, "DOMAIN-SUFFIX");
        assert_eq!(list.rules[0].value, "example.com");
        assert_eq!(list.rules[0].line, 4);
        assert_eq!(list.rules[1].options, vec!["no-resolve".to_string()]);
        assert_eq!(list.rules[1].payload_entry(), "IP-CIDR,10.0.0.0/8");
    }

    #[test]
    fn key_values_are_lowercased_and_typed() {
        let list = parse_key_values("Name,Jane\nage,30\nratio,-0.5\nnote,a,b\nnocomma\n");

        assert_eq!(
            list.pairs,
            vec![
                ("name".to_string(), Document::from("Jane")),
                ("age".to_string(), Document::from(30)),
                ("ratio".to_string(), Document::from(-0.5)),
                ("note".to_string(), Document::from("a,b")),
            ]
        );
        assert_eq!(list.malformed, vec![5]);
    }

    #[test]
    fn numeric_typing_follows_pattern() {
        assert_eq!(typed_value("42"), Document::from(42));
        assert_eq!(typed_value("1.50"), Document::from(1.5));
        assert_eq!(typed_value("1."), Document::from("1."));
        assert_eq!(typed_value("+3"), Document::from("+3"));
        assert_eq!(typed_value("1e3"), Document::from("1e3"));
        assert_eq!(typed_value(""), Document::from(""));
    }

    #[test]
    fn oversized_integers_fall_back_to_float() {
        let out = typed_value("99999999999999999999");
        assert_eq!(out, Document::from(99999999999999999999.0));
    }
}
