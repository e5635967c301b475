use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How one rule type is carried into each output format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleType {
    pub name: String,
    /// Field name in sing-box JSON rule-sets; `None` drops the type there.
    #[serde(default)]
    pub json_key: Option<String>,
    /// Kept in clash YAML payloads.
    #[serde(default)]
    pub payload: bool,
}

#[derive(Debug, Deserialize)]
struct RuleTypeFile {
    rule_type: Vec<RuleType>,
}

/// Errors returned when loading rule type files.
#[derive(Debug, Error)]
pub enum RuleTypeLoadError {
    #[error("failed to read rule types file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse rule types file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Lookup table of known rule types, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTypeTable {
    types: Vec<RuleType>,
}

impl RuleTypeTable {
    pub fn new(types: Vec<RuleType>) -> Self {
        let types = types
            .into_iter()
            .map(|t| RuleType {
                name: t.name.trim().to_ascii_uppercase(),
                ..t
            })
            .collect();
        Self { types }
    }

    /// Find a rule type by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&RuleType> {
        let wanted = name.trim().to_ascii_uppercase();
        self.types.iter().find(|t| t.name == wanted)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn types(&self) -> &[RuleType] {
        &self.types
    }

    /// Distinct JSON keys in declaration order.
    pub fn json_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.types.iter().filter_map(|t| t.json_key.as_deref()) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

/// Load a rule type table from a TOML file.
pub fn load_rule_types(path: &Path) -> Result<RuleTypeTable, RuleTypeLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| RuleTypeLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_rule_types(&raw, path.display().to_string())
}

/// Built-in rule types.
pub fn default_rule_types() -> RuleTypeTable {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/mappings/rule_types.toml"
    ));
    match parse_rule_types(embedded, "embedded rule types".to_string()) {
        Ok(table) if !table.types.is_empty() => table,
        _ => fallback_rule_types(),
    }
}

fn parse_rule_types(raw: &str, path: String) -> Result<RuleTypeTable, RuleTypeLoadError> {
    let parsed: RuleTypeFile =
        toml::from_str(raw).map_err(|source| RuleTypeLoadError::Parse { path, source })?;
    Ok(RuleTypeTable::new(parsed.rule_type))
}

fn fallback_rule_types() -> RuleTypeTable {
    let rule = |name: &str, json_key: Option<&str>, payload: bool| RuleType {
        name: name.to_string(),
        json_key: json_key.map(ToString::to_string),
        payload,
    };
    RuleTypeTable::new(vec![
        rule("DOMAIN", Some("domain"), true),
        rule("DOMAIN-KEYWORD", Some("domain_keyword"), true),
        rule("DOMAIN-SUFFIX", Some("domain_suffix"), true),
        rule("IP-CIDR", Some("ip_cidr"), true),
        rule("IP-CIDR6", Some("ip_cidr"), true),
        rule("DOMAIN-SET", None, true),
        rule("GEOIP", None, true),
        rule("IP-ASN", None, true),
        rule("USER-AGENT", None, false),
        rule("URL-REGEX", None, false),
        rule("PROCESS-NAME", None, false),
    ])
}
