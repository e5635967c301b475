//! Plain domain list maintenance: merge `DOMAIN`/`DOMAIN-SUFFIX` rules into an
//! existing list and drop entries already covered by a suffix.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::list::RuleList;

/// `DOMAIN` and `DOMAIN-SUFFIX` values gathered from rule lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRules {
    pub domains: BTreeSet<String>,
    pub suffixes: BTreeSet<String>,
}

impl DomainRules {
    pub fn extend_from(&mut self, list: &RuleList) {
        for rule in &list.rules {
            match rule.rule_type.as_str() {
                "DOMAIN" => {
                    self.domains.insert(rule.value.clone());
                }
                "DOMAIN-SUFFIX" => {
                    self.suffixes.insert(rule.value.clone());
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizeStats {
    pub existing: usize,
    pub new_domains: usize,
    pub suffixes: usize,
    pub merged: usize,
    pub removed: usize,
    pub output: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedDomains {
    /// Sorted case-insensitively.
    pub domains: Vec<String>,
    pub stats: OptimizeStats,
}

/// Parse a plain domain file: one entry per line, `#` comments.
pub fn parse_domain_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// True when `domain` sits strictly below `suffix` (`a.example.com` under `example.com`).
pub fn is_subdomain_of(domain: &str, suffix: &str) -> bool {
    domain.len() > suffix.len()
        && domain.ends_with(suffix)
        && domain.as_bytes()[domain.len() - suffix.len() - 1] == b'.'
}

/// Union `existing`, rule domains and suffixes, then drop covered subdomains.
///
/// Suffixes themselves are kept as plain entries.
pub fn optimize_domains(existing: &BTreeSet<String>, rules: &DomainRules) -> OptimizedDomains {
    let mut merged: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
    merged.extend(rules.domains.iter().map(String::as_str));
    merged.extend(rules.suffixes.iter().map(String::as_str));

    let new_domains = rules
        .domains
        .iter()
        .filter(|d| !existing.contains(*d) && !rules.suffixes.contains(*d))
        .count();

    let mut domains: Vec<String> = merged
        .iter()
        .filter(|domain| !covered_by_suffix(domain, &rules.suffixes))
        .map(|domain| domain.to_string())
        .collect();
    domains.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });

    OptimizedDomains {
        stats: OptimizeStats {
            existing: existing.len(),
            new_domains,
            suffixes: rules.suffixes.len(),
            merged: merged.len(),
            removed: merged.len() - domains.len(),
            output: domains.len(),
        },
        domains,
    }
}

/// One domain per line with a trailing newline.
pub fn render_domain_list(domains: &[String]) -> String {
    let mut out = String::new();
    for domain in domains {
        out.push_str(domain);
        out.push('\n');
    }
    out
}

fn covered_by_suffix(domain: &str, suffixes: &BTreeSet<String>) -> bool {
    suffixes
        .iter()
        .any(|suffix| is_subdomain_of(domain, suffix))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::{is_subdomain_of, optimize_domains, parse_domain_list, DomainRules};
    use crate::list::parse_rule_list;

    #[test]
    fn subdomain_requires_label_boundary() {
        assert!(is_subdomain_of("www.example.com", "example.com"));
        assert!(!is_subdomain_of("example.com", "example.com"));
        assert!(!is_subdomain_of("badexample.com", "example.com"));
    }

    #[test]
    fn drops_covered_domains_and_keeps_suffixes() {
        let mut rules = DomainRules::default();
        rules.extend_from(&parse_rule_list(
            "DOMAIN,www.example.com\nDOMAIN,api.github.com\nDOMAIN-SUFFIX,example.com\nDOMAIN-KEYWORD,ads\n",
        ));
        let existing = parse_domain_list("# keep\nZeta.com\nalpha.io\nimg.cdn.example.com\n");

        let out = optimize_domains(&existing, &rules);

        assert_eq!(
            out.domains,
            vec!["alpha.io", "api.github.com", "example.com", "Zeta.com"]
        );
        assert_eq!(out.stats.removed, 2);
        assert_eq!(out.stats.new_domains, 2);
        assert_eq!(out.stats.merged, 6);
    }

    #[test]
    fn suffix_only_covers_whole_labels() {
        let mut rules = DomainRules::default();
        rules.extend_from(&parse_rule_list("DOMAIN-SUFFIX,example.com\n"));
        let existing = parse_domain_list("badexample.com\ncdn.example.com\n");

        let out = optimize_domains(&existing, &rules);

        assert_eq!(out.domains, vec!["badexample.com", "example.com"]);
        assert_eq!(out.stats.removed, 1);
    }

    #[test]
    fn empty_inputs_produce_empty_output() {
        let out = optimize_domains(&BTreeSet::new(), &DomainRules::default());
        assert!(out.domains.is_empty());
        assert_eq!(out.stats.output, 0);
    }
}
