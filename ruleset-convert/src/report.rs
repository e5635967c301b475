use colored::Colorize;
use ruleset_tree::KeyValueReport;

use crate::aggregate::AggregateStats;
use crate::check::ListCheck;
use crate::clash::TypeCount;
use crate::optimize::OptimizeStats;
use crate::singbox::{GroupCount, RuleSetStats};

/// Print a yellow `warning: ...` line to stderr.
pub fn warn(message: impl AsRef<str>) {
    eprintln!("{} {}", "warning:".yellow(), message.as_ref());
}

/// Green line announcing a written file.
pub fn render_written(path: &str) -> String {
    format!("wrote {path}").green().to_string()
}

/// Per-file summary for a JSON rule-set.
pub fn render_rule_set_stats(label: &str, stats: &RuleSetStats) -> String {
    let total: usize = stats.groups.iter().map(|g| g.count).sum();
    let mut fields = group_fields(&stats.groups);
    fields.push(format!("total={total}"));
    fields.push(format!("ignored={}", stats.ignored));
    format!("rule_set {label}: {}", fields.join(" "))
}

pub fn render_aggregate_stats(label: &str, stats: &AggregateStats) -> String {
    let mut fields = vec![format!("inputs={}", stats.inputs)];
    fields.extend(group_fields(&stats.groups));
    fields.push(format!("total={}", stats.total));
    format!("aggregate_summary {label}: {}", fields.join(" "))
        .cyan()
        .to_string()
}

/// Per-file summary for a YAML payload.
pub fn render_payload_stats(label: &str, counts: &[TypeCount], unsupported: usize) -> String {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let mut fields: Vec<String> = counts
        .iter()
        .map(|c| format!("{}={}", c.rule_type, c.count))
        .collect();
    fields.push(format!("total={total}"));
    fields.push(format!("unsupported={unsupported}"));
    format!("payload {label}: {}", fields.join(" "))
}

pub fn render_key_value_stats(report: &KeyValueReport, malformed: usize) -> String {
    format!(
        "list_merge_summary updated={} unchanged={} inserted={} unapplied={} malformed={malformed}",
        report.updated,
        report.unchanged,
        report.inserted,
        report.unapplied.len()
    )
    .cyan()
    .to_string()
}

pub fn render_optimize_stats(stats: &OptimizeStats) -> String {
    format!(
        "optimize_summary existing={} new_domains={} suffixes={} merged={} removed={} output={}",
        stats.existing, stats.new_domains, stats.suffixes, stats.merged, stats.removed, stats.output
    )
    .cyan()
    .to_string()
}

/// One check line; green when the list passes, red otherwise.
pub fn render_check(label: &str, check: &ListCheck) -> String {
    let status = if check.passed { "PASS" } else { "FAIL" };
    let line = format!(
        "{status} {label}: total_lines={} valid_rules={} unknown_rules={} malformed_lines={}",
        check.total_lines, check.valid_rules, check.unknown_rules, check.malformed_lines
    );
    if check.passed {
        line.green().to_string()
    } else {
        line.red().to_string()
    }
}

fn group_fields(groups: &[GroupCount]) -> Vec<String> {
    groups
        .iter()
        .map(|g| format!("{}={}", g.key, g.count))
        .collect()
}
