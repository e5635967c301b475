use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ruleset_convert::aggregate::aggregate_rule_sets;
use ruleset_convert::check::{check_rule_list, ListCheck};
use ruleset_convert::clash::{build_payload, merge_payloads, render_merged_payload, render_payload};
use ruleset_convert::list::{read_rule_list, RuleList};
use ruleset_convert::report::{
    render_aggregate_stats, render_check, render_payload_stats, render_rule_set_stats,
    render_written, warn,
};
use ruleset_convert::rule_types::RuleTypeTable;
use ruleset_convert::singbox::build_rule_set;
use ruleset_tree::{write_json, Document};
use serde::Serialize;

use crate::cli::{CheckArgs, OutputFormat, ToJsonArgs, ToYamlArgs};
use crate::inputs::{collect_inputs, file_label, output_path, resolve_rule_types};
use crate::path_guard::ensure_output_not_input;

const UNSUPPORTED_PREVIEW: usize = 5;

pub fn run_to_json(args: ToJsonArgs) -> Result<()> {
    let inputs = collect_inputs(&args.lists)?;
    let (table, source) = resolve_rule_types(args.rule_types.as_deref());
    prepare_output_dir(&args.output_dir)?;
    if !args.quiet {
        println!("Using rule types: {source}");
    }

    let mut converted: Vec<(String, Document)> = Vec::new();
    let mut claimed = HashSet::new();
    for input in &inputs {
        let Some(list) = load_checked(input, &table) else {
            continue;
        };
        let out = output_path(&args.output_dir, input, "json");
        if !claim_output(&mut claimed, input, &out) {
            continue;
        }
        let label = file_label(input);
        let rule_set = build_rule_set(&list, &table, args.rule_set_version);

        write_output(&out, &write_json(&rule_set.document)?, &inputs)?;
        if !args.quiet {
            println!("{}", render_rule_set_stats(&label, &rule_set.stats));
            println!("{}", render_written(&out.display().to_string()));
        }
        converted.push((label, rule_set.document));
    }

    if args.no_merge || converted.is_empty() {
        return Ok(());
    }

    let aggregate = aggregate_rule_sets(&converted);
    for warning in &aggregate.warnings {
        warn(warning);
    }
    let merged = aggregate.to_document(args.rule_set_version);
    let out = args.output_dir.join(&args.merged_name);
    write_output(&out, &write_json(&merged)?, &inputs)?;
    if !args.quiet {
        println!("{}", render_aggregate_stats(&args.merged_name, &aggregate.stats()));
        println!("{}", render_written(&out.display().to_string()));
    }
    Ok(())
}

pub fn run_to_yaml(args: ToYamlArgs) -> Result<()> {
    let inputs = collect_inputs(&args.lists)?;
    let (table, source) = resolve_rule_types(args.rule_types.as_deref());
    prepare_output_dir(&args.output_dir)?;
    if !args.quiet {
        println!("Using rule types: {source}");
    }

    let mut payloads = Vec::new();
    let mut claimed = HashSet::new();
    for input in &inputs {
        let Some(list) = load_checked(input, &table) else {
            continue;
        };
        let out = output_path(&args.output_dir, input, "yaml");
        if !claim_output(&mut claimed, input, &out) {
            continue;
        }
        let label = file_label(input);
        let payload = build_payload(&list, &table);

        for rule in &payload.unknown {
            warn(format!(
                "{label}:{}: unknown rule type {}",
                rule.line, rule.rule_type
            ));
        }
        if !payload.unsupported.is_empty() {
            let preview: Vec<String> = payload
                .unsupported
                .iter()
                .take(UNSUPPORTED_PREVIEW)
                .map(|rule| rule.payload_entry())
                .collect();
            let more = payload.unsupported.len().saturating_sub(UNSUPPORTED_PREVIEW);
            let suffix = if more > 0 {
                format!(" (+{more} more)")
            } else {
                String::new()
            };
            warn(format!(
                "{label}: skipped {} rules unsupported in payloads: {}{suffix}",
                payload.unsupported.len(),
                preview.join(", ")
            ));
        }

        write_output(&out, &render_payload(&payload)?, &inputs)?;
        if !args.quiet {
            println!(
                "{}",
                render_payload_stats(&label, &payload.counts(), payload.unsupported.len())
            );
            println!("{}", render_written(&out.display().to_string()));
        }
        payloads.push((file_label(&out), payload));
    }

    if args.no_merge || payloads.is_empty() {
        return Ok(());
    }

    let merged = merge_payloads(&payloads);
    let name = Path::new(&args.merged_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.merged_name.clone());
    let out = args.output_dir.join(&args.merged_name);
    write_output(&out, &render_merged_payload(&merged, &name)?, &inputs)?;
    if !args.quiet {
        println!(
            "{}",
            render_payload_stats(&args.merged_name, &merged.counts(), 0)
        );
        println!("{}", render_written(&out.display().to_string()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckEntry {
    file: String,
    #[serde(flatten)]
    check: ListCheck,
}

pub fn run_check(args: CheckArgs) -> Result<()> {
    let inputs = collect_inputs(&args.lists)?;
    let (table, _) = resolve_rule_types(args.rule_types.as_deref());

    let mut entries = Vec::new();
    for input in &inputs {
        let list = read_rule_list(input)
            .with_context(|| format!("failed to check {}", input.display()))?;
        entries.push(CheckEntry {
            file: file_label(input),
            check: check_rule_list(&list, &table),
        });
    }

    match args.format {
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", render_check(&entry.file, &entry.check));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }

    let failed = entries.iter().filter(|e| !e.check.passed).count();
    if failed > 0 {
        bail!("check failed: {failed} of {} lists are empty", entries.len());
    }
    Ok(())
}

// Unreadable or empty lists are skipped with a warning so the batch continues.
fn load_checked(input: &Path, table: &RuleTypeTable) -> Option<RuleList> {
    let list = match read_rule_list(input) {
        Ok(list) => list,
        Err(err) => {
            warn(format!("{err}; skipped"));
            return None;
        }
    };
    if !check_rule_list(&list, table).passed {
        warn(format!("{}: empty list; skipped", input.display()));
        return None;
    }
    for line in &list.malformed {
        warn(format!("{}:{line}: malformed rule line", file_label(input)));
    }
    Some(list)
}

// Lists sharing a file stem map to the same output; the first one keeps it.
fn claim_output(claimed: &mut HashSet<PathBuf>, input: &Path, out: &Path) -> bool {
    if claimed.insert(out.to_path_buf()) {
        return true;
    }
    warn(format!(
        "{}: output {} already written for another list; skipped",
        input.display(),
        out.display()
    ));
    false
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

fn write_output(out: &Path, contents: &str, inputs: &[PathBuf]) -> Result<()> {
    let inputs: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
    ensure_output_not_input(out, &inputs)?;
    fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}
