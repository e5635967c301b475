use std::path::Path;

use anyhow::{bail, Context, Result};
use ruleset_convert::aggregate::{aggregate_rule_sets, IP_CIDR_KEY};
use ruleset_convert::report::{render_aggregate_stats, render_written, warn};
use ruleset_tree::{parse_file, write_file, Document, Format};

use crate::cli::AggregateArgs;
use crate::inputs::file_label;
use crate::path_guard::ensure_output_not_input;

pub fn run_aggregate(args: AggregateArgs) -> Result<()> {
    let inputs: Vec<&Path> = args.inputs.iter().map(|p| p.as_path()).collect();
    ensure_output_not_input(&args.output, &inputs)?;
    if let Some(path) = &args.without_ip_output {
        ensure_output_not_input(path, &inputs)?;
    }

    let mut documents: Vec<(String, Document)> = Vec::new();
    for input in &inputs {
        let format = Format::from_path(input).unwrap_or(Format::Json);
        match parse_file(input, Some(format)) {
            Ok(doc) => documents.push((file_label(input), doc)),
            Err(err) => warn(format!("{}: {err}; skipped", input.display())),
        }
    }

    let aggregate = aggregate_rule_sets(&documents);
    for warning in &aggregate.warnings {
        warn(warning);
    }
    if aggregate.used_inputs == 0 {
        bail!("no usable rule-sets among {} inputs", inputs.len());
    }

    let merged = aggregate.to_document(args.rule_set_version);
    write_file(&merged, &args.output, Format::Json)
        .with_context(|| format!("failed to write output {}", args.output.display()))?;
    if !args.quiet {
        println!(
            "{}",
            render_aggregate_stats(&file_label(&args.output), &aggregate.stats())
        );
        println!("{}", render_written(&args.output.display().to_string()));
    }

    if let Some(path) = &args.without_ip_output {
        let filtered = aggregate.to_document_excluding(&[IP_CIDR_KEY], args.rule_set_version);
        write_file(&filtered, path, Format::Json)
            .with_context(|| format!("failed to write output {}", path.display()))?;
        if !args.quiet {
            println!("{}", render_written(&path.display().to_string()));
        }
    }
    Ok(())
}
