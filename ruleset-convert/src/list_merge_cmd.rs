use anyhow::{Context, Result};
use ruleset_convert::list::read_key_values;
use ruleset_convert::report::{render_key_value_stats, render_written, warn};
use ruleset_tree::{merge_key_values, parse_file, write_file, Format};

use crate::cli::ListMergeArgs;
use crate::inputs::file_label;
use crate::path_guard::ensure_output_not_input;

pub fn run_list_merge(args: ListMergeArgs) -> Result<()> {
    ensure_output_not_input(&args.output, &[&args.list, &args.json])?;

    let list = read_key_values(&args.list)
        .with_context(|| format!("failed to load key/value list {}", args.list.display()))?;
    for line in &list.malformed {
        warn(format!(
            "{}:{line}: expected KEY,VALUE; line skipped",
            file_label(&args.list)
        ));
    }

    let target = parse_file(&args.json, Some(Format::Json))
        .with_context(|| format!("failed to parse {}", args.json.display()))?;
    let (merged, report) = merge_key_values(&target, &list.pairs);
    for key in &report.unapplied {
        warn(format!(
            "key '{key}' not applied: {} is not a JSON object",
            args.json.display()
        ));
    }

    write_file(&merged, &args.output, Format::Json)
        .with_context(|| format!("failed to write output {}", args.output.display()))?;

    if !args.quiet {
        println!("{}", render_key_value_stats(&report, list.malformed.len()));
        println!("{}", render_written(&args.output.display().to_string()));
    }
    Ok(())
}
