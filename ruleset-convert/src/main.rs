use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ruleset_convert::inspect::render_tree;
use ruleset_convert::report::render_written;
use ruleset_tree::{merge, parse_file, write_file, Format};

mod aggregate_cmd;
mod cli;
mod inputs;
mod list_cmd;
mod list_merge_cmd;
mod optimize_cmd;
mod path_guard;

use cli::{Cli, Command, ConvertArgs, DocFormat, InspectArgs, MergeArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::ListMerge(args) => list_merge_cmd::run_list_merge(args),
        Command::ToJson(args) => list_cmd::run_to_json(args),
        Command::ToYaml(args) => list_cmd::run_to_yaml(args),
        Command::Aggregate(args) => aggregate_cmd::run_aggregate(args),
        Command::OptimizeDomains(args) => optimize_cmd::run_optimize(args),
        Command::Check(args) => list_cmd::run_check(args),
        Command::Convert(args) => run_convert(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    path_guard::ensure_output_not_input(&args.output, &[&args.base, &args.overlay])?;
    let out_format = output_format(&args.output, args.to)?;

    let base = parse_file(&args.base, args.base_format.map(Format::from))
        .with_context(|| format!("failed to parse {}", args.base.display()))?;
    let overlay = parse_file(&args.overlay, args.overlay_format.map(Format::from))
        .with_context(|| format!("failed to parse {}", args.overlay.display()))?;

    let merged = merge(&base, &overlay);
    write_file(&merged, &args.output, out_format)
        .with_context(|| format!("failed to write output {}", args.output.display()))?;

    if !args.quiet {
        println!("{}", render_written(&args.output.display().to_string()));
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    path_guard::ensure_output_not_input(&args.output, &[&args.input])?;
    let out_format = output_format(&args.output, args.to)?;

    let doc = parse_file(&args.input, args.from.map(Format::from))
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    write_file(&doc, &args.output, out_format)
        .with_context(|| format!("failed to write output {}", args.output.display()))?;

    println!("{}", render_written(&args.output.display().to_string()));
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let doc = parse_file(&args.file, args.format.map(Format::from))
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let target = if let Some(key) = &args.key {
        doc.get(key)
            .with_context(|| format!("key '{key}' not found"))?
    } else {
        &doc
    };

    print!("{}", render_tree(target, args.depth));
    Ok(())
}

fn output_format(path: &Path, explicit: Option<DocFormat>) -> Result<Format> {
    match explicit {
        Some(format) => Ok(format.into()),
        None => Format::from_path(path).with_context(|| {
            format!(
                "cannot infer output format of {}; use --to json|yaml",
                path.display()
            )
        }),
    }
}
