use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ruleset_convert::list::read_rule_list;
use ruleset_convert::optimize::{
    optimize_domains, parse_domain_list, render_domain_list, DomainRules,
};
use ruleset_convert::report::{render_optimize_stats, render_written, warn};

use crate::cli::OptimizeArgs;
use crate::inputs::collect_inputs;
use crate::path_guard::ensure_output_not_input;

pub fn run_optimize(args: OptimizeArgs) -> Result<()> {
    let inputs = collect_inputs(&args.lists)?;
    let input_refs: Vec<&Path> = inputs.iter().map(|p| p.as_path()).collect();
    // The existing list may be rewritten in place; only rule lists are protected.
    ensure_output_not_input(&args.output, &input_refs)?;

    let mut rules = DomainRules::default();
    for input in &inputs {
        match read_rule_list(input) {
            Ok(list) => rules.extend_from(&list),
            Err(err) => warn(format!("{err}; skipped")),
        }
    }

    let existing = match &args.existing {
        Some(path) if path.exists() => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read existing list {}", path.display()))?;
            parse_domain_list(&text)
        }
        _ => Default::default(),
    };

    let optimized = optimize_domains(&existing, &rules);
    fs::write(&args.output, render_domain_list(&optimized.domains))
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if !args.quiet {
        println!("{}", render_optimize_stats(&optimized.stats));
        println!("{}", render_written(&args.output.display().to_string()));
    }
    Ok(())
}
