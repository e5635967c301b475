use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ruleset_convert::report::warn;
use ruleset_convert::rule_types::{default_rule_types, load_rule_types, RuleTypeTable};
use ruleset_convert::sources::read_sources;

use crate::cli::ListInputs;

/// Direct inputs followed by the local entries of the sources file.
pub fn collect_inputs(lists: &ListInputs) -> Result<Vec<PathBuf>> {
    let mut paths = lists.inputs.clone();

    if let Some(sources_path) = &lists.sources {
        let sources = read_sources(sources_path)
            .with_context(|| format!("failed to load sources {}", sources_path.display()))?;
        for url in &sources.remote {
            warn(format!("skipping remote source {url}: downloads are not supported"));
        }
        paths.extend(sources.paths);
    }

    if paths.is_empty() {
        bail!("no input lists given; pass list files or --sources");
    }
    Ok(paths)
}

/// Rule type table from `path`, or the embedded one. A bad file falls back with a warning.
pub fn resolve_rule_types(path: Option<&Path>) -> (RuleTypeTable, String) {
    let Some(path) = path else {
        return (default_rule_types(), "embedded".to_string());
    };

    match load_rule_types(path) {
        Ok(table) => (table, format!("file:{}", path.display())),
        Err(err) => {
            warn(format!(
                "failed to load rule types from {} ({err}); using embedded defaults",
                path.display()
            ));
            (default_rule_types(), "embedded".to_string())
        }
    }
}

/// File name used in console output and merged headers.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `dir/<input stem>.<extension>`.
pub fn output_path(dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rules".to_string());
    dir.join(format!("{stem}.{extension}"))
}
