use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse output paths that resolve to one of the inputs.
pub fn ensure_output_not_input(output: &Path, inputs: &[&Path]) -> Result<()> {
    let out_norm = resolve(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;

    for input in inputs {
        let in_norm = resolve(input)
            .with_context(|| format!("failed to resolve input path {}", input.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite source file: output {} matches input {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not written yet: resolve the parent directory when it exists.
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().context("current_dir")?.join(path)
    };
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(parent
            .canonicalize()
            .with_context(|| format!("canonicalize {}", parent.display()))?
            .join(name)),
        _ => Ok(absolute),
    }
}
