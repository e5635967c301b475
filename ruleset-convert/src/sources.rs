use std::path::{Path, PathBuf};

use crate::list::{read_text, ListError};

/// Input lists named by a sources file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub paths: Vec<PathBuf>,
    /// `http://` and `https://` entries, which are not fetched.
    pub remote: Vec<String>,
}

/// Read a sources file: one path per line, `#` comments.
///
/// Relative paths resolve against the sources file's directory.
pub fn read_sources(path: &Path) -> Result<Sources, ListError> {
    let text = read_text(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_sources(&text, base))
}

pub fn parse_sources(text: &str, base: &Path) -> Sources {
    let mut sources = Sources::default();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("http://") || line.starts_with("https://") {
            sources.remote.push(line.to_string());
            continue;
        }
        sources.paths.push(base.join(line));
    }
    sources
}
