use crate::domain::HistError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum EnumerateError {
    #[error("invalid history glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to read history directory '{}': {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<EnumerateError> for HistError {
    fn from(error: EnumerateError) -> Self {
        let message = error.to_string();
        match error {
            EnumerateError::InvalidPattern { .. } => HistError::internal("SYS.HIST_GLOB", message),
            EnumerateError::ReadDirectory { .. } => {
                HistError::io_system("IO.HIST_ENUMERATE", message)
            }
        }
    }
}

/// File-name globs that select a model's history files in one directory.
///
/// Run output is named `<case>.<model>*.<ext>[.<instance>].nc`, optionally with
/// a `.<suffix>` appended by a move. Without a suffix the simpler baseline
/// names (`<model>.<ext>[.<instance>].nc`) are selected too.
pub fn hist_file_patterns(case_name: &str, model: &str, suffix: Option<&str>) -> Vec<String> {
    let case_name = globset::escape(case_name);
    let model = globset::escape(model);
    let suffix = suffix
        .filter(|suffix| !suffix.is_empty())
        .map(|suffix| format!(".{}", globset::escape(suffix)));
    let tail = suffix.as_deref().unwrap_or("");

    let mut patterns = vec![
        format!("{}.{}*.h?.nc{}", case_name, model, tail),
        format!("{}.{}*.h.nc{}", case_name, model, tail),
        format!("{}.{}*.h?.*.nc{}", case_name, model, tail),
        format!("{}.{}*.h.*.nc{}", case_name, model, tail),
    ];

    if suffix.is_none() {
        patterns.push(format!("{}.h.nc", model));
        patterns.push(format!("{}.h?.nc", model));
        patterns.push(format!("{}.h.*.nc", model));
        patterns.push(format!("{}.h?.*.nc", model));
    }

    patterns
}

/// Every history file of `model` in `from_dir`, sorted.
///
/// A file matched by several patterns is listed once per pattern; selection
/// by extension collapses the repeats. A missing directory holds no files.
pub fn all_hist_files(
    case_name: &str,
    model: &str,
    from_dir: &Path,
    suffix: Option<&str>,
) -> Result<Vec<PathBuf>, EnumerateError> {
    let patterns = hist_file_patterns(case_name, model, suffix);
    let glob_set = compile_patterns(&patterns)?;

    let mut hists = Vec::new();
    let mut pattern_hits = Vec::new();
    for file_name in directory_file_names(from_dir)? {
        glob_set.matches_into(&file_name, &mut pattern_hits);
        for _ in &pattern_hits {
            hists.push(from_dir.join(&file_name));
        }
    }

    hists.sort();
    debug!(
        model,
        dir = %from_dir.display(),
        count = hists.len(),
        "enumerated history files"
    );
    Ok(hists)
}

fn compile_patterns(patterns: &[String]) -> Result<GlobSet, EnumerateError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| EnumerateError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| EnumerateError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn directory_file_names(dir: &Path) -> Result<Vec<String>, EnumerateError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(EnumerateError::ReadDirectory {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| EnumerateError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        // Names that are not UTF-8 cannot carry a case or model token.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}
