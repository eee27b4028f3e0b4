use crate::domain::{HistError, HistResult};
use regex::Regex;
use std::path::Path;

/// Derives the stream key ("extension") of a model's history files.
///
/// The basename must contain the model token followed somewhere by
/// `.<ext>.nc` or `.<ext>.<segment>.nc`, where `<ext>` is `h` plus at most one
/// non-dot character. Anything after `.nc` (a saved-copy suffix, `.base`) is
/// ignored.
#[derive(Debug, Clone)]
pub struct ExtensionClassifier {
    model: String,
    pattern: Regex,
}

impl ExtensionClassifier {
    pub fn new(model: &str) -> HistResult<Self> {
        let pattern = Regex::new(&format!(
            r"^.*{}.*[.](h[^.]?)([.][^.]+)?[.]nc",
            regex::escape(model)
        ))
        .map_err(|source| {
            HistError::internal(
                "SYS.HIST_EXTENSION_PATTERN",
                format!(
                    "failed to build extension pattern for model '{}': {}",
                    model, source
                ),
            )
        })?;

        Ok(Self {
            model: model.to_string(),
            pattern,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn classify(&self, path: &Path) -> HistResult<String> {
        let basename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        self.pattern
            .captures(basename)
            .and_then(|captures| captures.get(1))
            .map(|extension| extension.as_str().to_string())
            .ok_or_else(|| {
                HistError::internal(
                    "SYS.HIST_EXTENSION",
                    format!(
                        "failed to get extension for file '{}' (model '{}')",
                        path.display(),
                        self.model
                    ),
                )
            })
    }
}

pub fn extension_for(model: &str, path: impl AsRef<Path>) -> HistResult<String> {
    ExtensionClassifier::new(model)?.classify(path.as_ref())
}
