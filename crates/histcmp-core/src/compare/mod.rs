pub mod cprnc;

pub use cprnc::{BitComparator, BitComparison, ComparatorError, Cprnc, IDENTICAL_MARKER};

use crate::case::CaseConfig;
use crate::domain::{HistError, HistFile, HistResult};
use crate::history::{latest_hist_files, match_hists};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairComparison {
    pub left: String,
    pub right: String,
    pub identical: bool,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelComparison {
    pub model: String,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    pub pairs: Vec<PairComparison>,
}

impl ModelComparison {
    pub fn passed(&self) -> bool {
        self.left_only.is_empty()
            && self.right_only.is_empty()
            && self.pairs.iter().all(|pair| pair.identical)
    }
}

/// Outcome of comparing two sets of history files, model by model.
///
/// Mismatches never abort the comparison; they are listed in `models`,
/// described in `comments`, and clear `passed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistComparison {
    pub passed: bool,
    pub compared_count: usize,
    pub comments: String,
    pub models: Vec<ModelComparison>,
}

impl HistComparison {
    pub fn failed(comments: impl Into<String>) -> Self {
        Self {
            passed: false,
            compared_count: 0,
            comments: comments.into(),
            models: Vec::new(),
        }
    }
}

/// Compares the latest history files of every model in `from_dir1` against
/// those in `from_dir2`.
///
/// Files are told apart by `suffix1`/`suffix2` when both sides live in the same
/// directory. The comparison fails with an error when it would compare a set to
/// itself, or when no pair at all was compared across every model.
pub fn compare_hists(
    case: &CaseConfig,
    comparator: &dyn BitComparator,
    from_dir1: &Path,
    from_dir2: &Path,
    suffix1: Option<&str>,
    suffix2: Option<&str>,
) -> HistResult<HistComparison> {
    let suffix1 = suffix1.filter(|suffix| !suffix.is_empty());
    let suffix2 = suffix2.filter(|suffix| !suffix.is_empty());
    if from_dir1 == from_dir2 && suffix1 == suffix2 {
        return Err(HistError::input_validation(
            "INPUT.HIST_SELF_COMPARE",
            format!(
                "comparing files to themselves: dir='{}', suffix='{}'",
                from_dir1.display(),
                suffix1.unwrap_or("")
            ),
        ));
    }

    let label1 = suffix1.unwrap_or("");
    let label2 = suffix2.unwrap_or("");
    let mut comparison = HistComparison {
        passed: true,
        ..HistComparison::default()
    };
    let mut comments = format!(
        "Comparing hists for case '{}' dir1='{}', suffix1='{}', dir2='{}' suffix2='{}'\n",
        case.case_name,
        from_dir1.display(),
        label1,
        from_dir2.display(),
        label2
    );

    for model in case.model_tokens() {
        comments.push_str(&format!("  comparing model '{}'\n", model));
        info!(model, "comparing history files");

        let hists1 = path_strings(latest_hist_files(
            &case.case_name,
            model,
            from_dir1,
            suffix1,
        )?);
        let hists2 = path_strings(latest_hist_files(
            &case.case_name,
            model,
            from_dir2,
            suffix2,
        )?);

        if hists1.is_empty() && hists2.is_empty() {
            comments.push_str(&format!("    no hist files found for model {}\n", model));
            continue;
        }

        let matches = match_hists(model, &hists1, &hists2, suffix1, suffix2)?;
        for item in &matches.left_only {
            warn!(model, file = %item, "history file has no counterpart");
            comments.push_str(&format!(
                "    File '{}' had no counterpart in '{}' with suffix '{}'\n",
                item,
                from_dir2.display(),
                label2
            ));
        }
        for item in &matches.right_only {
            warn!(model, file = %item, "history file has no counterpart");
            comments.push_str(&format!(
                "    File '{}' had no counterpart in '{}' with suffix '{}'\n",
                item,
                from_dir1.display(),
                label1
            ));
        }

        let mut pairs = Vec::with_capacity(matches.matched.len());
        for (hist1, hist2) in matches.matched {
            let result = comparator.compare(Path::new(&hist1), Path::new(&hist2), from_dir1)?;
            if result.identical {
                comments.push_str(&format!("    {} matched {}\n", hist1, hist2));
            } else {
                warn!(model, left = %hist1, right = %hist2, "history files differ");
                comments.push_str(&format!("    {} did NOT match {}\n", hist1, hist2));
                comments.push_str(&result.output);
                comments.push('\n');
            }
            pairs.push(PairComparison {
                left: hist1,
                right: hist2,
                identical: result.identical,
                output: result.output,
            });
        }

        let model_comparison = ModelComparison {
            model: model.to_string(),
            left_only: matches.left_only,
            right_only: matches.right_only,
            pairs,
        };
        comparison.compared_count += model_comparison.pairs.len();
        comparison.passed &= model_comparison.passed();
        comparison.models.push(model_comparison);
    }

    if comparison.compared_count == 0 {
        return Err(HistError::computation(
            "RUN.HIST_NOTHING_COMPARED",
            format!(
                "did not compare any hist files for suffix1='{}' suffix2='{}', dir1='{}', dir2='{}'\n{}",
                label1,
                label2,
                from_dir1.display(),
                from_dir2.display(),
                comments
            ),
        ));
    }

    comparison.comments = comments;
    Ok(comparison)
}

fn path_strings(hists: Vec<HistFile>) -> Vec<String> {
    hists.iter().map(HistFile::path_string).collect()
}
