use crate::domain::{HistError, HistResult};
use serde::Serialize;
use std::collections::BTreeSet;

/// Correspondence between two collections of history file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistMatch {
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    pub matched: Vec<(String, String)>,
}

/// Reduces a history file name to the part shared by run output and baselines.
///
/// Everything before the last occurrence of `model` (directory, case name) is
/// dropped, as is `suffix` together with the `.` that separates it.
pub fn normalize_hist_name(model: &str, hist: &str, suffix: Option<&str>) -> HistResult<String> {
    let start = hist.rfind(model).ok_or_else(|| {
        HistError::internal(
            "SYS.HIST_MATCH_MODEL",
            format!("history file '{}' does not name model '{}'", hist, model),
        )
    })?;
    let normalized = &hist[start..];

    let Some(suffix) = suffix.filter(|suffix| !suffix.is_empty()) else {
        return Ok(normalized.to_string());
    };

    let stripped = normalized.strip_suffix(suffix).ok_or_else(|| {
        HistError::internal(
            "SYS.HIST_MATCH_SUFFIX",
            format!("history file '{}' does not have suffix '{}'", hist, suffix),
        )
    })?;
    Ok(stripped.strip_suffix('.').unwrap_or(stripped).to_string())
}

/// Partitions `hists1` and `hists2` into names present on one side only and
/// matched pairs, comparing the names after [`normalize_hist_name`].
///
/// When several inputs share a normalized name only the first is surfaced;
/// the count check below then fails, since well-formed selections never
/// contain such repeats.
pub fn match_hists<S1, S2>(
    model: &str,
    hists1: &[S1],
    hists2: &[S2],
    suffix1: Option<&str>,
    suffix2: Option<&str>,
) -> HistResult<HistMatch>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let normalized1 = normalize_all(model, hists1, suffix1)?;
    let normalized2 = normalize_all(model, hists2, suffix2)?;

    let set1 = normalized1.iter().map(String::as_str).collect::<BTreeSet<_>>();
    let set2 = normalized2.iter().map(String::as_str).collect::<BTreeSet<_>>();

    let mut left_only = set1
        .difference(&set2)
        .map(|name| original_for(name, &normalized1, hists1))
        .collect::<Vec<_>>();
    let mut right_only = set2
        .difference(&set1)
        .map(|name| original_for(name, &normalized2, hists2))
        .collect::<Vec<_>>();
    let mut matched = set1
        .intersection(&set2)
        .map(|name| {
            (
                original_for(name, &normalized1, hists1),
                original_for(name, &normalized2, hists2),
            )
        })
        .collect::<Vec<_>>();

    left_only.sort();
    right_only.sort();
    matched.sort();

    if matched.len() + left_only.len() != hists1.len() {
        return Err(HistError::internal(
            "SYS.HIST_MATCH_COUNT",
            format!(
                "model '{}': {} matched + {} unmatched does not account for {} files in the first set",
                model,
                matched.len(),
                left_only.len(),
                hists1.len()
            ),
        ));
    }
    if matched.len() + right_only.len() != hists2.len() {
        return Err(HistError::internal(
            "SYS.HIST_MATCH_COUNT",
            format!(
                "model '{}': {} matched + {} unmatched does not account for {} files in the second set",
                model,
                matched.len(),
                right_only.len(),
                hists2.len()
            ),
        ));
    }

    Ok(HistMatch {
        left_only,
        right_only,
        matched,
    })
}

fn normalize_all<S: AsRef<str>>(
    model: &str,
    hists: &[S],
    suffix: Option<&str>,
) -> HistResult<Vec<String>> {
    hists
        .iter()
        .map(|hist| normalize_hist_name(model, hist.as_ref(), suffix))
        .collect()
}

fn original_for<S: AsRef<str>>(name: &str, normalized: &[String], hists: &[S]) -> String {
    normalized
        .iter()
        .position(|candidate| candidate == name)
        .map(|index| hists[index].as_ref().to_string())
        .unwrap_or_default()
}
