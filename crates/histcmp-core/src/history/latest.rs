use super::enumerate::all_hist_files;
use super::extension::ExtensionClassifier;
use crate::domain::{HistFile, HistResult, HistTimestamp};
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})-(\d{5})\.nc").expect("timestamp pattern is valid")
});

/// Finds the `YYYY-MM-DD-SSSSS.nc` stamp anywhere in the file name.
pub fn hist_timestamp(path: &Path) -> Option<HistTimestamp> {
    let name = path.file_name()?.to_str()?;
    let captures = TIMESTAMP_PATTERN.captures(name)?;
    Some(HistTimestamp {
        year: captures[1].to_string(),
        month: captures[2].to_string(),
        day: captures[3].to_string(),
        seconds: captures[4].to_string(),
    })
}

/// Parses an enumerated path into a [`HistFile`] for `model`.
pub fn describe_hist_file(
    classifier: &ExtensionClassifier,
    path: PathBuf,
    suffix: Option<&str>,
) -> HistResult<HistFile> {
    let extension = classifier.classify(&path)?;
    let timestamp = hist_timestamp(&path);
    Ok(HistFile {
        path,
        model: classifier.model().to_string(),
        extension,
        timestamp,
        suffix: suffix
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string),
    })
}

/// Whether `incoming` should take the place of `current` for their shared extension.
///
/// A file without a timestamp always wins over the current holder, and a
/// holder without a timestamp is never displaced by a stamped file. Both
/// branches keep "unstamped means newest" consistent regardless of the order
/// the files are seen in.
pub fn supersedes(incoming: &HistFile, current: &HistFile) -> bool {
    match (&incoming.timestamp, &current.timestamp) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(incoming), Some(current)) => incoming > current,
    }
}

/// Reduces `hists` to the newest file per extension.
pub fn select_latest(hists: impl IntoIterator<Item = HistFile>) -> Vec<HistFile> {
    let mut latest: BTreeMap<String, HistFile> = BTreeMap::new();
    for hist in hists {
        match latest.entry(hist.extension.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(hist);
            }
            Entry::Occupied(mut slot) => {
                if supersedes(&hist, slot.get()) {
                    debug!(
                        extension = %hist.extension,
                        replaced = %slot.get().path.display(),
                        selected = %hist.path.display(),
                        "newer history file"
                    );
                    slot.insert(hist);
                }
            }
        }
    }
    latest.into_values().collect()
}

/// The most recent history file per extension for `model` in `from_dir`.
pub fn latest_hist_files(
    case_name: &str,
    model: &str,
    from_dir: &Path,
    suffix: Option<&str>,
) -> HistResult<Vec<HistFile>> {
    let classifier = ExtensionClassifier::new(model)?;
    let hists = all_hist_files(case_name, model, from_dir, suffix)?
        .into_iter()
        .map(|path| describe_hist_file(&classifier, path, suffix))
        .collect::<HistResult<Vec<_>>>()?;
    Ok(select_latest(hists))
}
