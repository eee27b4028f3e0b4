use crate::case::CaseConfig;
use crate::compare::{BitComparator, HistComparison, compare_hists};
use crate::domain::{HistError, HistFile, HistResult};
use crate::history::latest_hist_files;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedHist {
    pub model: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Files copied by [`move_hists`] or [`generate_baseline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistCopyReport {
    pub passed: bool,
    pub destination: PathBuf,
    pub copied: Vec<CopiedHist>,
    pub comments: String,
}

/// Saves the latest history files of the run directory under `<file>.<suffix>`.
///
/// The copies survive a re-run of the case and can later be compared with
/// [`compare_test`]. An existing copy with the same suffix is replaced.
pub fn move_hists(case: &CaseConfig, suffix: &str) -> HistResult<HistCopyReport> {
    if suffix.is_empty() {
        return Err(HistError::input_validation(
            "INPUT.HIST_MOVE_SUFFIX",
            "move needs a non-empty suffix",
        ));
    }

    let mut comments = format!("Moving hist files to suffix '{}'\n", suffix);
    let mut copied = Vec::new();
    for model in case.model_tokens() {
        comments.push_str(&format!("  Moving hist files for model '{}'\n", model));
        for hist in latest_hist_files(&case.case_name, model, &case.rundir, None)? {
            let mut target = hist.path.clone().into_os_string();
            target.push(format!(".{}", suffix));
            let target = PathBuf::from(target);

            comments.push_str(&format!(
                "    Copying '{}' to '{}'\n",
                hist.path.display(),
                target.display()
            ));
            replace_file(&hist.path, &target)?;
            copied.push(CopiedHist {
                model: model.to_string(),
                from: hist.path,
                to: target,
            });
        }
    }

    if copied.is_empty() {
        return Err(HistError::input_validation(
            "INPUT.HIST_NONE_FOUND",
            format!(
                "move failed: no hist files found in rundir '{}'",
                case.rundir.display()
            ),
        ));
    }

    info!(suffix, count = copied.len(), "moved history files");
    Ok(HistCopyReport {
        passed: true,
        destination: case.rundir.clone(),
        copied,
        comments,
    })
}

/// Compares two suffixed sets of history files in the run directory.
pub fn compare_test(
    case: &CaseConfig,
    comparator: &dyn BitComparator,
    suffix1: &str,
    suffix2: &str,
) -> HistResult<HistComparison> {
    compare_hists(
        case,
        comparator,
        &case.rundir,
        &case.rundir,
        Some(suffix1),
        Some(suffix2),
    )
}

/// Compares the run's latest history files against a stored baseline.
///
/// Without `baseline_dir` the baseline root and the compare case below it
/// must both exist. A missing directory yields a failed comparison rather
/// than an error.
pub fn compare_baseline(
    case: &CaseConfig,
    comparator: &dyn BitComparator,
    baseline_dir: Option<&Path>,
) -> HistResult<HistComparison> {
    let (compare_dir, dirs_to_check) = match baseline_dir {
        Some(dir) => (dir.to_path_buf(), vec![dir.to_path_buf()]),
        None => {
            let root = case.baseline_root()?.to_path_buf();
            let compare_dir = case.baseline_compare_dir()?;
            (compare_dir.clone(), vec![root, compare_dir])
        }
    };

    for dir in &dirs_to_check {
        if !dir.is_dir() {
            return Ok(HistComparison::failed(format!(
                "ERROR baseline directory '{}' does not exist",
                dir.display()
            )));
        }
    }

    compare_hists(case, comparator, &case.rundir, &compare_dir, None, None)
}

/// Copies the run's latest history files into a baseline directory.
///
/// Baseline files are named from the model token onward
/// (`CASE.cpl.hi.0001-01-01-00000.nc` becomes `cpl.hi.0001-01-01-00000.nc`),
/// replacing any existing file of that name. The directory is created when
/// absent. Copying is not transactional: a failure leaves earlier copies in place.
pub fn generate_baseline(
    case: &CaseConfig,
    baseline_dir: Option<&Path>,
) -> HistResult<HistCopyReport> {
    let generate_dir = match baseline_dir {
        Some(dir) => dir.to_path_buf(),
        None => case.baseline_generate_dir()?,
    };
    fs::create_dir_all(&generate_dir).map_err(|source| {
        HistError::io_system(
            "IO.BASELINE_DIR",
            format!(
                "failed to create baseline directory '{}': {}",
                generate_dir.display(),
                source
            ),
        )
    })?;

    let mut comments = format!("Generating baselines into '{}'\n", generate_dir.display());
    let mut copied = Vec::new();
    for model in case.model_tokens() {
        comments.push_str(&format!("  generating for model '{}'\n", model));
        let hists = latest_hist_files(&case.case_name, model, &case.rundir, None)?;
        debug!(model, count = hists.len(), "latest history files");

        for hist in hists {
            let baseline = generate_dir.join(baseline_name(&hist)?);
            replace_file(&hist.path, &baseline)?;
            comments.push_str(&format!(
                "    generating baseline '{}' from file {}\n",
                baseline.display(),
                hist.path.display()
            ));
            copied.push(CopiedHist {
                model: model.to_string(),
                from: hist.path,
                to: baseline,
            });
        }
    }

    if copied.is_empty() {
        return Err(HistError::input_validation(
            "INPUT.HIST_NONE_FOUND",
            format!(
                "could not generate any hist files for case '{}' from rundir '{}'",
                case.case_name,
                case.rundir.display()
            ),
        ));
    }

    info!(
        dir = %generate_dir.display(),
        count = copied.len(),
        "generated baseline"
    );
    Ok(HistCopyReport {
        passed: true,
        destination: generate_dir,
        copied,
        comments,
    })
}

fn baseline_name(hist: &HistFile) -> HistResult<String> {
    hist.model_relative_name().map(str::to_string).ok_or_else(|| {
        HistError::internal(
            "SYS.BASELINE_NAME",
            format!(
                "history file '{}' does not name model '{}'",
                hist.path.display(),
                hist.model
            ),
        )
    })
}

fn replace_file(from: &Path, to: &Path) -> HistResult<()> {
    if to.exists() {
        fs::remove_file(to).map_err(|source| {
            HistError::io_system(
                "IO.HIST_COPY",
                format!("failed to remove '{}': {}", to.display(), source),
            )
        })?;
    }
    fs::copy(from, to).map_err(|source| {
        HistError::io_system(
            "IO.HIST_COPY",
            format!(
                "failed to copy '{}' to '{}': {}",
                from.display(),
                to.display(),
                source
            ),
        )
    })?;
    Ok(())
}
