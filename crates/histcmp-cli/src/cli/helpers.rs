use super::CliError;
use anyhow::Context;
use histcmp_core::{CaseConfig, Cprnc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub(super) const LOG_ENV_VAR: &str = "HISTCMP_LOG";

#[derive(Debug, Clone)]
pub(super) struct CliContext {
    pub(super) case: CaseConfig,
    pub(super) report_path: Option<PathBuf>,
}

impl CliContext {
    pub(super) fn comparator(&self) -> Cprnc {
        Cprnc::new(&self.case.cprnc)
    }
}

pub(super) fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_context(
    case_config: &Path,
    report_path: Option<PathBuf>,
) -> Result<CliContext, CliError> {
    let case = CaseConfig::from_path(case_config).map_err(|error| CliError::Hist(error.into()))?;
    tracing::debug!(
        case = %case.case_name,
        rundir = %case.rundir.display(),
        "loaded case configuration"
    );
    Ok(CliContext { case, report_path })
}

pub(super) fn write_report<T: Serialize>(
    context: &CliContext,
    report: &T,
) -> Result<(), CliError> {
    let Some(path) = context.report_path.as_deref() else {
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create report directory '{}'", parent.display())
        })?;
    }
    let json = serde_json::to_string_pretty(report)
        .with_context(|| format!("failed to serialize report '{}'", path.display()))?;
    fs::write(path, json)
        .with_context(|| format!("failed to write report '{}'", path.display()))?;
    println!("JSON report: {}", path.display());
    Ok(())
}

pub(super) fn exit_code_for(passed: bool) -> i32 {
    if passed { 0 } else { 1 }
}
