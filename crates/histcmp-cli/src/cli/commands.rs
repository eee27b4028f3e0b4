use super::CliError;
use super::helpers::{CliContext, exit_code_for, write_report};
use histcmp_core::{compare_baseline, compare_test, generate_baseline, move_hists};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct MoveArgs {
    /// Suffix appended to the saved copies
    #[arg(long)]
    suffix: String,
}

#[derive(clap::Args)]
pub(super) struct CompareTestArgs {
    /// Suffix of the first set of saved history files
    #[arg(long)]
    suffix1: String,

    /// Suffix of the second set of saved history files
    #[arg(long)]
    suffix2: String,
}

#[derive(clap::Args)]
pub(super) struct BaselineArgs {
    /// Baseline directory (default: derived from the case configuration)
    #[arg(long)]
    baseline_dir: Option<PathBuf>,
}

pub(super) fn run_move_command(context: &CliContext, args: MoveArgs) -> Result<i32, CliError> {
    let report = move_hists(&context.case, &args.suffix)?;
    print!("{}", report.comments);
    write_report(context, &report)?;
    Ok(exit_code_for(report.passed))
}

pub(super) fn run_compare_test_command(
    context: &CliContext,
    args: CompareTestArgs,
) -> Result<i32, CliError> {
    let comparator = context.comparator();
    let comparison = compare_test(&context.case, &comparator, &args.suffix1, &args.suffix2)?;
    print!("{}", comparison.comments);
    write_report(context, &comparison)?;
    Ok(exit_code_for(comparison.passed))
}

pub(super) fn run_compare_baseline_command(
    context: &CliContext,
    args: BaselineArgs,
) -> Result<i32, CliError> {
    let comparator = context.comparator();
    let comparison = compare_baseline(&context.case, &comparator, args.baseline_dir.as_deref())?;
    println!("{}", comparison.comments.trim_end());
    write_report(context, &comparison)?;
    Ok(exit_code_for(comparison.passed))
}

pub(super) fn run_generate_baseline_command(
    context: &CliContext,
    args: BaselineArgs,
) -> Result<i32, CliError> {
    let report = generate_baseline(&context.case, args.baseline_dir.as_deref())?;
    print!("{}", report.comments);
    write_report(context, &report)?;
    Ok(exit_code_for(report.passed))
}
