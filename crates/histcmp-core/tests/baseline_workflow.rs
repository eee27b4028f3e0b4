use histcmp_core::{
    BitComparator, BitComparison, CaseConfig, HistErrorCategory, HistResult, compare_baseline,
    compare_test, generate_baseline, move_hists,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct ByteComparator;

impl BitComparator for ByteComparator {
    fn compare(&self, file1: &Path, file2: &Path, _log_dir: &Path) -> HistResult<BitComparison> {
        let left = fs::read(file1).expect("left file should be readable");
        let right = fs::read(file2).expect("right file should be readable");
        if left == right {
            Ok(BitComparison::new(true, "files seem to be IDENTICAL"))
        } else {
            Ok(BitComparison::new(false, "files seem to be DIFFERENT"))
        }
    }
}

struct Workspace {
    _temp: TempDir,
    run: PathBuf,
    baselines: PathBuf,
}

fn workspace() -> Workspace {
    let temp = TempDir::new().expect("tempdir should be created");
    let run = temp.path().join("run");
    let baselines = temp.path().join("baselines");
    fs::create_dir_all(&run).expect("rundir should be created");
    Workspace {
        _temp: temp,
        run,
        baselines,
    }
}

fn case(workspace: &Workspace) -> CaseConfig {
    CaseConfig::new("FOO.G", &workspace.run)
        .with_components(["atm", "ocn"])
        .with_baselines(&workspace.baselines, "cmp", "cmp")
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("file should be written");
}

fn populate_run(run: &Path) {
    write(run, "FOO.G.atm.h0.0001-01-01-00000.nc", "atm-old");
    write(run, "FOO.G.atm.h0.0001-01-02-00000.nc", "atm-new");
    write(run, "FOO.G.ocn.h.0001-01-02-00000.nc", "ocn");
    write(run, "FOO.G.cpl.hi.0001-01-02-00000.nc", "cpl");
    write(run, "FOO.G.cpl.r.0001-01-02-00000.nc", "restart");
}

#[test]
fn moved_copies_compare_identical_to_each_other() {
    let workspace = workspace();
    populate_run(&workspace.run);
    let case = case(&workspace);

    let moved = move_hists(&case, "base").expect("move should succeed");
    assert_eq!(moved.copied.len(), 3);
    assert!(workspace
        .run
        .join("FOO.G.atm.h0.0001-01-02-00000.nc.base")
        .is_file());
    assert!(!workspace
        .run
        .join("FOO.G.atm.h0.0001-01-01-00000.nc.base")
        .exists());

    move_hists(&case, "rest").expect("second move should succeed");
    let comparison =
        compare_test(&case, &ByteComparator, "base", "rest").expect("comparison should run");
    assert!(comparison.passed, "{}", comparison.comments);
    assert_eq!(comparison.compared_count, 3);
}

#[test]
fn move_replaces_an_existing_copy() {
    let workspace = workspace();
    write(&workspace.run, "FOO.G.cpl.h.nc", "fresh");
    write(&workspace.run, "FOO.G.cpl.h.nc.base", "stale");

    move_hists(&case(&workspace), "base").expect("move should succeed");
    assert_eq!(
        fs::read_to_string(workspace.run.join("FOO.G.cpl.h.nc.base")).unwrap(),
        "fresh"
    );
}

#[test]
fn move_without_history_files_fails() {
    let workspace = workspace();
    let error = move_hists(&case(&workspace), "base").expect_err("empty rundir should fail");
    assert_eq!(error.category(), HistErrorCategory::InputValidationError);
    assert_eq!(error.placeholder(), "INPUT.HIST_NONE_FOUND");
}

#[test]
fn generated_baseline_matches_the_run() {
    let workspace = workspace();
    populate_run(&workspace.run);
    let case = case(&workspace);

    let generated = generate_baseline(&case, None).expect("generation should succeed");
    let baseline_dir = workspace.baselines.join("cmp");
    assert_eq!(generated.destination, baseline_dir);
    assert!(baseline_dir.join("atm.h0.0001-01-02-00000.nc").is_file());
    assert!(baseline_dir.join("ocn.h.0001-01-02-00000.nc").is_file());
    assert!(baseline_dir.join("cpl.hi.0001-01-02-00000.nc").is_file());
    assert!(generated.comments.contains("generating baseline"));

    let comparison = compare_baseline(&case, &ByteComparator, None).expect("comparison should run");
    assert!(comparison.passed, "{}", comparison.comments);
    assert_eq!(comparison.compared_count, 3);
}

#[test]
fn changed_run_output_fails_the_baseline_comparison() {
    let workspace = workspace();
    populate_run(&workspace.run);
    let case = case(&workspace);
    generate_baseline(&case, None).expect("generation should succeed");

    write(&workspace.run, "FOO.G.cpl.hi.0001-01-02-00000.nc", "cpl-changed");
    let comparison = compare_baseline(&case, &ByteComparator, None).expect("comparison should run");

    assert!(!comparison.passed);
    assert_eq!(comparison.compared_count, 3);
    assert!(comparison.comments.contains("did NOT match"));
}

#[test]
fn explicit_baseline_directory_is_used() {
    let workspace = workspace();
    populate_run(&workspace.run);
    let case = case(&workspace);
    let explicit = workspace.baselines.join("explicit/nested");

    generate_baseline(&case, Some(explicit.as_path())).expect("generation should succeed");
    assert!(explicit.join("cpl.hi.0001-01-02-00000.nc").is_file());

    let comparison = compare_baseline(&case, &ByteComparator, Some(explicit.as_path()))
        .expect("comparison should run");
    assert!(comparison.passed, "{}", comparison.comments);
}

#[test]
fn missing_baseline_directory_fails_without_error() {
    let workspace = workspace();
    populate_run(&workspace.run);

    let comparison =
        compare_baseline(&case(&workspace), &ByteComparator, None).expect("should not error");
    assert!(!comparison.passed);
    assert!(comparison.comments.contains("does not exist"));
    assert_eq!(comparison.compared_count, 0);
}

#[test]
fn generating_from_an_empty_run_fails() {
    let workspace = workspace();
    let error =
        generate_baseline(&case(&workspace), None).expect_err("empty rundir should fail");
    assert_eq!(error.placeholder(), "INPUT.HIST_NONE_FOUND");
}
