use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn simbatch(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simbatch"))
        .args(["--log-level", "warn"])
        .args(args)
        .current_dir(dir)
        .env_remove("SIMBATCH_LOG")
        .output()
        .expect("failed to run simbatch")
}

fn sim_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "sim"))
        .collect();
    files.sort();
    files
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[test]
fn task_rejects_category_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let out = simbatch(dir.path(), &["task", "0", "5"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("category out of range"));
    assert!(sim_files(dir.path()).is_empty());
}

#[test]
fn task_rejects_bad_arguments() {
    let dir = tempfile::tempdir().unwrap();

    for args in [
        vec!["task", "1"],
        vec!["task", "x", "2"],
        vec!["task", "1", "0"],
        vec!["task", "1", "-3"],
    ] {
        let out = simbatch(dir.path(), &args);
        assert_eq!(out.status.code(), Some(2), "{args:?}");
    }
    assert!(sim_files(dir.path()).is_empty());
}

#[test]
fn task_writes_process_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let out = simbatch(dir.path(), &["task", "2", "3"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let files = sim_files(dir.path());
    assert_eq!(files.len(), 1);
    let name = file_name(&files[0]);
    assert!(name.starts_with("PROT_MP_2_n3_"), "{name}");

    let reported = String::from_utf8_lossy(&out.stdout);
    assert_eq!(file_name(Path::new(reported.trim())), name);

    let content = fs::read_to_string(&files[0]).unwrap();
    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert!(name.contains(lines[0]));
    assert!(lines[2].contains('_'));
    assert!(lines[3].contains('.'));
}

#[test]
fn task_ignores_extra_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let out = simbatch(dir.path(), &["task", "2", "3", "extra"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let files = sim_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(file_name(&files[0]).starts_with("PROT_MP_2_n3_"));
}

#[test]
fn process_batch_writes_one_artifact_per_category() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let out = simbatch(
        dir.path(),
        &[
            "run",
            "1",
            "1",
            "0",
            "0",
            "--strategy",
            "process",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let reports: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(reports[0]["strategy"], "process");
    assert_eq!(reports[0]["launched"], 2);
    assert_eq!(reports[0]["succeeded"], 2);

    let names: Vec<String> = sim_files(&out_dir).iter().map(|p| file_name(p)).collect();
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("PROT_MP_1_n1_"));
    assert!(names[1].starts_with("PROT_MP_2_n1_"));
}

#[test]
fn run_executes_both_strategies() {
    let dir = tempfile::tempdir().unwrap();
    let out = simbatch(
        dir.path(),
        &["run", "1", "0", "0", "1", "--max-sleep-ms", "50", "--output-dir", "."],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Starting process batch"));
    assert!(stdout.contains("Thread batch completed in"));
    assert!(stdout.contains("Check the created files"));

    let names: Vec<String> = sim_files(dir.path()).iter().map(|p| file_name(p)).collect();
    assert_eq!(names.iter().filter(|n| n.starts_with("PROT_MP_")).count(), 2);
    assert_eq!(names.iter().filter(|n| n.starts_with("PROT_MT_")).count(), 2);
}
