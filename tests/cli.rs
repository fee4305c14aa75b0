use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

struct Workspace {
    dir: TempDir,
    home: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
            home: tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasktimes").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn log_path(&self) -> std::path::PathBuf {
        self.dir.path().join("times.txt")
    }

    fn log(&self) -> String {
        fs::read_to_string(self.log_path()).unwrap()
    }
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn help_lists_usage() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage examples"));
}

#[test]
fn show_current_on_new_log() {
    let ws = Workspace::new();
    ws.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("No current task\nNo previous task\n"));
    assert_eq!(ws.log(), "");
}

#[test]
fn start_stop_and_report() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("prj - stuff")
        .assert()
        .success()
        .stdout(predicate::str::contains(" prj - stuff\" added"));
    assert_eq!(line_count(&ws.log_path()), 1);

    ws.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Current task: "));

    ws.cmd()
        .arg("off")
        .assert()
        .success()
        .stdout(predicate::str::contains(" off\" added"));
    let log = ws.log();
    assert_eq!(log.lines().count(), 2);
    assert!(log.lines().nth(1).unwrap().ends_with(" off"));

    ws.cmd()
        .arg("times")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- prj ---").and(predicate::str::contains("Total")));
}

#[test]
fn starting_over_an_open_task_warns() {
    let ws = Workspace::new();
    fs::write(ws.log_path(), "2013/03/11 09:00:00 prj - stuff\n").unwrap();

    ws.cmd()
        .args(["on", "other"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Completing current task... prj - stuff"));
    assert_eq!(line_count(&ws.log_path()), 3);
}

#[test]
fn starting_over_a_future_task_warns_negative_time() {
    let ws = Workspace::new();
    fs::write(ws.log_path(), "2999/01/01 09:00:00 prj - stuff\n").unwrap();

    ws.cmd()
        .arg("other")
        .assert()
        .success()
        .stderr(predicate::str::contains("Negative time for task..."));
    assert_eq!(line_count(&ws.log_path()), 3);
}

#[test]
fn elapsed_stop() {
    let ws = Workspace::new();
    fs::write(ws.log_path(), "2013/03/11 09:00:00 prj - stuff\n").unwrap();

    ws.cmd()
        .args(["off", "1h30m"])
        .assert()
        .success()
        .stdout("\"2013/03/11 10:30:00 off\" added\n");
}

#[test]
fn corrupt_log_is_fatal() {
    let ws = Workspace::new();
    let corrupt = "2013/02/30 10:00:00 prj - stuff\n";
    fs::write(ws.log_path(), corrupt).unwrap();

    ws.cmd()
        .arg("off")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid time: 2013/02/30 10:00:00"));
    assert_eq!(ws.log(), corrupt);
}

#[test]
fn off_without_task_is_fatal() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("off")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No current task"));
}

#[test]
fn reserved_name_is_rejected() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["on", "off"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid task name"));
    assert_eq!(ws.log(), "");
}

#[test]
fn times_reads_other_file() {
    let ws = Workspace::new();
    let other = ws.dir.path().join("other.txt");
    fs::write(
        &other,
        "2013/03/11 09:00:00 a - one\n2013/03/11 10:00:00 off\n\
         2013/03/11 10:00:01 b - two\n2013/03/11 10:30:01 off\n",
    )
    .unwrap();

    ws.cmd()
        .arg("times")
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("      2 Projects Total   1:30:00"));
    assert!(!ws.log_path().exists());
}

#[test]
fn config_selects_default_file() {
    let ws = Workspace::new();
    let config_dir = ws.home.path().join(".tasktimes");
    fs::create_dir_all(&config_dir).unwrap();
    let target = ws.dir.path().join("work.log");
    fs::write(
        config_dir.join("config.json"),
        format!(r#"{{ "default_file": {:?} }}"#, target.to_str().unwrap()),
    )
    .unwrap();

    ws.cmd().arg("standup").assert().success();
    assert!(fs::read_to_string(&target).unwrap().ends_with(" standup\n"));
    assert!(!ws.log_path().exists());
}
