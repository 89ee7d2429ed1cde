use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn docpages(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docpages").unwrap();
    cmd.current_dir(workdir.path()).env_remove("DOCPAGES_CONFIG");
    cmd
}

#[test]
fn test_missing_argument_prints_usage() {
    let workdir = TempDir::new().unwrap();

    docpages(&workdir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_nonexistent_root_reports_zero_totals() {
    let workdir = TempDir::new().unwrap();

    docpages(&workdir)
        .arg(workdir.path().join("nowhere"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total number of documents: 0"))
        .stdout(predicate::str::contains("Total number of pages: 0"));
}

#[test]
fn test_failed_documents_still_complete_the_run() {
    let workdir = TempDir::new().unwrap();
    let root = workdir.path().join("docs");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("broken.pdf"), "not a pdf").unwrap();
    fs::write(root.join("notes.txt"), "ignored").unwrap();

    docpages(&workdir)
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total number of documents: 1"))
        .stdout(predicate::str::contains("Total number of pages: 0"))
        .stdout(predicate::str::contains("broken.pdf >> Error:"))
        .stdout(predicate::str::contains("Total processing time: 0h00m"));
}

#[test]
fn test_json_output_from_config_file() {
    let workdir = TempDir::new().unwrap();
    fs::write(
        workdir.path().join("docpages.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();
    fs::write(workdir.path().join("a.docx"), "not a zip").unwrap();

    docpages(&workdir)
        .arg(workdir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"summary\""))
        .stdout(predicate::str::contains("\"documents_submitted\": 1"))
        .stdout(predicate::str::contains("\"documents_failed\": 1"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let workdir = TempDir::new().unwrap();
    let config = workdir.path().join("broken.toml");
    fs::write(&config, "[run]\ndrain_timeout_secs = 0\n").unwrap();

    docpages(&workdir)
        .env("DOCPAGES_CONFIG", &config)
        .arg(workdir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}
