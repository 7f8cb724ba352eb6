// CLI surface checks against the real binary: help text, the model
// catalog, and the validations that must fail before any model call.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn binary() -> Command {
    Command::cargo_bin("llm-review").expect("binary exists")
}

#[test]
fn help_lists_the_review_options() {
    binary()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--staged")
                .and(predicate::str::contains("--markdown"))
                .and(predicate::str::contains("--max-questions"))
                .and(predicate::str::contains("--detail"))
                .and(predicate::str::contains("--context")),
        );
}

#[test]
fn list_models_prints_the_catalog_and_exits() {
    binary()
        .arg("--list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Models:").and(predicate::str::contains("gpt-4o-mini")));
}

#[test]
fn invalid_model_is_a_usage_error_before_any_work() {
    binary()
        .args(["--model", "definitely-not-a-model"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid model name"));
}

#[test]
fn invalid_detail_level_is_rejected_by_the_parser() {
    binary().args(["--detail", "extreme"]).assert().failure();
}

#[test]
fn missing_markdown_directory_is_a_usage_error() {
    let dir = tempdir().expect("temp dir");

    binary()
        .current_dir(dir.path())
        .args(["--markdown", "missing-reports"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn no_staged_changes_exits_cleanly_without_a_model() {
    let dir = tempdir().expect("temp dir");
    let init = std::process::Command::new("git")
        .arg("-C")
        .arg(dir.path())
        .args(["init", "--quiet"])
        .status()
        .expect("git is available");
    assert!(init.success());

    binary()
        .current_dir(dir.path())
        .arg("--staged")
        .env_remove("OPENAI_API_KEY")
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes found"));
}
