//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn examforge() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("examforge").unwrap()
}

#[test]
fn help_lists_subcommands() {
    examforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("list-models"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn init_creates_config_and_examples() {
    let dir = TempDir::new().unwrap();

    examforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examforge.toml"));

    assert!(dir.path().join("examforge.toml").exists());
    assert!(dir.path().join("exams/se-2025-06-05-questions.toml").exists());
    assert!(dir.path().join("exams/se-2025-06-05-responses.toml").exists());
    assert!(dir.path().join("solutions/CI-1.toml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    examforge().current_dir(dir.path()).arg("init").assert().success();
    examforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_example_documents() {
    let dir = TempDir::new().unwrap();
    examforge().current_dir(dir.path()).arg("init").assert().success();

    examforge()
        .current_dir(dir.path())
        .args(["validate", "--date", "2025-06-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions, 2 students"))
        .stdout(predicate::str::contains("All documents valid"));
}

#[test]
fn validate_missing_exam_is_fatal() {
    let dir = TempDir::new().unwrap();

    examforge()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .args(["validate", "--date", "1999-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input not found"));
}

#[test]
fn validate_flags_missing_checklist() {
    let dir = TempDir::new().unwrap();
    examforge().current_dir(dir.path()).arg("init").assert().success();
    std::fs::remove_file(dir.path().join("solutions/VC-1.toml")).unwrap();

    examforge()
        .current_dir(dir.path())
        .args(["validate", "--date", "2025-06-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[VC-1]"))
        .stdout(predicate::str::contains("no checklist file"));
}

#[test]
fn run_without_credentials_fails_fast() {
    let dir = TempDir::new().unwrap();
    examforge().current_dir(dir.path()).arg("init").assert().success();

    examforge()
        .current_dir(dir.path())
        .env_remove("GROQ_API_KEY")
        .args(["run", "--date", "2025-06-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn assess_unknown_student_lists_candidates() {
    let dir = TempDir::new().unwrap();
    examforge().current_dir(dir.path()).arg("init").assert().success();

    examforge()
        .current_dir(dir.path())
        .env("GROQ_API_KEY", "gsk-test-not-used")
        .args(["assess", "nobody@nowhere.test", "--date", "2025-06-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("student not found"))
        .stderr(predicate::str::contains("alice@university.edu"));
}

#[test]
fn assess_ambiguous_prefix_fails() {
    let dir = TempDir::new().unwrap();
    examforge().current_dir(dir.path()).arg("init").assert().success();

    // Both example students share no 10-char prefix, so extend the roster.
    let responses_path = dir.path().join("exams/se-2025-06-05-responses.toml");
    let mut responses = std::fs::read_to_string(&responses_path).unwrap();
    responses.push_str(
        "\n[[students]]\nemailaddress = \"alice@university.example\"\nstate = \"Finished\"\nresponse1 = \"an answer\"\n",
    );
    std::fs::write(&responses_path, responses).unwrap();

    examforge()
        .current_dir(dir.path())
        .env("GROQ_API_KEY", "gsk-test-not-used")
        .args(["assess", "alice@university", "--date", "2025-06-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"));
}

#[test]
fn list_models_without_config() {
    let dir = TempDir::new().unwrap();

    examforge()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("GROQ_API_KEY")
        .env_remove("EXAMFORGE_OPENAI_KEY")
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No judge backends configured"));
}

#[test]
fn list_models_with_groq_key() {
    let dir = TempDir::new().unwrap();

    examforge()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("GROQ_API_KEY", "gsk-test")
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("llama-3.3-70b-versatile"));
}
