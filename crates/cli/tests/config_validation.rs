use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATASET: &str = "\
symptom,condition,severity
fever,Flu,Medium
cough,COVID-19,High
";

const OTHER_DATASET: &str = "\
symptom,condition
rash,Allergies
";

#[allow(deprecated)]
fn checker(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("symptom-checker").expect("binary");
    cmd.current_dir(workdir)
        .env_remove("SYMPTOM_CHECKER_CONFIG")
        .env_remove("SYMPTOM_CHECKER_DATASET")
        .env_remove("SYMPTOM_CHECKER_MODEL_DIR")
        .env("RUST_LOG", "warn");
    cmd
}

fn setup() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("symptoms.csv"), DATASET).unwrap();
    fs::write(temp.path().join("other.csv"), OTHER_DATASET).unwrap();
    temp
}

fn json_body(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn unknown_config_keys_are_rejected_with_envelope() {
    let temp = setup();
    fs::write(
        temp.path().join("symptom-checker.toml"),
        "[display]\ncolour = \"blue\"\n",
    )
    .unwrap();

    let output = checker(temp.path())
        .args(["check", "fever", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let body = json_body(&output);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "invalid_config");
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("colour"), "message: {message}");
}

#[test]
fn zero_limit_names_the_key() {
    let temp = setup();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[display]\nstats_top = 0\n").unwrap();

    checker(temp.path())
        .args(["--config", config.to_str().unwrap(), "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("display.stats_top must be greater than zero"));
}

#[test]
fn config_env_var_is_used_when_no_flag() {
    let temp = setup();
    let config = temp.path().join("env.toml");
    fs::write(&config, "[display]\nquick_picks = [\"rash\"]\n").unwrap();

    checker(temp.path())
        .env("SYMPTOM_CHECKER_CONFIG", &config)
        .args(["symptoms", "--quick-picks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rash [Skin]"))
        .stdout(predicate::str::contains("Fever").not());
}

#[test]
fn dataset_precedence_is_file_env_flag() {
    let temp = setup();
    fs::write(
        temp.path().join("symptom-checker.toml"),
        "[dataset]\npath = \"missing.csv\"\n",
    )
    .unwrap();

    checker(temp.path())
        .args(["check", "rash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));

    checker(temp.path())
        .env("SYMPTOM_CHECKER_DATASET", "other.csv")
        .args(["check", "rash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Allergies"));

    checker(temp.path())
        .env("SYMPTOM_CHECKER_DATASET", "other.csv")
        .args(["--dataset", "symptoms.csv", "check", "cough"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COVID-19"));
}

#[test]
fn unknown_quick_pick_is_invalid_input() {
    let temp = setup();
    let output = checker(temp.path())
        .args(["check", "--quick", "hiccups", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let body = json_body(&output);
    assert_eq!(body["code"], "invalid_input");
    assert!(body["message"].as_str().unwrap().contains("hiccups"));
}
