use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const FAST_ITERATIONS: &str = "1000";

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("credlock"));
    cmd.env_remove("CREDLOCK_NAME")
        .env_remove("CREDLOCK_DOB")
        .env_remove("CREDLOCK_PIN")
        .env("CREDLOCK_ITERATIONS", FAST_ITERATIONS);
    cmd
}

fn with_creds(pin: &str) -> Command {
    let mut cmd = bin();
    cmd.env("CREDLOCK_NAME", "Kofi Mensah")
        .env("CREDLOCK_DOB", "1990-05-12")
        .env("CREDLOCK_PIN", pin);
    cmd
}

fn document() -> Vec<u8> {
    (0..1000u32).map(|i| (i % 251) as u8).collect()
}

#[test]
fn lock_writes_container_next_to_pdf() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .arg("lock")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("report.locked"));

    let locked = fs::read(dir.path().join("report.locked")).unwrap();
    assert_eq!(locked.len(), 1044);
}

#[test]
fn lock_and_unlock_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234").arg("lock").arg(&input).assert().success();
    fs::remove_file(&input).unwrap();

    with_creds("1234")
        .arg("unlock")
        .arg(dir.path().join("report.locked"))
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf"));

    assert_eq!(fs::read(&input).unwrap(), document());
}

#[test]
fn wrong_pin_fails_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    let restored = dir.path().join("restored.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234").arg("lock").arg(&input).assert().success();

    with_creds("1235")
        .arg("unlock")
        .arg(dir.path().join("report.locked"))
        .arg("-o")
        .arg(&restored)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "decryption failed: wrong credentials or corrupted container",
        ));

    assert!(!restored.exists());
}

#[test]
fn name_spelling_does_not_matter() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"hello").unwrap();

    bin()
        .env("CREDLOCK_PIN", "0042")
        .args(["lock", "--name", "José Anne-Marié", "--dob", "1985-01-31"])
        .arg(&input)
        .assert()
        .success();

    bin()
        .env("CREDLOCK_PIN", "0042")
        .args(["unlock", "--name", "  jose anne - marie", "--dob", "1985-01-31"])
        .arg(dir.path().join("notes.txt.locked"))
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"hello");
}

#[test]
fn credentials_can_be_piped() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    bin()
        .arg("lock")
        .arg(&input)
        .write_stdin("Kofi Mensah\n1990-05-12\n1234\n")
        .assert()
        .success();

    with_creds("1234")
        .arg("unlock")
        .arg(dir.path().join("report.locked"))
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.pdf")).unwrap(), document());
}

#[test]
fn refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234").arg("lock").arg(&input).assert().success();

    with_creds("1234")
        .arg("lock")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    with_creds("1234")
        .arg("lock")
        .arg("--force")
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn invalid_pin_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("12a4")
        .arg("lock")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("PIN must be exactly 4 digits"));

    assert!(!dir.path().join("report.locked").exists());
}

#[test]
fn invalid_date_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .env("CREDLOCK_DOB", "12/05/1990")
        .arg("lock")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn short_container_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tiny.locked");
    fs::write(&input, [0u8; 10]).unwrap();

    with_creds("1234")
        .arg("unlock")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("container too short"));
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();

    with_creds("1234")
        .arg("unlock")
        .arg(dir.path().join("missing.locked"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn v1_container_records_iterations() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .args(["lock", "--format", "v1", "--iterations", "1500"])
        .arg(&input)
        .assert()
        .success();

    let output = bin()
        .env("CREDLOCK_ITERATIONS", "1")
        .args(["inspect", "--format", "v1", "--json"])
        .arg(dir.path().join("report.locked"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["format"], "v1");
    assert_eq!(info["version"], 1);
    assert_eq!(info["iterations"], 1500);
    assert_eq!(info["plaintext_len"], 1000);

    // the header wins over the configured iteration count
    with_creds("1234")
        .args(["unlock", "--format", "v1", "--iterations", "7"])
        .arg(dir.path().join("report.locked"))
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .success();
    assert_eq!(fs::read(dir.path().join("out.pdf")).unwrap(), document());
}

#[test]
fn inspect_raw_as_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234").arg("lock").arg(&input).assert().success();

    bin()
        .arg("inspect")
        .arg(dir.path().join("report.locked"))
        .assert()
        .success()
        .stdout(predicate::str::contains("raw"))
        .stdout(predicate::str::contains("not recorded"))
        .stdout(predicate::str::contains("1000 bytes"));
}

#[test]
fn zero_iterations_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .args(["lock", "--iterations", "0"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("iteration count"));
}

#[test]
fn oversized_iterations_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .args(["lock", "--format", "v1", "--iterations", "1000001"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 1000000"));

    assert!(!dir.path().join("report.locked").exists());
}

#[test]
fn tampered_v1_header_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    let locked = dir.path().join("report.locked");
    fs::write(&input, document()).unwrap();

    with_creds("1234")
        .args(["lock", "--format", "v1"])
        .arg(&input)
        .assert()
        .success();

    let mut data = fs::read(&locked).unwrap();
    data[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
    fs::write(&locked, &data).unwrap();

    with_creds("1234")
        .args(["unlock", "--format", "v1"])
        .arg(&locked)
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("iteration count"));

    data[5..9].copy_from_slice(&1001u32.to_le_bytes());
    fs::write(&locked, &data).unwrap();

    with_creds("1234")
        .args(["unlock", "--format", "v1"])
        .arg(&locked)
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("decryption failed"));

    assert!(!dir.path().join("out.pdf").exists());
}
