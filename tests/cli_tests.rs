//! Command-line behavior tests
//!
//! Exercise the `fasta-validator` binary end to end: exit codes, output
//! formats, parameter files and the statistics/hash info side files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create input");
    file.write_all(content).expect("Failed to write input");
    path
}

fn validator() -> Command {
    Command::cargo_bin("fasta-validator").expect("binary built")
}

#[test]
fn test_clean_file_text_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "clean.fasta", b">PROT1 first\nACDE\n>PROT2\nFGHI\n");

    validator()
        .arg("validate")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 2"))
        .stdout(predicate::str::contains("Errors: 0"));
}

#[test]
fn test_content_errors_do_not_fail_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "dups.fasta", b">PROT1\nACDE\n>PROT1\nACDE\n");

    validator()
        .arg("validate")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate protein name"))
        .stdout(predicate::str::contains("duplicate sequence content"));
}

#[test]
fn test_strict_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bad.fasta", b">PROT1\nAC1E\n");

    validator()
        .args(["validate", "--strict"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 error(s) found"));
}

#[test]
fn test_missing_input_fails() {
    validator()
        .args(["validate", "/no/such/file.fasta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.fasta", b">PROT1\nACDE*\n");

    let output = validator()
        .args(["validate", "--format", "json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["succeeded"], true);
    assert_eq!(json["error_count"]["total"], 1);
    assert_eq!(json["errors"][0]["category"], "invalid_residue_character");
    assert_eq!(json["errors"][0]["line_number"], 2);
}

#[test]
fn test_allow_asterisk_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.fasta", b">PROT1\nACDE*\n");

    validator()
        .args(["validate", "--format", "tsv", "--allow-asterisk"])
        .arg(&input)
        .assert()
        .success()
        .stdout("severity\tcategory\tline\tmessage\n");
}

#[test]
fn test_parameter_file_overrides_flags() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.fasta", b">PROT1\nACDE*\n");
    let params = write_input(&dir, "params.json", br#"{"allow_asterisk_in_residues": false}"#);

    validator()
        .args(["validate", "--allow-asterisk", "--format", "tsv", "--parameter-file"])
        .arg(&params)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid residue character"));
}

#[test]
fn test_stats_and_hash_info_files() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "db.fasta", b">PROT1\nACGT\n>PROT2\nacgt\n");

    validator()
        .args(["validate", "--stats", "--save-hash-info"])
        .arg(&input)
        .assert()
        .success();

    let stats = std::fs::read_to_string(dir.path().join("db_stats.txt")).unwrap();
    assert!(stats.contains("entries\t2"));
    assert!(stats.contains("warnings\t1"));

    let hashes = std::fs::read_to_string(dir.path().join("db_sequence_hashes.tsv")).unwrap();
    assert!(hashes.contains("f1f8f4bf413b16ad135722aa4591043e\t4\t2\tPROT1\tPROT2"));
}

#[test]
fn test_no_side_files_on_failure() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "db.fasta", b">PROT1\nACGT\n");
    let params = write_input(&dir, "params.json", b"{ not json");

    validator()
        .args(["validate", "--stats", "--parameter-file"])
        .arg(&params)
        .arg(&input)
        .assert()
        .failure();

    assert!(!dir.path().join("db_stats.txt").exists());
}

#[test]
fn test_params_template() {
    let output = validator().arg("params").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["minimum_name_length"], 3);
    assert_eq!(json["maximum_name_length"], 34);
    assert_eq!(json["warn_on_blank_lines_between_entries"], true);
}
