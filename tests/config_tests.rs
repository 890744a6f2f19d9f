//! Configuration tests - validate and edges commands, error surfacing

mod common;

use common::{peerplan, write_config, MESH_CONFIG};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_validate_accepts_good_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, MESH_CONFIG);

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 peer(s)"))
        .stdout(predicate::str::contains("3 edge(s)"))
        .stdout(predicate::str::contains("vpc-aaa"));
}

#[test]
fn test_validate_flags_empty_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, "peers: {}\npeering_matrix: {}");

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("no peers defined"));
}

#[test]
fn test_validate_reports_dangling_target() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r#"
peers:
  a:
    vpc_id: vpc-aaa
    role_arn: 'arn:aws:iam::111111111111:role/A'
peering_matrix:
  a: [ghost]
"#,
    );

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_validate_reports_missing_vpc_id() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r#"
peers:
  broken:
    role_arn: 'arn:aws:iam::111111111111:role/A'
peering_matrix: {}
"#,
    );

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken"))
        .stderr(predicate::str::contains("vpc_id"));
}

#[test]
fn test_validate_reports_repeated_matrix_target() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r#"
peers:
  a:
    vpc_id: vpc-aaa
    role_arn: 'arn:aws:iam::111111111111:role/A'
  b:
    vpc_id: vpc-bbb
    role_arn: 'arn:aws:iam::222222222222:role/B'
peering_matrix:
  a: [b, b]
"#,
    );

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than once"));
}

#[test]
fn test_validate_reports_malformed_role_arn() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r#"
peers:
  a:
    vpc_id: vpc-aaa
    role_arn: 'not-a-role'
peering_matrix: {}
"#,
    );

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-role"));
}

#[test]
fn test_validate_reports_yaml_syntax_errors() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, "peers:\n  a: [unclosed");

    peerplan()
        .args(["validate", "-c", path.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_file_fails() {
    peerplan()
        .args(["validate", "-c", "/nonexistent/peering.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_edges_lists_expanded_pairs() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, MESH_CONFIG);

    peerplan()
        .args(["edges", "-c", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-accept"))
        .stdout(predicate::str::contains("explicit-accept"))
        .stdout(predicate::str::contains("us-west-2"));
}

#[test]
fn test_edges_respects_source_filter() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(&tmp, MESH_CONFIG);

    let output = peerplan()
        .args(["edges", "-c", path.to_str().unwrap(), "--source", "c"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("c"));
    assert!(!stdout.contains("us-west-2"));
}
