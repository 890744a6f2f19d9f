//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a peerplan command
pub fn peerplan() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("peerplan"));
    // Keep env-sourced filters out of test runs
    cmd.env_remove("PEERPLAN_SOURCE");
    cmd
}

/// Write a peering config into a temp directory, returning its path
pub fn write_config(tmp: &TempDir, yaml: &str) -> PathBuf {
    let path = tmp.path().join("peering.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

/// Two peers in different regions, one edge a→b
pub const CROSS_REGION_CONFIG: &str = r#"
peers:
  a:
    vpc_id: vpc-aaa
    region: us-east-1
    role_arn: 'arn:aws:iam::111111111111:role/PeeringA'
  b:
    vpc_id: vpc-bbb
    region: us-west-2
    role_arn: 'arn:aws:iam::222222222222:role/PeeringB'
peering_matrix:
  a: [b]
"#;

/// Three peers, two matrix sources, mixed regions
pub const MESH_CONFIG: &str = r#"
peers:
  a:
    vpc_id: vpc-aaa
    region: us-east-1
    role_arn: 'arn:aws:iam::111111111111:role/PeeringA'
  b:
    vpc_id: vpc-bbb
    region: us-west-2
    role_arn: 'arn:aws:iam::222222222222:role/PeeringB'
    dns_resolution: true
  c:
    vpc_id: vpc-ccc
    region: us-east-1
    role_arn: 'arn:aws:iam::333333333333:role/PeeringC'
peering_matrix:
  a: [b, c]
  c: [a]
"#;
