//! Command-line behaviour of the `farm` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DOMAIN: &str = r#"
domainUID: d1
domainName: base_domain
adminSecret:
  name: d1-weblogic-credentials
asName: admin
asPort: 7001
startupControl: AUTO
"#;

const TOPOLOGY: &str = r#"
replicas: 1
clusters:
  - clusterName: C1
    servers: [s1, s2, s3]
  - clusterName: C2
    servers: [t1, t2]
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn farm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("farm").unwrap();
    // Keep user configuration out of the tests
    cmd.arg("--config").arg(dir.path().join("missing.toml"));
    cmd
}

#[test]
fn validate_prints_derived_defaults() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", DOMAIN);

    farm(&dir)
        .args(["--output", "json", "validate", "--domain"])
        .arg(&domain)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"imagePullPolicy\": \"IfNotPresent\""))
        .stdout(predicate::str::contains("\"startupControl\": \"AUTO\""));
}

#[test]
fn validate_rejects_bad_port() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", &DOMAIN.replace("7001", "0"));

    farm(&dir)
        .args(["validate", "--domain"])
        .arg(&domain)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid administration port 0"));
}

#[test]
fn plan_applies_override_and_default_replicas() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", DOMAIN);
    let topology = write(dir.path(), "topology.yaml", TOPOLOGY);
    let startup = write(
        dir.path(),
        "startup.json",
        r#"{ "clusterStartup": [{ "clusterName": "C1", "replicas": 1 }] }"#,
    );

    farm(&dir)
        .args(["--output", "json", "plan", "--domain"])
        .arg(&domain)
        .arg("--topology")
        .arg(&topology)
        .arg("--startup")
        .arg(&startup)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"s1\""))
        .stdout(predicate::str::contains("\"t1\""))
        .stdout(predicate::str::contains("\"s2\"").not());
}

#[test]
fn plan_shows_convergence_actions() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", DOMAIN);
    let topology = write(dir.path(), "topology.yaml", TOPOLOGY);

    farm(&dir)
        .args(["plan", "--domain"])
        .arg(&domain)
        .arg("--topology")
        .arg(&topology)
        .args(["--running", "admin,s1,s3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"));
}

#[test]
fn plan_fails_closed_on_unknown_cluster() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", DOMAIN);
    let topology = write(dir.path(), "topology.yaml", TOPOLOGY);
    let startup = write(
        dir.path(),
        "startup.yaml",
        "clusterStartup:\n  - clusterName: C9\n    replicas: 1\n",
    );

    farm(&dir)
        .args(["plan", "--domain"])
        .arg(&domain)
        .arg("--topology")
        .arg(&topology)
        .arg("--startup")
        .arg(&startup)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cluster 'C9'"));
}

#[test]
fn plan_reports_invalid_startup_document_as_validation_failure() {
    let dir = TempDir::new().unwrap();
    let domain = write(dir.path(), "domain.yaml", DOMAIN);
    let topology = write(dir.path(), "topology.yaml", TOPOLOGY);
    let startup = write(
        dir.path(),
        "startup.yaml",
        "clusterStartup:\n  - clusterName: C1\n    replicas: -1\n",
    );

    farm(&dir)
        .args(["plan", "--domain"])
        .arg(&domain)
        .arg("--topology")
        .arg(&topology)
        .arg("--startup")
        .arg(&startup)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Validation failed: Replica count for cluster 'C1' cannot be negative: -1",
        ));
}
