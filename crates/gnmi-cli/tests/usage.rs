//! Process-level tests for the command grammar.
//!
//! Usage errors are detected before any connection is made, so these run
//! without a device and must fail fast with the usage text on stderr.

use assert_cmd::Command;
use predicates::prelude::*;

fn gnmi() -> Command {
    Command::cargo_bin("gnmi").expect("binary builds")
}

#[test]
fn capabilities_is_rejected_without_dialing() {
    gnmi()
        .arg("capabilities")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'capabilities' not supported"))
        .stderr(predicate::str::contains("subscribe PATH+"));
}

#[test]
fn bare_invocation_prints_usage() {
    gnmi()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no operations specified"))
        .stderr(predicate::str::contains("get PATH+"));
}

#[test]
fn read_after_mutation_is_rejected() {
    gnmi()
        .args(["delete", "/a", "get", "/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'get' not allowed after 'update|replace|delete'",
        ));
}

#[test]
fn update_without_path_is_rejected() {
    gnmi()
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing path"));
}

#[test]
fn update_without_value_is_rejected() {
    gnmi()
        .args(["update", "/a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing JSON"));
}

#[test]
fn unknown_operation_is_rejected() {
    gnmi()
        .args(["fetch", "/a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown operation \"fetch\""));
}
