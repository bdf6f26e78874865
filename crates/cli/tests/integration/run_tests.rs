//! Integration tests for `list-artifacts run`.
//!
//! The build commands are shell one-liners, so these only run on unix.

#![cfg(unix)]

use predicates::prelude::*;

use crate::common::TestBuild;

#[test]
fn successful_build_is_inventoried() {
  let build = TestBuild::new();
  build.write_file("build.gradle", "");

  build
    .cmd("run")
    .arg("-o")
    .arg(&build.report_path)
    .arg("--")
    .arg("sh")
    .arg("-c")
    .arg("mkdir -p build/libs && printf 'line1\\nline2\\n' > build/libs/app.pom")
    .assert()
    .success();

  let report = build.report();
  assert_eq!(report["deployments"][0]["artifact"], "build/libs/app.pom");
  assert_eq!(report["deployments"][0]["content"]["content"], "line1\nline2");
}

#[test]
fn failed_build_is_skipped_and_status_preserved() {
  let build = TestBuild::gradle_multi_module();

  build
    .cmd("run")
    .arg("-o")
    .arg(&build.report_path)
    .arg("--")
    .arg("sh")
    .arg("-c")
    .arg("exit 3")
    .assert()
    .code(3)
    .stdout(predicate::str::contains("Build failed"))
    .stderr(predicate::str::contains("build failed, skipping artifacts dump"));

  assert!(!build.report_path.exists());
}

#[test]
fn inventory_failure_does_not_fail_build() {
  let build = TestBuild::gradle_multi_module();
  build.write_file("blocker", "");

  build
    .cmd("run")
    .arg("-o")
    .arg(build.root.join("blocker").join("artifacts.json"))
    .arg("--")
    .arg("true")
    .assert()
    .success()
    .stderr(predicate::str::contains("Artifact inventory failed"));
}
