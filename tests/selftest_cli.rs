// Runs the self-test binary the way CI does.

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn selftest(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("unittest_selftest").unwrap();
    cmd.env("XML_UNIT_TEST_OUTPUT_DIR", dir.path())
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn full_suite_passes_and_writes_report() {
    let dir = TempDir::new().unwrap();
    selftest(&dir).assert().success().stdout(
        contains("Test artifacts:")
            .and(contains("selftest.xml"))
            .and(contains("Math_Add ... ok"))
            .and(contains("Fixed_Capacity ... ok"))
            .and(contains("Filenames_01[Name only, extension] ... ok"))
            .and(contains("expected failure: off-by-one is known"))
            .and(contains("20 tests run, 18 succeeded, 2 skipped, 0 failed")),
    );

    let report = fs::read_to_string(dir.path().join("selftest.xml")).unwrap();
    assert!(report.contains("<testsuite failures=\"0000000000\" skipped=\"0000000002\" tests=\"0000000020\""));
    assert!(report.ends_with("</testsuite>\n</testsuites>\n"));
}

#[test]
fn filter_selects_by_prefix_and_ignores_flags() {
    let dir = TempDir::new().unwrap();
    selftest(&dir)
        .args(["Math", "-v"])
        .assert()
        .success()
        .stdout(
            contains("Math_Sum[2 + 3 = 5] ... ")
                .and(contains("4 tests run, 3 succeeded, 1 skipped, 0 failed"))
                .and(contains("Pins_Led").not()),
        );
}

#[test]
fn report_dir_flag_overrides_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();
    selftest(&env_dir)
        .arg("--report-dir")
        .arg(flag_dir.path())
        .arg("Pins")
        .assert()
        .success()
        .stdout(contains("2 tests run, 2 succeeded, 0 skipped, 0 failed"));

    assert!(flag_dir.path().join("selftest.xml").exists());
    assert!(!env_dir.path().join("selftest.xml").exists());
}
