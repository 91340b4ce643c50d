mod common;

use common::demo;
use toaster_testing::TestWorld;

#[test]
fn test_missing_database_points_to_import() {
    let world = TestWorld::new();
    let result = world.run(&["table", "builds"]).unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("toaster import"));
}

#[test]
fn test_unknown_table_fails() {
    let world = TestWorld::new().with_dataset(&demo().dataset);
    let result = world.run(&["table", "nope"]).unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("Unknown table: nope"));
}

#[test]
fn test_table_needing_project_without_one() {
    let world = TestWorld::new().with_dataset(&demo().dataset);
    let result = world.run(&["table", "machines"]).unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("pid"));
}

#[test]
fn test_unknown_project() {
    let world = TestWorld::new().with_dataset(&demo().dataset);
    let result = world
        .run(&["table", "builds", "--project", "9999"])
        .unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("No project with id 9999"));
}

#[test]
fn test_malformed_filter_selection() {
    let world = TestWorld::new().with_dataset(&demo().dataset);
    let result = world
        .run(&["table", "builds", "--filter", "outcome_filter"])
        .unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("outcome_filter"));
}

#[test]
fn test_invalid_today() {
    let demo = demo();
    let world = TestWorld::new().with_dataset(&demo.dataset);
    let pid = demo.project.to_string();
    let result = world
        .run(&["table", "builds", "--project", &pid, "--today", "10/03/2024"])
        .unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("--today"));
}

#[test]
fn test_invalid_config_rejected() {
    let world = TestWorld::new()
        .with_dataset(&demo().dataset)
        .with_config("[tables]\npage_size = 0\n");
    let result = world.run(&["tables"]).unwrap();

    assert!(!result.success());
}

#[test]
fn test_no_command_prints_guidance() {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;

    let world = TestWorld::new();
    let mut cmd = cargo_bin_cmd!("toaster");
    world.configure_command(&mut cmd);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("toaster import"));
}
