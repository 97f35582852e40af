mod common;

use common::{TODO_SCHEMA, TestFixture};
use predicates::prelude::*;

#[test]
fn test_check_summarizes_presenters() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);

    let output = fixture.command().arg("check").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout, @r"
    todo (presents Todo): 1 properties, 0 links, 0 embeds, 0 lets
    user (presents User): 2 properties, 2 links, 1 embeds, 1 lets
    summary: 3 properties, 2 links, 1 embeds, 1 lets
    Schema OK: 2 types, 3 presenters
    ");
}

#[test]
fn test_check_with_explicit_schema_path() {
    let fixture = TestFixture::new();
    let schema = fixture.write("other.toml", "[[presenters]]\nname = \"empty\"\n");

    fixture
        .command()
        .arg("--schema")
        .arg(&schema)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "empty: 0 properties, 0 links, 0 embeds, 0 lets",
        ));
}

#[test]
fn test_check_without_schema_file() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema OK: 0 types, 0 presenters"));
}

#[test]
fn test_check_reports_missing_explicit_schema() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["--schema", "nope.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schema file: nope.toml"));
}

#[test]
fn test_check_reports_forward_reference() {
    let fixture = TestFixture::new();
    fixture.with_schema(
        r#"
[[presenters]]
name = "user"

[[presenters.property]]
name = "todos"
with = "todo"
"#,
    );

    fixture
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Configuration error: unknown presenter 'todo'",
        ));
}
