mod common;

use common::{STEPHEN, TODO_SCHEMA, TestFixture};
use predicates::prelude::*;
use serde_json::json;

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_present_with_registered_presenter() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);
    let input = fixture.write("stephen.json", STEPHEN);

    let output = fixture
        .command()
        .args(["present", "--type", "User"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "user": {
                "name": "Stephen",
                "_links": {"self": {"href": "/users/1"}},
                "_embedded": {"todos": [{"description": "Buy milk"}]}
            }
        })
    );
}

#[test]
fn test_present_reads_stdin() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);

    let output = fixture
        .command()
        .args(["present", "--type", "User", "--no-root", "--compact"])
        .write_stdin(STEPHEN)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with(r#"{"name":"Stephen""#));
}

#[test]
fn test_present_array_uses_plural_root() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);
    let input = fixture.write("users.json", r#"[{"name": "Alice"}, {"name": "Bob", "id": 2}]"#);

    let output = fixture
        .command()
        .args(["present", "--type", "User"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "users": [
                {"name": "Alice", "_links": {"self": {"href": null}}, "_embedded": {"todos": null}},
                {"name": "Bob", "_links": {"self": {"href": "/users/2"}}, "_embedded": {"todos": null}}
            ]
        })
    );
}

#[test]
fn test_present_with_explicit_presenter_and_context() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);
    let input = fixture.write(
        "stephen.json",
        r#"{"id": 1, "name": "Stephen", "avatar_url": "/a.png", "todo_count": 3}"#,
    );
    let context = fixture.write("context.json", r#"{"salutation": "Hello"}"#);

    let output = fixture
        .command()
        .args(["present", "--presenter", "summary", "--root", "person", "--context"])
        .arg(&context)
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "person": {
                "name": "Stephen",
                "greeting": "Hello Stephen",
                "todo_count": 3,
                "_links": {
                    "self": {"href": "/users/1"},
                    "avatar": {"href": "/a.png"}
                },
                "_embedded": {"todos": null}
            }
        })
    );
}

#[test]
fn test_present_without_presenter_echoes_input() {
    let fixture = TestFixture::new();
    let input = fixture.write("raw.json", r#"{"b": 1, "a": [true, null]}"#);

    fixture
        .command()
        .args(["present", "--compact"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"b\":1,\"a\":[true,null]}\n"));
}

#[test]
fn test_schema_from_environment() {
    let fixture = TestFixture::new();
    let schema = fixture.write("custom.toml", TODO_SCHEMA);
    let input = fixture.write("todo.json", r#"{"description": "Walk dog", "done": true}"#);

    fixture
        .command()
        .env("HALITE_SCHEMA", &schema)
        .args(["present", "--type", "Todo", "--compact"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"todo":{"description":"Walk dog"}}"#,
        ));
}

#[test]
fn test_unknown_presenter_fails() {
    let fixture = TestFixture::new();
    fixture.with_schema(TODO_SCHEMA);
    let input = fixture.write("stephen.json", STEPHEN);

    fixture
        .command()
        .args(["present", "--presenter", "missing"])
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown presenter 'missing'"));
}

#[test]
fn test_invalid_json_fails() {
    let fixture = TestFixture::new();
    let input = fixture.write("broken.json", "{not json");

    fixture
        .command()
        .arg("present")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON"));
}

#[test]
fn test_root_and_no_root_conflict() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["present", "--root", "x", "--no-root"])
        .assert()
        .failure();
}
