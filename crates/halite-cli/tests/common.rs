//! Common test utilities shared across integration tests.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TODO_SCHEMA: &str = r#"
[[types]]
name = "User"

[[types]]
name = "Todo"

[[presenters]]
name = "todo"
presents = "Todo"
properties = ["description"]

[[presenters]]
name = "user"
presents = "User"
properties = ["name"]

[[presenters.link]]
href = "/users/{id}"

[[presenters.link]]
rel = "avatar"
href = "{avatar_url}"
ignore_nil = true

[[presenters.embed]]
name = "todos"
with = "todo"

[[presenters.let]]
name = "greeting"
template = "{@salutation} {name}"

[[presenters.property]]
name = "greeting"
ignore_nil = true

[[presenters]]
name = "summary"
extends = "user"

[[presenters.property]]
name = "todo_count"
template = "{todo_count}"
"#;

pub const STEPHEN: &str = r#"{
  "id": 1,
  "name": "Stephen",
  "password": "secret",
  "todos": [{"description": "Buy milk", "done": false}]
}"#;

pub struct TestFixture {
    temp_dir: TempDir,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Write the schema as `halite.toml` and return its path.
    pub fn with_schema(&self, content: &str) -> PathBuf {
        self.write("halite.toml", content)
    }

    /// The binary, run from the fixture directory with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("halite");
        cmd.current_dir(self.dir())
            .env_remove("HALITE_SCHEMA")
            .env_remove("RUST_LOG");
        cmd
    }
}
