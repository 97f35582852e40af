//! Custom assertions for presented documents.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that `json` is an object whose keys are exactly `expected`, in
/// that order.
pub fn assert_keys(json: &Value, expected: &[&str]) -> Result<()> {
    let object = json.as_object().context("Expected a JSON object")?;
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();

    if keys != expected {
        anyhow::bail!("Expected keys {:?}, got {:?}", expected, keys);
    }

    Ok(())
}

/// Assert that `key` is not present at all (as opposed to being null).
pub fn assert_absent(json: &Value, key: &str) -> Result<()> {
    let object = json.as_object().context("Expected a JSON object")?;

    if let Some(value) = object.get(key) {
        anyhow::bail!("Expected '{}' to be omitted, found {}", key, value);
    }

    Ok(())
}

/// Follow a `/`-separated path of object keys and array indices.
pub fn at<'a>(json: &'a Value, path: &str) -> Result<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(json, |node, segment| {
            let next = match segment.parse::<usize>() {
                Ok(index) => node.get(index),
                Err(_) => node.get(segment),
            };
            next.with_context(|| format!("Missing '{}' in path '{}'", segment, path))
        })
}

/// Number of objects in the tree that carry `key`.
pub fn count_objects_with(json: &Value, key: &str) -> usize {
    match json {
        Value::Object(object) => {
            usize::from(object.contains_key(key))
                + object
                    .values()
                    .map(|value| count_objects_with(value, key))
                    .sum::<usize>()
        }
        Value::Array(items) => items.iter().map(|item| count_objects_with(item, key)).sum(),
        _ => 0,
    }
}
