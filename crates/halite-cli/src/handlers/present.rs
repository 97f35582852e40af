use crate::args::PresentArgs;
use crate::schema::LoadedSchema;
use anyhow::{Context, Result};
use halite::{List, Options, Record, ResourceType, Value};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub fn handle(schema: &LoadedSchema, args: &PresentArgs) -> Result<()> {
    let input = match &args.input {
        Some(path) => read_json_file(path)?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            serde_json::from_str(&content).context("Failed to parse JSON from stdin")?
        }
    };

    let resource = match &args.resource_type {
        Some(name) => typed(input, schema.resource_type(name)?),
        None => Value::materialize(input),
    };

    let mut options = Options::new();
    if let Some(name) = &args.presenter {
        options = options.with(schema.presenter(name)?);
    }
    if let Some(root) = &args.root {
        options = options.root(root.clone());
    }
    if args.no_root {
        options = options.no_root();
    }
    if let Some(path) = &args.context {
        options = options.context(Value::materialize(read_json_file(path)?));
    }
    debug!(?options, "presenting input");

    let document = schema.dispatcher().present(resource, options)?;

    let output = if args.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    println!("{}", output);

    Ok(())
}

fn read_json_file(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Top-level objects become records of `resource_type`; an array becomes a
/// list of them. Nested values stay untyped.
fn typed(input: serde_json::Value, resource_type: &ResourceType) -> Value {
    match input {
        serde_json::Value::Object(object) => {
            Record::from_json(resource_type.clone(), object).into_value()
        }
        serde_json::Value::Array(items) => List::of(
            resource_type.clone(),
            items.into_iter().map(|item| match item {
                serde_json::Value::Object(object) => {
                    Record::from_json(resource_type.clone(), object).into_value()
                }
                other => Value::materialize(other),
            }),
        )
        .into(),
        other => Value::materialize(other),
    }
}
