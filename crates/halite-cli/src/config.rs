use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_ENV: &str = "HALITE_SCHEMA";
pub const DEFAULT_SCHEMA_FILE: &str = "halite.toml";

/// Where the schema file comes from, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Default(PathBuf),
}

impl SchemaSource {
    pub fn path(&self) -> &Path {
        match self {
            SchemaSource::Explicit(path) | SchemaSource::Env(path) | SchemaSource::Default(path) => {
                path
            }
        }
    }
}

/// Resolve the schema file path based on priority:
/// 1. Explicit path
/// 2. HALITE_SCHEMA environment variable
/// 3. ./halite.toml
pub fn resolve_schema_path(explicit_path: Option<&str>) -> SchemaSource {
    if let Some(path) = explicit_path {
        return SchemaSource::Explicit(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(SCHEMA_ENV) {
        return SchemaSource::Env(PathBuf::from(env_path));
    }

    SchemaSource::Default(PathBuf::from(DEFAULT_SCHEMA_FILE))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeConfig {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_true")]
    pub model: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyConfig {
    pub name: String,
    #[serde(default)]
    pub ignore_nil: bool,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub with: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_rel")]
    pub rel: String,
    pub href: String,
    #[serde(default)]
    pub ignore_nil: bool,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmbedConfig {
    pub name: String,
    #[serde(default)]
    pub with: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub ignore_nil: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetConfig {
    pub name: String,
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresenterConfig {
    pub name: String,
    #[serde(default)]
    pub presents: Option<String>,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, rename = "property")]
    pub property_specs: Vec<PropertyConfig>,
    #[serde(default, rename = "link")]
    pub links: Vec<LinkConfig>,
    #[serde(default, rename = "embed")]
    pub embeds: Vec<EmbedConfig>,
    #[serde(default, rename = "let")]
    pub lets: Vec<LetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaConfig {
    #[serde(default)]
    pub types: Vec<TypeConfig>,
    #[serde(default)]
    pub presenters: Vec<PresenterConfig>,
}

fn default_true() -> bool {
    true
}

fn default_rel() -> String {
    "self".to_string()
}

impl SchemaConfig {
    /// Load the schema from its resolved source. A missing default file
    /// yields an empty schema; an explicitly named file must exist.
    pub fn load(source: &SchemaSource) -> Result<Self> {
        match source {
            SchemaSource::Default(path) if !path.exists() => Ok(Self::default()),
            other => Self::load_from(other.path()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: SchemaConfig = toml::from_str(content)?;
        Ok(config)
    }
}
