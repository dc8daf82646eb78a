use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use typed_store_core::{BoolCodec, JsonCodec, NumberCodec, Schema, StringCodec};

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub fields: Vec<FieldSection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldSection {
    pub name: String,
    pub codec: CodecKind,
    pub default: Option<toml::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    String,
    Boolean,
    Number,
    Json,
}

impl StoreConfig {
    /// Build the core schema from the `[[fields]]` tables.
    pub fn schema(&self) -> anyhow::Result<Schema> {
        let mut builder = Schema::builder();
        for field in &self.fields {
            let name = field.name.clone();
            builder = match (&field.default, field.codec) {
                (None, CodecKind::String) => builder.field(name, StringCodec),
                (None, CodecKind::Boolean) => builder.field(name, BoolCodec),
                (None, CodecKind::Number) => builder.field(name, NumberCodec),
                (None, CodecKind::Json) => builder.field(name, JsonCodec::<serde_json::Value>::new()),
                (Some(value), CodecKind::String) => {
                    let default = value
                        .as_str()
                        .ok_or_else(|| invalid_default(&field.name, "a string"))?;
                    builder.field_with_default(name, StringCodec, default.to_string())
                }
                (Some(value), CodecKind::Boolean) => {
                    let default = value
                        .as_bool()
                        .ok_or_else(|| invalid_default(&field.name, "a boolean"))?;
                    builder.field_with_default(name, BoolCodec, default)
                }
                (Some(value), CodecKind::Number) => {
                    let default = match value {
                        toml::Value::Integer(n) => *n as f64,
                        toml::Value::Float(n) => *n,
                        _ => return Err(invalid_default(&field.name, "a number")),
                    };
                    builder.field_with_default(name, NumberCodec, default)
                }
                (Some(value), CodecKind::Json) => {
                    let default = serde_json::to_value(value).map_err(|e| {
                        anyhow::anyhow!("Invalid default for field '{}': {}", field.name, e)
                    })?;
                    builder.field_with_default(name, JsonCodec::<serde_json::Value>::new(), default)
                }
            };
        }
        builder
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid schema in config: {}", e))
    }

    /// Codec kind declared for `name`, if any.
    pub fn codec_kind(&self, name: &str) -> Option<CodecKind> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.codec)
    }
}

fn invalid_default(field: &str, expected: &str) -> anyhow::Error {
    anyhow::anyhow!("Invalid default for field '{}': expected {}", field, expected)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<StoreConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("tstore"));
        }
    }
    Ok(home_dir()?.join(".config").join("tstore"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
