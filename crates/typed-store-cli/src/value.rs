//! Conversions between command-line text, typed field values and JSON output.

use typed_store_core::{JsonFileAdapter, TypedStorage};

use crate::config::CodecKind;
use crate::errors::CliError;

/// Parse `text` per `kind` and store it under `key`.
pub fn set_from_text(
    storage: &TypedStorage<JsonFileAdapter>,
    kind: CodecKind,
    key: &str,
    text: &str,
) -> anyhow::Result<()> {
    match kind {
        CodecKind::String => storage.set(key, text.to_string())?,
        CodecKind::Boolean => storage.set(key, parse_bool(text)?)?,
        CodecKind::Number => storage.set(key, parse_number(text)?)?,
        CodecKind::Json => {
            let value: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| CliError::invalid_input(format!("Invalid JSON value: {}", e)))?;
            storage.set(key, value)?
        }
    }
    Ok(())
}

/// Read `key` as JSON, optionally falling back to the declared default.
pub fn get_as_json(
    storage: &TypedStorage<JsonFileAdapter>,
    kind: CodecKind,
    key: &str,
    use_default: bool,
) -> anyhow::Result<Option<serde_json::Value>> {
    let value = match kind {
        CodecKind::String => read::<String>(storage, key, use_default)?.map(serde_json::Value::from),
        CodecKind::Boolean => read::<bool>(storage, key, use_default)?.map(serde_json::Value::from),
        CodecKind::Number => read::<f64>(storage, key, use_default)?.map(number_json),
        CodecKind::Json => read::<serde_json::Value>(storage, key, use_default)?,
    };
    Ok(value)
}

/// Plain-text rendering: strings unquoted, everything else as compact JSON.
pub fn render_plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read<T: 'static>(
    storage: &TypedStorage<JsonFileAdapter>,
    key: &str,
    use_default: bool,
) -> typed_store_core::Result<Option<T>> {
    if use_default {
        storage.get_or_default(key)
    } else {
        storage.get(key)
    }
}

/// Whole numbers print without a fractional part; NaN and infinities have no
/// JSON form and become strings.
fn number_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        serde_json::Value::from(n as i64)
    } else if n.is_finite() {
        serde_json::Value::from(n)
    } else {
        serde_json::Value::from(n.to_string())
    }
}

fn parse_bool(text: &str) -> anyhow::Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CliError::invalid_input(format!(
            "Invalid boolean '{}': expected true, false, 1 or 0",
            other
        ))
        .into()),
    }
}

fn parse_number(text: &str) -> anyhow::Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CliError::invalid_input(format!("Invalid number '{}'", text)).into())
}
