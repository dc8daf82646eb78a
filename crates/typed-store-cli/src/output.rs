//! Output formatting helpers for the CLI.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use typed_store_core::Schema;

/// Schema description as JSON: one object per field, in declaration order.
pub fn schema_json(schema: &Schema) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = schema
        .fields()
        .map(|field| {
            serde_json::json!({
                "name": field.name(),
                "codec": field.codec_name(),
                "default": field.default_raw(),
            })
        })
        .collect();
    serde_json::Value::Array(fields)
}

/// Schema description as a bordered table.
pub fn schema_table(schema: &Schema) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Codec", "Default"]);
    for field in schema.fields() {
        table.add_row(vec![
            field.name().to_string(),
            field.codec_name().to_string(),
            field.default_raw().unwrap_or("-").to_string(),
        ]);
    }
    table.to_string()
}

/// Keys one per line, in the order given.
pub fn keys_plain(keys: &[String]) -> String {
    keys.join("\n")
}
