//! Command handlers.

use clap::CommandFactory;
use clap_complete::generate;
use tracing::info;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs, GetArgs, ListArgs, RemoveArgs, SetArgs};
use crate::errors::CliError;
use crate::output::{keys_plain, schema_json, schema_table};
use crate::value::{get_as_json, render_plain, set_from_text};

pub fn handle_get(ctx: &AppContext, args: &GetArgs) -> anyhow::Result<()> {
    let kind = codec_kind(ctx, &args.key)?;
    let storage = ctx.open_storage()?;
    let value = get_as_json(&storage, kind, &args.key, args.default)?;

    match value {
        Some(value) if args.json => println!("{}", serde_json::to_string_pretty(&value)?),
        Some(value) => println!("{}", render_plain(&value)),
        None if args.json => println!("null"),
        None => {
            return Err(CliError::not_found(format!("No value stored for '{}'", args.key), "").into())
        }
    }
    Ok(())
}

pub fn handle_set(ctx: &AppContext, args: &SetArgs) -> anyhow::Result<()> {
    let kind = codec_kind(ctx, &args.key)?;
    let storage = ctx.open_storage()?;
    set_from_text(&storage, kind, &args.key, &args.value)?;
    info!(key = %args.key, "value stored");
    if !ctx.quiet() {
        println!("Set {}", args.key);
    }
    Ok(())
}

pub fn handle_remove(ctx: &AppContext, args: &RemoveArgs) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    storage.remove(&args.key)?;
    if !ctx.quiet() {
        println!("Removed {}", args.key);
    }
    Ok(())
}

pub fn handle_keys(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let mut keys = storage.keys()?;
    keys.sort();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
    } else if !keys.is_empty() {
        println!("{}", keys_plain(&keys));
    }
    Ok(())
}

pub fn handle_clear(ctx: &AppContext) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    storage.clear_all()?;
    if !ctx.quiet() {
        println!("Cleared {} field(s)", storage.schema().len());
    }
    Ok(())
}

pub fn handle_schema(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let schema = ctx.config()?.schema()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&schema_json(&schema))?);
    } else {
        println!("{}", schema_table(&schema));
    }
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "tstore", &mut std::io::stdout());
    Ok(())
}

fn codec_kind(ctx: &AppContext, key: &str) -> anyhow::Result<crate::config::CodecKind> {
    ctx.config()?
        .codec_kind(key)
        .ok_or_else(|| CliError::invalid_input(format!("Unknown key: {}", key)).into())
}
