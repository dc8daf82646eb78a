use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use typed_store_core::VERSION;

/// tstore - typed access to a namespaced key-value store
#[derive(Parser)]
#[command(name = "tstore")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "TSTORE_CONFIG")]
    pub config: Option<String>,

    /// Path to the store file (overrides the config)
    #[arg(short, long, global = true, env = "TSTORE_PATH")]
    pub store: Option<String>,

    /// Namespace for physical keys (overrides the config)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a field
    Get(GetArgs),

    /// Write a field
    Set(SetArgs),

    /// Delete a field
    Remove(RemoveArgs),

    /// List stored keys in the namespace
    Keys(ListArgs),

    /// Remove every field declared in the schema
    Clear,

    /// Show the configured schema
    Schema(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Logical field name
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Fall back to the field's declared default
    #[arg(long)]
    pub default: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `set` command
#[derive(Args)]
pub struct SetArgs {
    /// Logical field name
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Value, parsed according to the field's codec
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for the `remove` command
#[derive(Args)]
pub struct RemoveArgs {
    /// Logical field name
    #[arg(value_name = "KEY")]
    pub key: String,
}

/// Arguments for listing commands (`keys`, `schema`)
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
