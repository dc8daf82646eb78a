//! tstore - typed access to a namespaced key-value store
//!
//! Command-line front end for `typed-store-core`. The schema and store
//! location come from a TOML config file; values live in a JSON file.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod logging;
mod output;
mod value;

use clap::Parser;
use typed_store_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::errors::exit_code_for;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Get(args)) => commands::handle_get(ctx, args)?,
        Some(Commands::Set(args)) => commands::handle_set(ctx, args)?,
        Some(Commands::Remove(args)) => commands::handle_remove(ctx, args)?,
        Some(Commands::Keys(args)) => commands::handle_keys(ctx, args)?,
        Some(Commands::Clear) => commands::handle_clear(ctx)?,
        Some(Commands::Schema(args)) => commands::handle_schema(ctx, args)?,
        Some(Commands::Completions(args)) => commands::handle_completions(args)?,
        None => {
            println!("tstore v{}", VERSION);
            println!("\nQuickstart:");
            println!("  tstore schema");
            println!("  tstore set token abc123");
            println!("  tstore get token");
            println!("  tstore keys");
            println!("\nRun `tstore --help` for full usage.");
        }
    }

    Ok(())
}
