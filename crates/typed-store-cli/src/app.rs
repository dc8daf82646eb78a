//! Application context for the tstore CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config and opens the typed
//! store described by it.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;
use tracing::debug;
use typed_store_core::{JsonFileAdapter, TypedStorage};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, StoreConfig};
use crate::errors::CliError;

/// Application context that bundles CLI args with the store config.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<StoreConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the store configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&StoreConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path(self.cli)?;
            if !path.exists() {
                return Err(CliError::not_found(
                    format!("Config file not found: {}", path.display()),
                    "Hint: create it, pass --config, or set TSTORE_CONFIG.",
                )
                .into());
            }
            debug!(path = %path.display(), "loading config");
            read_config(&path)
        })
    }

    /// Open the typed store using config values and CLI overrides.
    pub fn open_storage(&self) -> anyhow::Result<TypedStorage<JsonFileAdapter>> {
        let config = self.config()?;
        let schema = config.schema()?;
        let store_path = self
            .cli
            .store
            .clone()
            .unwrap_or_else(|| config.store.path.clone());
        let namespace = self
            .cli
            .namespace
            .clone()
            .or_else(|| config.store.namespace.clone());
        debug!(store = %store_path, namespace = ?namespace, "opening store");

        let adapter = JsonFileAdapter::new(store_path);
        Ok(match namespace {
            Some(ns) if !ns.is_empty() => TypedStorage::with_namespace(adapter, schema, ns),
            _ => TypedStorage::new(adapter, schema),
        })
    }
}

/// Resolve the config file path: `--config` / `TSTORE_CONFIG`, then the XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_config_path()
}
