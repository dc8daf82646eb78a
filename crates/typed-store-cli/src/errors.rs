//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use typed_store_core::StoreError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, stored value)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                if hint.is_empty() {
                    write!(f, "{}", message)
                } else {
                    write!(f, "{}\n{}", message, hint)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error surfaced by a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::UnknownKey(_)) | Some(StoreError::TypeMismatch { .. }) => {
            exit_codes::INVALID_INPUT
        }
        _ => exit_codes::FAILURE,
    }
}
