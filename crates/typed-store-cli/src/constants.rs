//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure (adapter, codec, or I/O error).
    pub const FAILURE: i32 = 1;

    /// Resource not found (config file, stored value).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input (unknown key, unparseable value).
    pub const INVALID_INPUT: i32 = 4;
}
