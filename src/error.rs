//! Error types for the reporter pipeline
//!
//! Every fault is local to a single dispatch. There is no recovery: the
//! binary reports the error and exits non-zero.

use thiserror::Error;

/// Errors raised while decoding, reducing, or rendering protocol commands
#[derive(Error, Debug)]
pub enum ReporterError {
    /// A marker-prefixed line had no `:<type>` field
    #[error("Malformed command line (no command type): {line:?}")]
    MissingCommandType {
        /// The raw accumulated command line
        line: String,
    },

    /// A command that requires an argument arrived without one
    #[error("Command '{command}' requires a {argument} argument")]
    MissingArgument {
        /// Wire name of the command
        command: &'static str,
        /// Human-readable name of the missing argument
        argument: &'static str,
    },

    /// A suite-scoped command arrived before any `desc`
    #[error("Command '{command}' received before any 'desc' opened a suite")]
    NoCurrentSuite {
        /// Wire name of the offending command
        command: &'static str,
    },

    /// A case-scoped command arrived before any `it` in the current suite
    #[error("Command '{command}' received before any 'it' opened a case in suite '{suite}'")]
    NoCurrentCase {
        /// Wire name of the offending command
        command: &'static str,
        /// Name of the current suite
        suite: String,
    },

    /// A style name outside the fixed formatter vocabulary
    #[error("Unknown style token: '{0}'")]
    UnknownStyle(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading input or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, ReporterError>;
