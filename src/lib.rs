//! Picotest - line-oriented test reporter
//!
//! Picotest reads a character stream that mixes console text with
//! marker-prefixed test-protocol commands, folds the commands into a
//! suite/case/assertion tree, and renders color-coded progress to the
//! terminal.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;
pub mod reporter;
pub mod selftest;
pub mod state;

#[cfg(test)]
pub mod testutil;

// Re-export commonly used types
pub use cli::{render, Style};
pub use config::ReporterConfig;
pub use error::{ReporterError, Result};
pub use protocol::{decode_line, Action, Command, Demultiplexer, Sink};
pub use reporter::{run, Reporter};
pub use state::{reduce, Case, RunState, Store, Suite};
