//! Test-protocol wire handling
//!
//! This module separates command lines from console text and decodes
//! them into typed actions.

pub mod command;
pub mod demux;

pub use command::{decode_line, Action, Command};
pub use demux::{Demultiplexer, Recorder, Sink, TERMINATOR};
