//! Terminal output formatting
//!
//! Provides the ANSI style vocabulary and the renderer that turns run-state
//! transitions into colored progress output.

pub mod ansi;
pub mod render;

pub use ansi::{paint, Style};
pub use render::render;
