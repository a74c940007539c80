//! Command implementations for the LECG CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod build;
pub mod completions;
pub mod resize_icons;
pub mod scan_log;
