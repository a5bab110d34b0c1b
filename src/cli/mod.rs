//! Command-line interface for commit-shame
//!
//! Argument parsing lives in [`commands`]; everything user-facing on stdout
//! goes through [`Output`].

pub mod commands;
pub mod output;

pub use output::Output;
