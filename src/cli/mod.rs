//! Command-line interface for the `zbatch` binary.
//!
//! [`args`] turns `argv` into a [`args::CliConfig`]; `main` expands
//! directories, sets the notification level and runs the batch.

pub mod args;

pub use args::{parse_args, CliConfig};
