//! Tooling
//!
//! Command-line entry points over the sync pipeline and the offline
//! reconciliation commands.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
