//! CLI subcommand implementations.

pub mod latest;
pub mod search;
