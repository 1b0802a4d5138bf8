//! CLI subcommands.

pub mod common;
pub mod fetch;
pub mod plan;
