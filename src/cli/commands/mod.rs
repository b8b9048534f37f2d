//! CLI subcommands

pub mod compare;
pub mod simulate;
