//! Subcommands

pub mod exec;
pub mod run;
