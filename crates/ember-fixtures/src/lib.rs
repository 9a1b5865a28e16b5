//! # ember-fixtures
//!
//! JSON fixture integration for the ember EVM.
//!
//! This crate provides:
//! - Parsing of fixture records (`name`, `code`, `tx`, `block`, `state`, `expect`)
//! - Hex decoding at the I/O boundary
//! - A runner that executes each fixture independently and checks its
//!   expected stack, logs, return data and success flag
//! - Per-file result aggregation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod runner;
mod types;

pub use error::{FixtureError, FixtureResult};
pub use runner::{build_environment, build_world, check_outcome, FixtureReport, FixtureRunner};
pub use types::*;
