//! # ember-crypto
//!
//! Keccak-256, the only hash the interpreter needs (KECCAK256 and
//! EXTCODEHASH).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{keccak256, Hasher, Keccak256Hasher, EMPTY_KECCAK};
