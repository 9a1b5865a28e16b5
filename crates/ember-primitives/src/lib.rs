//! # ember-primitives
//!
//! Primitive types shared by the ember crates.
//!
//! - [`Address`]: 20-byte account identifier
//! - [`H256`]: 32-byte digest
//! - [`Word`]: the 256-bit unsigned integer every stack slot, memory word
//!   and storage value is made of

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for the 256-bit word
pub use primitive_types::{U256, U512};

/// Native value type of the machine
pub type Word = U256;

/// Decode a big-endian byte slice of at most 32 bytes into a word.
///
/// Longer slices keep their trailing (least significant) 32 bytes.
pub fn word_from_be_slice(bytes: &[u8]) -> Word {
    let start = bytes.len().saturating_sub(32);
    Word::from_big_endian(&bytes[start..])
}

/// Encode a word as 32 big-endian bytes
pub fn word_to_be_bytes(value: &Word) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
