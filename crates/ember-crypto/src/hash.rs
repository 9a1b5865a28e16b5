//! Keccak-256 hashing

use ember_primitives::H256;
use sha3::{Digest, Keccak256};

/// keccak256 of the empty byte string
pub const EMPTY_KECCAK: H256 = H256::from_bytes([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c,
    0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b,
    0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Opaque `hash(bytes) -> bytes32` capability handed to the interpreter
pub trait Hasher {
    /// Hash an arbitrary-length buffer
    fn hash(&self, data: &[u8]) -> H256;
}

/// [`Hasher`] backed by [`keccak256`]
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn hash(&self, data: &[u8]) -> H256 {
        keccak256(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(keccak256(&[]), EMPTY_KECCAK);
        assert_eq!(
            keccak256(&[]).to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        assert_eq!(
            keccak256(b"hello").to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak256_four_ff_bytes() {
        // MSTORE 0xFFFFFFFF.. then KECCAK256(0, 4) hashes these bytes
        assert_eq!(
            keccak256(&[0xff, 0xff, 0xff, 0xff]).to_hex(),
            "0x29045a592007d0c246ef02c2223570da9522d0cf0f73282c79a1bc8f0bb2c238"
        );
    }

    #[test]
    fn test_hasher_matches_function() {
        let hasher = Keccak256Hasher;
        assert_eq!(hasher.hash(b"abc"), keccak256(b"abc"));
    }
}
