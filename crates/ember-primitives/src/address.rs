//! 20-byte account address

use crate::Word;
use std::fmt;
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected at most 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from a big-endian slice of up to 20 bytes.
    ///
    /// Shorter slices are left-padded with zeros, so `0x01` names the same
    /// account as `0x0000...0001`.
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() > Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 20];
        bytes[Self::LEN - slice.len()..].copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix, odd length allowed)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let padded = if s.len() % 2 == 1 {
            format!("0{}", s)
        } else {
            s.to_string()
        };
        let bytes = hex::decode(padded).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Take the low 160 bits of a word
    pub fn from_word(word: &Word) -> Self {
        let mut buf = [0u8; 32];
        word.to_big_endian(&mut buf);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&buf[12..]);
        Address(bytes)
    }

    /// Zero-extend to a word
    pub fn to_word(&self) -> Word {
        Word::from_big_endian(&self.0)
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex("0x1000000000000000000000000000000000000aaa").unwrap();
        assert_eq!(addr.as_bytes()[0], 0x10);
        assert_eq!(addr.as_bytes()[18], 0x0a);
        assert_eq!(addr.as_bytes()[19], 0xaa);

        let no_prefix = Address::from_hex("1000000000000000000000000000000000000aaa").unwrap();
        assert_eq!(addr, no_prefix);
    }

    #[test]
    fn test_address_from_short_hex() {
        let addr = Address::from_hex("0x1").unwrap();
        let mut expected = [0u8; 20];
        expected[19] = 1;
        assert_eq!(addr, Address::from_bytes(expected));
    }

    #[test]
    fn test_address_too_long() {
        let err = Address::from_hex(&format!("0x{}", "11".repeat(21))).unwrap_err();
        assert_eq!(err, AddressError::InvalidLength(21));
    }

    #[test]
    fn test_address_invalid_hex() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::ZERO.to_hex(), "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_word_conversion_truncates_high_bits() {
        let word = Word::MAX;
        let addr = Address::from_word(&word);
        assert_eq!(addr, Address::from_bytes([0xFF; 20]));
        assert_eq!(addr.to_word(), (Word::one() << 160) - 1);
    }

    #[test]
    fn test_word_roundtrip() {
        let addr = Address::from_bytes([0x42; 20]);
        assert_eq!(Address::from_word(&addr.to_word()), addr);
    }

    #[test]
    fn test_display_and_debug() {
        let addr = Address::from_bytes([0xAB; 20]);
        assert_eq!(format!("{}", addr), format!("0x{}", "ab".repeat(20)));
        assert!(format!("{:?}", addr).starts_with("Address(0x"));
    }
}
