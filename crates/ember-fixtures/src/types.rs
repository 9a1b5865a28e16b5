//! Fixture JSON format
//!
//! ```json
//! {
//!   "name": "ADD",
//!   "code": { "asm": "PUSH1 1 PUSH1 2 ADD", "bin": "6001600201" },
//!   "tx": { "to": "0x...", "from": "0x...", "value": "0x0", "data": "" },
//!   "block": { "number": "0x1", "chainid": "0x1" },
//!   "state": { "0x...": { "balance": "0x10", "code": { "bin": "00" } } },
//!   "expect": { "stack": ["0x3"], "success": true }
//! }
//! ```

use crate::error::FixtureResult;
use ember_primitives::{word_from_be_slice, Address, Word};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Decode a hex byte string, with or without 0x prefix
pub fn decode_hex(s: &str) -> FixtureResult<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Hex-encoded bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        decode_hex(&s)
            .map(HexBytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Hex-encoded 256-bit word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexWord(pub Word);

impl<'de> Deserialize<'de> for HexWord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexWord(Word::zero()));
        }

        // Pad with leading zero if odd length
        let padded = if s.len() % 2 == 1 {
            format!("0{}", s)
        } else {
            s.to_string()
        };

        let bytes = hex::decode(&padded).map_err(serde::de::Error::custom)?;
        if bytes.len() > 32 {
            return Err(serde::de::Error::custom(format!(
                "word too long: {} bytes",
                bytes.len()
            )));
        }
        Ok(HexWord(word_from_be_slice(&bytes)))
    }
}

/// Hex-encoded address (short forms are left-padded)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexAddress(pub Address);

impl<'de> Deserialize<'de> for HexAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Address::from_hex(&s)
            .map(HexAddress)
            .map_err(serde::de::Error::custom)
    }
}

/// Bytecode with optional assembly listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Code {
    /// Human-readable listing, informational only
    #[serde(default)]
    pub asm: Option<String>,
    /// Bytecode
    #[serde(default)]
    pub bin: HexBytes,
}

/// Transaction record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxFixture {
    /// Recipient, the executing contract
    pub to: Option<HexAddress>,
    /// Sender
    pub from: Option<HexAddress>,
    /// Origin (defaults to `from`)
    pub origin: Option<HexAddress>,
    /// Value
    pub value: Option<HexWord>,
    /// Call data
    pub data: Option<HexBytes>,
    /// Gas price
    pub gasprice: Option<HexWord>,
}

/// Block record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockFixture {
    /// Coinbase
    pub coinbase: Option<HexAddress>,
    /// Timestamp
    pub timestamp: Option<HexWord>,
    /// Number
    pub number: Option<HexWord>,
    /// Difficulty / prevrandao
    pub difficulty: Option<HexWord>,
    /// Gas limit
    pub gaslimit: Option<HexWord>,
    /// Chain ID
    pub chainid: Option<HexWord>,
    /// Base fee
    pub basefee: Option<HexWord>,
}

/// World-state account record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFixture {
    /// Balance
    pub balance: Option<HexWord>,
    /// Nonce
    #[serde(default)]
    pub nonce: u64,
    /// Deployed code
    pub code: Option<Code>,
}

/// Expected log entry
#[derive(Debug, Clone, Deserialize)]
pub struct LogFixture {
    /// Emitting contract
    pub address: HexAddress,
    /// Payload
    #[serde(default)]
    pub data: HexBytes,
    /// Topics
    #[serde(default)]
    pub topics: Vec<HexWord>,
}

/// Fields checked against the outcome; absent fields are not checked
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Expectation {
    /// Final stack, top first
    pub stack: Option<Vec<HexWord>>,
    /// Logs in emission order
    pub logs: Option<Vec<LogFixture>>,
    /// RETURN or REVERT payload
    #[serde(rename = "return")]
    pub return_data: Option<HexBytes>,
    /// Success flag
    pub success: Option<bool>,
}

/// One fixture record
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Test name
    pub name: String,
    /// Free-form hint shown on failure
    #[serde(default)]
    pub hint: Option<String>,
    /// Code to execute
    pub code: Code,
    /// Transaction record
    #[serde(default)]
    pub tx: Option<TxFixture>,
    /// Block record
    #[serde(default)]
    pub block: Option<BlockFixture>,
    /// World state
    #[serde(default)]
    pub state: HashMap<HexAddress, AccountFixture>,
    /// Expected outcome
    #[serde(default)]
    pub expect: Expectation,
}

/// Parse a JSON array of fixtures
pub fn parse_fixtures(json: &str) -> FixtureResult<Vec<Fixture>> {
    Ok(serde_json::from_str(json)?)
}
