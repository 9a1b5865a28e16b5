//! Execution context: read-only call, block and transaction data

use ember_primitives::{Address, Word};

/// Call context information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Contract address being executed (whose storage is used)
    pub address: Address,
    /// Caller address
    pub caller: Address,
    /// Call value in wei
    pub value: Word,
    /// Call data
    pub data: Vec<u8>,
    /// Whether this is a static call (no state modifications)
    pub is_static: bool,
    /// Call depth (0 for the top-level frame)
    pub depth: usize,
}

impl CallContext {
    /// Create a new call context
    pub fn new(address: Address, caller: Address, value: Word, data: Vec<u8>) -> Self {
        Self {
            address,
            caller,
            value,
            data,
            is_static: false,
            depth: 0,
        }
    }
}

/// Block environment information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Block coinbase
    pub coinbase: Address,
    /// Block timestamp
    pub timestamp: Word,
    /// Block number
    pub number: Word,
    /// Difficulty / prevrandao
    pub prevrandao: Word,
    /// Block gas limit
    pub gas_limit: Word,
    /// Chain ID
    pub chain_id: Word,
    /// Base fee
    pub base_fee: Word,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            coinbase: Address::ZERO,
            timestamp: Word::zero(),
            number: Word::zero(),
            prevrandao: Word::zero(),
            gas_limit: Word::zero(),
            chain_id: Word::one(),
            base_fee: Word::zero(),
        }
    }
}

/// Transaction environment information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxContext {
    /// Transaction origin (original sender)
    pub origin: Address,
    /// Gas price
    pub gas_price: Word,
}

/// Complete execution environment for one frame
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// Call context
    pub call: CallContext,
    /// Block context
    pub block: BlockContext,
    /// Transaction context
    pub tx: TxContext,
}

impl Environment {
    /// Environment for a nested frame: same block and transaction, new call
    pub fn with_call(&self, call: CallContext) -> Self {
        Self {
            call,
            block: self.block.clone(),
            tx: self.tx.clone(),
        }
    }
}
