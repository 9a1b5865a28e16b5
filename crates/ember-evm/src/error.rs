//! EVM error types

use ember_primitives::Word;
use thiserror::Error;

/// Conditions that end a frame early.
///
/// Every variant except [`EvmError::Revert`] is a fault: the frame halts
/// with success=false and an empty stack. `Revert` carries the payload of an
/// explicit REVERT and keeps the stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Invalid jump destination
    #[error("invalid jump destination: {0}")]
    InvalidJump(Word),

    /// Unassigned opcode byte, or the designated INVALID opcode
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// Opcode that needs world-state writes
    #[error("unsupported opcode: {0}")]
    Unsupported(&'static str),

    /// Memory offset or size does not fit the address space
    #[error("invalid memory access")]
    InvalidMemoryAccess,

    /// Memory growth beyond the configured limit
    #[error("memory limit exceeded: {requested} bytes requested, limit {limit}")]
    MemoryLimitExceeded {
        /// Bytes the access needed
        requested: usize,
        /// Configured limit
        limit: usize,
    },

    /// Write in static context
    #[error("state modification in static context")]
    StaticCallViolation,

    /// Return data out of bounds
    #[error("return data out of bounds")]
    ReturnDataOutOfBounds,

    /// Explicit REVERT with data
    #[error("execution reverted")]
    Revert(Vec<u8>),
}

/// Result type for EVM operations
pub type EvmResult<T> = Result<T, EvmError>;
