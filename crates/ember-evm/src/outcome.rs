//! Frame results

use crate::error::EvmError;
use ember_primitives::{Address, Word};

/// Event emitted by LOG0..LOG4
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    /// Zero to four topics
    pub topics: Vec<Word>,
    /// Payload
    pub data: Vec<u8>,
}

/// Terminal state of a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Halt {
    /// STOP, or the end of the code
    Stop,
    /// RETURN
    Return,
    /// REVERT
    Revert,
    /// Any fatal condition
    Fault,
}

/// Result of one completed frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Final stack, top first (empty after a fault)
    pub stack: Vec<Word>,
    /// Logs emitted by this frame and its successful children
    pub logs: Vec<Log>,
    /// RETURN or REVERT payload
    pub return_data: Vec<u8>,
    /// False after REVERT or a fault
    pub success: bool,
    /// How the frame ended
    pub halt: Halt,
    /// The error behind a revert or fault
    pub error: Option<EvmError>,
}
