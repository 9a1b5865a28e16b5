//! # ember-evm
//!
//! A stack-based EVM bytecode interpreter.
//!
//! - 256-bit word arithmetic with two's-complement signed operations
//! - Word-granular memory with zero-fill on growth
//! - Address-keyed storage shared by nested frames, rolled back on failure
//! - CALL, DELEGATECALL and STATICCALL on a heap stack of suspended frames
//!
//! Gas is not metered. Execution never returns an error: every frame ends in
//! an [`Outcome`] carrying the stack, logs, return data and a success flag.
//!
//! ```
//! use ember_evm::{Environment, Evm, InMemoryWorld, Word};
//!
//! let world = InMemoryWorld::new();
//! // PUSH1 1, PUSH1 2, ADD, STOP
//! let code = [0x60, 0x01, 0x60, 0x02, 0x01, 0x00];
//! let outcome = Evm::new(&world).execute_isolated(&code, &Environment::default());
//! assert!(outcome.success);
//! assert_eq!(outcome.stack, vec![Word::from(3u64)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod call;
mod config;
mod context;
mod error;
mod evm;
mod interpreter;
mod memory;
mod opcode;
mod outcome;
mod stack;
mod storage;
pub mod word;
mod world;

pub use call::CallKind;
pub use config::{EvmConfig, DEFAULT_MAX_CALL_DEPTH};
pub use context::{BlockContext, CallContext, Environment, TxContext};
pub use error::{EvmError, EvmResult};
pub use evm::Evm;
pub use interpreter::{Host, Interpreter};
pub use memory::{Memory, DEFAULT_MEMORY_LIMIT};
pub use opcode::{analyze_jump_dests, Opcode, OpcodeInfo};
pub use outcome::{Halt, Log, Outcome};
pub use stack::{Stack, MAX_STACK_SIZE};
pub use storage::{Checkpoint, Storage};
pub use world::{Account, InMemoryWorld, WorldState};

pub use ember_primitives::{Address, Word};
