//! Bytecode interpreter
//!
//! One [`Interpreter`] holds one frame's stack, memory, log accumulator and
//! return buffers; storage and the world-state view are reached through the
//! [`Host`] shared with nested frames. Nested calls are run from a frame
//! stack on the heap, so call depth does not consume native stack.

use crate::call::{self, CallKind, CallRequest};
use crate::config::EvmConfig;
use crate::context::Environment;
use crate::error::{EvmError, EvmResult};
use crate::memory::{resolve_range, Memory};
use crate::opcode::{analyze_jump_dests, Opcode};
use crate::outcome::{Halt, Log, Outcome};
use crate::stack::{Stack, MAX_STACK_SIZE};
use crate::storage::{Checkpoint, Storage};
use crate::word::{self, from_bool};
use crate::world::WorldState;
use ember_crypto::Hasher;
use ember_primitives::{word_from_be_slice, Address, Word};
use tracing::{debug, trace, warn};

/// Resources shared by every frame of one top-level invocation
pub struct Host<'a> {
    /// Balances and code
    pub world: &'a dyn WorldState,
    /// Persistent and transient storage
    pub storage: &'a mut Storage,
    /// KECCAK256 and EXTCODEHASH
    pub hasher: &'a dyn Hasher,
    /// Limits
    pub config: &'a EvmConfig,
}

/// What the loop does after a handler returns
enum Control {
    /// Advance past the opcode and its immediate bytes
    Continue,
    /// Set pc to a validated JUMPDEST
    Jump(usize),
    /// Stop the frame
    Halt(Halt),
    /// Suspend the frame until a nested call finishes
    Call(CallRequest),
}

/// Why the frame loop returned
enum Exit {
    Halt(Halt),
    Call(CallRequest),
}

/// Interpreter state for one frame
#[derive(Debug)]
pub struct Interpreter<'a> {
    code: &'a [u8],
    pc: usize,
    pub(crate) stack: Stack,
    pub(crate) memory: Memory,
    /// Return data of the last nested call
    pub(crate) return_data: Vec<u8>,
    /// RETURN payload of this frame
    output: Vec<u8>,
    pub(crate) logs: Vec<Log>,
    jump_dests: Vec<bool>,
}

/// A frame on the call stack with its environment and storage checkpoint
struct Frame<'a> {
    interpreter: Interpreter<'a>,
    env: Environment,
    checkpoint: Checkpoint,
    /// Return range of the nested call this frame is suspended on
    output: (usize, usize),
}

impl<'a> Frame<'a> {
    fn enter(interpreter: Interpreter<'a>, env: Environment, host: &mut Host<'_>) -> Self {
        debug!(
            "Frame enter address={} depth={} code_len={}",
            env.call.address,
            env.call.depth,
            interpreter.code.len()
        );
        Self {
            checkpoint: host.storage.checkpoint(),
            interpreter,
            env,
            output: (0, 0),
        }
    }

    /// Resume after a nested call returned `child`
    fn resume(&mut self, child: Outcome, host: &mut Host<'_>) -> EvmResult<Exit> {
        call::complete(&mut self.interpreter, self.output, child)?;
        self.interpreter.execute_loop(&self.env, host)
    }

    /// Fold the loop result into an [`Outcome`], rolling storage back on failure
    fn finish(self, result: EvmResult<Halt>, host: &mut Host<'_>) -> Outcome {
        let Frame {
            mut interpreter,
            env,
            checkpoint,
            ..
        } = self;

        let outcome = match result {
            Ok(halt) => Outcome {
                stack: interpreter.stack.to_vec_top_first(),
                logs: std::mem::take(&mut interpreter.logs),
                return_data: std::mem::take(&mut interpreter.output),
                success: true,
                halt,
                error: None,
            },
            Err(EvmError::Revert(data)) => {
                host.storage.restore(checkpoint);
                Outcome {
                    stack: interpreter.stack.to_vec_top_first(),
                    logs: Vec::new(),
                    return_data: data.clone(),
                    success: false,
                    halt: Halt::Revert,
                    error: Some(EvmError::Revert(data)),
                }
            }
            Err(err) => {
                host.storage.restore(checkpoint);
                warn!(
                    "Frame fault at pc={} depth={}: {}",
                    interpreter.pc, env.call.depth, err
                );
                interpreter.stack.clear();
                Outcome {
                    stack: Vec::new(),
                    logs: Vec::new(),
                    return_data: Vec::new(),
                    success: false,
                    halt: Halt::Fault,
                    error: Some(err),
                }
            }
        };

        debug!(
            "Frame exit address={} depth={} halt={:?}",
            env.call.address, env.call.depth, outcome.halt
        );
        outcome
    }
}

/// Copy `size` bytes of `source` starting at `offset`, zero past the end
fn padded_slice(source: &[u8], offset: Word, size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    if let Some(start) = word::to_usize(&offset) {
        if start < source.len() {
            let n = (source.len() - start).min(size);
            out[..n].copy_from_slice(&source[start..start + n]);
        }
    }
    out
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over `code`
    pub fn new(code: &'a [u8], config: &EvmConfig) -> Self {
        Self {
            code,
            pc: 0,
            stack: Stack::new(),
            memory: Memory::with_limit(config.max_memory_bytes),
            return_data: Vec::new(),
            output: Vec::new(),
            logs: Vec::new(),
            jump_dests: analyze_jump_dests(code),
        }
    }

    /// Run the frame, and every frame it calls, to completion.
    ///
    /// Each frame checkpoints storage on entry and rolls back if it reverts
    /// or faults. Errors never escape: they are folded into the [`Outcome`].
    pub fn run<'h>(self, env: &Environment, host: &mut Host<'h>) -> Outcome
    where
        'h: 'a,
    {
        let mut current = Frame::enter(self, env.clone(), host);
        let mut suspended: Vec<Frame<'a>> = Vec::new();
        let mut returned: Option<Outcome> = None;

        loop {
            let result = match returned.take() {
                Some(child) => current.resume(child, host),
                None => current.interpreter.execute_loop(&current.env, host),
            };

            let halted = match result {
                Ok(Exit::Call(request)) => {
                    let world = host.world;
                    let code: &'a [u8] = world.code(&request.target);
                    let interpreter = Interpreter::new(code, host.config);
                    let child = Frame::enter(interpreter, request.env, host);
                    current.output = request.output;
                    suspended.push(std::mem::replace(&mut current, child));
                    continue;
                }
                Ok(Exit::Halt(halt)) => Ok(halt),
                Err(err) => Err(err),
            };

            let outcome = current.finish(halted, host);
            match suspended.pop() {
                Some(parent) => {
                    current = parent;
                    returned = Some(outcome);
                }
                None => return outcome,
            }
        }
    }

    fn execute_loop(&mut self, env: &Environment, host: &mut Host<'_>) -> EvmResult<Exit> {
        while self.pc < self.code.len() {
            if let Some(exit) = self.step(env, host)? {
                return Ok(exit);
            }
        }
        // Running off the end of the code is an implicit STOP
        Ok(Exit::Halt(Halt::Stop))
    }

    /// Execute a single instruction
    fn step(&mut self, env: &Environment, host: &mut Host<'_>) -> EvmResult<Option<Exit>> {
        let byte = self.code[self.pc];
        let opcode = Opcode::from_byte(byte).ok_or(EvmError::InvalidOpcode(byte))?;
        let info = opcode.info();
        trace!("pc={} op={} stack={}", self.pc, info.name, self.stack.len());

        self.stack.require(info.inputs)?;
        if self.stack.len() - info.inputs + info.outputs > MAX_STACK_SIZE {
            return Err(EvmError::StackOverflow);
        }

        match self.execute(opcode, env, host)? {
            Control::Continue => {
                self.pc += 1 + info.immediate;
                Ok(None)
            }
            Control::Jump(dest) => {
                self.pc = dest;
                Ok(None)
            }
            Control::Halt(halt) => Ok(Some(Exit::Halt(halt))),
            Control::Call(request) => {
                self.pc += 1;
                Ok(Some(Exit::Call(request)))
            }
        }
    }

    fn unary(&mut self, f: impl FnOnce(Word) -> Word) -> EvmResult<Control> {
        let a = self.stack.pop()?;
        self.stack.push(f(a))?;
        Ok(Control::Continue)
    }

    fn binary(&mut self, f: impl FnOnce(Word, Word) -> Word) -> EvmResult<Control> {
        let a = self.stack.pop()?;
        let b = self.stack.pop()?;
        self.stack.push(f(a, b))?;
        Ok(Control::Continue)
    }

    fn ternary(&mut self, f: impl FnOnce(Word, Word, Word) -> Word) -> EvmResult<Control> {
        let a = self.stack.pop()?;
        let b = self.stack.pop()?;
        let c = self.stack.pop()?;
        self.stack.push(f(a, b, c))?;
        Ok(Control::Continue)
    }

    fn push(&mut self, value: Word) -> EvmResult<Control> {
        self.stack.push(value)?;
        Ok(Control::Continue)
    }

    fn push_usize(&mut self, value: usize) -> EvmResult<Control> {
        self.push(Word::from(value))
    }

    fn pop_address(&mut self) -> EvmResult<Address> {
        Ok(Address::from_word(&self.stack.pop()?))
    }

    /// Pop an `(offset, size)` pair
    pub(crate) fn pop_range(&mut self) -> EvmResult<(usize, usize)> {
        let offset = self.stack.pop()?;
        let size = self.stack.pop()?;
        resolve_range(offset, size)
    }

    fn pop_offset(&mut self) -> EvmResult<usize> {
        word::to_usize(&self.stack.pop()?).ok_or(EvmError::InvalidMemoryAccess)
    }

    /// Pop `dest offset size` and copy from `source` into memory
    fn copy_to_memory(&mut self, source: &[u8]) -> EvmResult<Control> {
        let dest = self.stack.pop()?;
        let offset = self.stack.pop()?;
        let size = self.stack.pop()?;
        let (dest, size) = resolve_range(dest, size)?;
        if size > 0 {
            self.memory.ensure(dest, size)?;
            self.memory.store_bytes(dest, &padded_slice(source, offset, size))?;
        }
        Ok(Control::Continue)
    }

    fn jump_target(&self, dest: Word) -> EvmResult<usize> {
        word::to_usize(&dest)
            .filter(|d| self.jump_dests.get(*d).copied().unwrap_or(false))
            .ok_or(EvmError::InvalidJump(dest))
    }

    fn require_non_static(env: &Environment) -> EvmResult<()> {
        if env.call.is_static {
            Err(EvmError::StaticCallViolation)
        } else {
            Ok(())
        }
    }

    /// Execute an opcode
    fn execute(
        &mut self,
        opcode: Opcode,
        env: &Environment,
        host: &mut Host<'_>,
    ) -> EvmResult<Control> {
        match opcode {
            Opcode::STOP => Ok(Control::Halt(Halt::Stop)),

            // Arithmetic
            Opcode::ADD => self.binary(word::add),
            Opcode::MUL => self.binary(word::mul),
            Opcode::SUB => self.binary(word::sub),
            Opcode::DIV => self.binary(word::div),
            Opcode::SDIV => self.binary(word::sdiv),
            Opcode::MOD => self.binary(word::rem),
            Opcode::SMOD => self.binary(word::smod),
            Opcode::ADDMOD => self.ternary(word::addmod),
            Opcode::MULMOD => self.ternary(word::mulmod),
            Opcode::EXP => self.binary(word::exp),
            Opcode::SIGNEXTEND => self.binary(word::signextend),

            // Comparison & bitwise
            Opcode::LT => self.binary(|a, b| from_bool(a < b)),
            Opcode::GT => self.binary(|a, b| from_bool(a > b)),
            Opcode::SLT => self.binary(|a, b| from_bool(word::slt(&a, &b))),
            Opcode::SGT => self.binary(|a, b| from_bool(word::sgt(&a, &b))),
            Opcode::EQ => self.binary(|a, b| from_bool(a == b)),
            Opcode::ISZERO => self.unary(|a| from_bool(a.is_zero())),
            Opcode::AND => self.binary(|a, b| a & b),
            Opcode::OR => self.binary(|a, b| a | b),
            Opcode::XOR => self.binary(|a, b| a ^ b),
            Opcode::NOT => self.unary(|a| !a),
            Opcode::BYTE => self.binary(word::byte),
            Opcode::SHL => self.binary(word::shl),
            Opcode::SHR => self.binary(word::shr),
            Opcode::SAR => self.binary(word::sar),

            Opcode::KECCAK256 => {
                let (offset, size) = self.pop_range()?;
                let data = self.memory.read(offset, size)?;
                self.push(host.hasher.hash(&data).to_word())
            }

            // Environment
            Opcode::ADDRESS => self.push(env.call.address.to_word()),
            Opcode::BALANCE => {
                let address = self.pop_address()?;
                self.push(host.world.balance(&address))
            }
            Opcode::ORIGIN => self.push(env.tx.origin.to_word()),
            Opcode::CALLER => self.push(env.call.caller.to_word()),
            Opcode::CALLVALUE => self.push(env.call.value),
            Opcode::CALLDATALOAD => {
                let offset = self.stack.pop()?;
                self.push(word_from_be_slice(&padded_slice(&env.call.data, offset, 32)))
            }
            Opcode::CALLDATASIZE => self.push_usize(env.call.data.len()),
            Opcode::CALLDATACOPY => self.copy_to_memory(&env.call.data),
            Opcode::CODESIZE => self.push_usize(self.code.len()),
            Opcode::CODECOPY => {
                let code = self.code;
                self.copy_to_memory(code)
            }
            Opcode::GASPRICE => self.push(env.tx.gas_price),
            Opcode::EXTCODESIZE => {
                let address = self.pop_address()?;
                self.push_usize(host.world.code(&address).len())
            }
            Opcode::EXTCODECOPY => {
                let address = self.pop_address()?;
                let world = host.world;
                self.copy_to_memory(world.code(&address))
            }
            Opcode::RETURNDATASIZE => self.push_usize(self.return_data.len()),
            Opcode::RETURNDATACOPY => {
                let dest = self.stack.pop()?;
                let offset = self.stack.pop()?;
                let size = self.stack.pop()?;
                let end = word::to_usize(&offset)
                    .zip(word::to_usize(&size))
                    .and_then(|(o, s)| o.checked_add(s))
                    .filter(|end| *end <= self.return_data.len())
                    .ok_or(EvmError::ReturnDataOutOfBounds)?;
                let (dest, size) = resolve_range(dest, size)?;
                let data = self.return_data[end - size..end].to_vec();
                self.memory.store_bytes(dest, &data)?;
                Ok(Control::Continue)
            }
            Opcode::EXTCODEHASH => {
                let address = self.pop_address()?;
                let hash = if host.world.exists(&address) {
                    host.hasher.hash(host.world.code(&address)).to_word()
                } else {
                    Word::zero()
                };
                self.push(hash)
            }

            // Block
            Opcode::BLOCKHASH => {
                self.stack.pop()?;
                self.push(Word::zero())
            }
            Opcode::COINBASE => self.push(env.block.coinbase.to_word()),
            Opcode::TIMESTAMP => self.push(env.block.timestamp),
            Opcode::NUMBER => self.push(env.block.number),
            Opcode::PREVRANDAO => self.push(env.block.prevrandao),
            Opcode::GASLIMIT => self.push(env.block.gas_limit),
            Opcode::CHAINID => self.push(env.block.chain_id),
            Opcode::SELFBALANCE => self.push(host.world.balance(&env.call.address)),
            Opcode::BASEFEE => self.push(env.block.base_fee),

            // Stack, memory, storage
            Opcode::POP => {
                self.stack.pop()?;
                Ok(Control::Continue)
            }
            Opcode::MLOAD => {
                let offset = self.pop_offset()?;
                let value = self.memory.read_word(offset)?;
                self.push(value)
            }
            Opcode::MSTORE => {
                let offset = self.pop_offset()?;
                let value = self.stack.pop()?;
                self.memory.store(offset, &value, 32)?;
                Ok(Control::Continue)
            }
            Opcode::MSTORE8 => {
                let offset = self.pop_offset()?;
                let value = self.stack.pop()?;
                self.memory.store(offset, &value, 1)?;
                Ok(Control::Continue)
            }
            Opcode::SLOAD => {
                let key = self.stack.pop()?;
                self.push(host.storage.load(&env.call.address, &key))
            }
            Opcode::SSTORE => {
                Self::require_non_static(env)?;
                let key = self.stack.pop()?;
                let value = self.stack.pop()?;
                host.storage.store(env.call.address, key, value);
                Ok(Control::Continue)
            }
            Opcode::TLOAD => {
                let key = self.stack.pop()?;
                self.push(host.storage.tload(&env.call.address, &key))
            }
            Opcode::TSTORE => {
                Self::require_non_static(env)?;
                let key = self.stack.pop()?;
                let value = self.stack.pop()?;
                host.storage.tstore(env.call.address, key, value);
                Ok(Control::Continue)
            }
            Opcode::MCOPY => {
                let dest = self.stack.pop()?;
                let src = self.stack.pop()?;
                let size = self.stack.pop()?;
                let (dest, size) = resolve_range(dest, size)?;
                if size > 0 {
                    let src = word::to_usize(&src).ok_or(EvmError::InvalidMemoryAccess)?;
                    self.memory.copy_within(dest, src, size)?;
                }
                Ok(Control::Continue)
            }

            // Flow
            Opcode::JUMP => {
                let dest = self.stack.pop()?;
                Ok(Control::Jump(self.jump_target(dest)?))
            }
            Opcode::JUMPI => {
                let dest = self.stack.pop()?;
                let condition = self.stack.pop()?;
                if condition.is_zero() {
                    Ok(Control::Continue)
                } else {
                    Ok(Control::Jump(self.jump_target(dest)?))
                }
            }
            Opcode::PC => self.push_usize(self.pc),
            Opcode::MSIZE => self.push_usize(self.memory.size()),
            // Gas is not metered
            Opcode::GAS => self.push(Word::MAX),
            Opcode::JUMPDEST => Ok(Control::Continue),

            Opcode::PUSH(n) => {
                let start = self.pc + 1;
                let bytes = padded_slice(self.code, Word::from(start), n as usize);
                self.push(word_from_be_slice(&bytes))
            }
            Opcode::DUP(n) => {
                self.stack.dup(n as usize)?;
                Ok(Control::Continue)
            }
            Opcode::SWAP(n) => {
                self.stack.swap(n as usize)?;
                Ok(Control::Continue)
            }

            Opcode::LOG(n) => {
                Self::require_non_static(env)?;
                let (offset, size) = self.pop_range()?;
                let mut topics = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    topics.push(self.stack.pop()?);
                }
                let data = self.memory.read(offset, size)?;
                self.logs.push(Log {
                    address: env.call.address,
                    topics,
                    data,
                });
                Ok(Control::Continue)
            }

            // System
            Opcode::CALL => self.call(CallKind::Call, env, host),
            Opcode::DELEGATECALL => self.call(CallKind::DelegateCall, env, host),
            Opcode::STATICCALL => self.call(CallKind::StaticCall, env, host),
            Opcode::RETURN => {
                let (offset, size) = self.pop_range()?;
                self.output = self.memory.read(offset, size)?;
                Ok(Control::Halt(Halt::Return))
            }
            Opcode::REVERT => {
                let (offset, size) = self.pop_range()?;
                let data = self.memory.read(offset, size)?;
                Err(EvmError::Revert(data))
            }
            Opcode::INVALID => Err(EvmError::InvalidOpcode(opcode.byte())),
            Opcode::CREATE | Opcode::CREATE2 | Opcode::CALLCODE | Opcode::SELFDESTRUCT => {
                Err(EvmError::Unsupported(opcode.name()))
            }
        }
    }

    /// Suspend on a CALL-family opcode, or push 0 at the depth limit
    fn call(&mut self, kind: CallKind, env: &Environment, host: &Host<'_>) -> EvmResult<Control> {
        match call::prepare(self, kind, env, host)? {
            Some(request) => Ok(Control::Call(request)),
            None => self.push(Word::zero()),
        }
    }
}
