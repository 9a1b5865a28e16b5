//! CALL-family dispatch
//!
//! A CALL suspends the caller frame and hands the interpreter a
//! [`CallRequest`]; the child runs on the interpreter's frame stack, not
//! the native one. A failed child never propagates as a fault: the caller
//! sees a 0 on its stack.

use crate::context::{CallContext, Environment};
use crate::error::{EvmError, EvmResult};
use crate::interpreter::{Host, Interpreter};
use crate::outcome::Outcome;
use crate::word::from_bool;
use ember_primitives::{Address, Word};
use tracing::debug;

/// Which CALL-family opcode is being dispatched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// CALL: run the target's code as the target
    Call,
    /// DELEGATECALL: run the target's code as the caller
    DelegateCall,
    /// STATICCALL: run the target's code with writes forbidden
    StaticCall,
}

/// Operands popped by a CALL-family opcode
struct CallArgs {
    target: Address,
    value: Word,
    input: (usize, usize),
    output: (usize, usize),
}

/// A nested frame waiting to run
#[derive(Debug)]
pub(crate) struct CallRequest {
    /// Account whose code runs
    pub(crate) target: Address,
    /// Environment of the child frame
    pub(crate) env: Environment,
    /// Caller memory range receiving the child's return data
    pub(crate) output: (usize, usize),
}

fn pop_args(frame: &mut Interpreter<'_>, kind: CallKind) -> EvmResult<CallArgs> {
    // Gas is not metered
    frame.stack.pop()?;
    let target = Address::from_word(&frame.stack.pop()?);
    let value = match kind {
        CallKind::Call => frame.stack.pop()?,
        CallKind::DelegateCall | CallKind::StaticCall => Word::zero(),
    };
    let input = frame.pop_range()?;
    let output = frame.pop_range()?;
    Ok(CallArgs {
        target,
        value,
        input,
        output,
    })
}

fn child_context(kind: CallKind, args: &CallArgs, env: &Environment, data: Vec<u8>) -> CallContext {
    let depth = env.call.depth + 1;
    match kind {
        CallKind::Call => CallContext {
            address: args.target,
            caller: env.call.address,
            value: args.value,
            data,
            is_static: env.call.is_static,
            depth,
        },
        CallKind::DelegateCall => CallContext {
            address: env.call.address,
            caller: env.call.caller,
            value: env.call.value,
            data,
            is_static: env.call.is_static,
            depth,
        },
        CallKind::StaticCall => CallContext {
            address: args.target,
            caller: env.call.address,
            value: Word::zero(),
            data,
            is_static: true,
            depth,
        },
    }
}

/// Pop the operands of `kind` and build the child frame's request.
///
/// Returns `None` when the call depth limit is reached; the caller then
/// pushes 0 without running anything.
pub(crate) fn prepare(
    frame: &mut Interpreter<'_>,
    kind: CallKind,
    env: &Environment,
    host: &Host<'_>,
) -> EvmResult<Option<CallRequest>> {
    let args = pop_args(frame, kind)?;
    if env.call.is_static && !args.value.is_zero() {
        return Err(EvmError::StaticCallViolation);
    }

    let (input_offset, input_size) = args.input;
    let (output_offset, output_size) = args.output;
    let input = frame.memory.read(input_offset, input_size)?;
    frame.memory.ensure(output_offset, output_size)?;

    if env.call.depth >= host.config.max_call_depth {
        debug!("Call depth limit {} reached", host.config.max_call_depth);
        frame.return_data.clear();
        return Ok(None);
    }

    let child_env = env.with_call(child_context(kind, &args, env, input));
    debug!(
        "Dispatch {:?} to {} depth={}",
        kind, args.target, child_env.call.depth
    );
    Ok(Some(CallRequest {
        target: args.target,
        env: child_env,
        output: args.output,
    }))
}

/// Deliver a finished child's outcome to its suspended caller.
///
/// The return data is copied into the caller's return range (truncated or
/// zero-padded to its size) and kept for RETURNDATASIZE and RETURNDATACOPY.
/// A successful child's logs are appended to the caller's. The success flag
/// is pushed last.
pub(crate) fn complete(
    frame: &mut Interpreter<'_>,
    output: (usize, usize),
    outcome: Outcome,
) -> EvmResult<()> {
    let (offset, size) = output;
    frame
        .memory
        .store_padded(offset, &outcome.return_data, size)?;
    if outcome.success {
        frame.logs.extend(outcome.logs);
    }
    frame.return_data = outcome.return_data;
    frame.stack.push(from_bool(outcome.success))
}
