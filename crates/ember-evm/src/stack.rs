//! Operand stack

use crate::error::{EvmError, EvmResult};
use ember_primitives::Word;

/// Maximum number of items on the stack
pub const MAX_STACK_SIZE: usize = 1024;

/// Operand stack (max 1024 words, top at the end of the vector)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack {
    data: Vec<Word>,
}

impl Stack {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Word) -> EvmResult<()> {
        if self.data.len() >= MAX_STACK_SIZE {
            return Err(EvmError::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> EvmResult<Word> {
        self.data.pop().ok_or(EvmError::StackUnderflow)
    }

    /// Fail unless at least `n` items are present
    pub fn require(&self, n: usize) -> EvmResult<()> {
        if self.data.len() < n {
            Err(EvmError::StackUnderflow)
        } else {
            Ok(())
        }
    }

    /// Duplicate the item at position `n` (1 = top) onto the top
    pub fn dup(&mut self, n: usize) -> EvmResult<()> {
        if n == 0 || n > self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        let value = self.data[self.data.len() - n];
        self.push(value)
    }

    /// Swap the top with the item `n` below it (1 = second item)
    pub fn swap(&mut self, n: usize) -> EvmResult<()> {
        let len = self.data.len();
        if n == 0 || n >= len {
            return Err(EvmError::StackUnderflow);
        }
        self.data.swap(len - 1, len - 1 - n);
        Ok(())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Snapshot of the stack, top item first
    pub fn to_vec_top_first(&self) -> Vec<Word> {
        self.data.iter().rev().copied().collect()
    }
}
