//! Frame memory
//!
//! Byte-addressable and zero-initialised. The backing buffer grows in
//! 32-byte words to cover the highest byte touched and never shrinks.
//! Accesses of size zero never expand.

use crate::error::{EvmError, EvmResult};
use crate::word;
use ember_primitives::{word_from_be_slice, word_to_be_bytes, Word};

/// Default bound on memory growth (32 MiB)
pub const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// Word size in bytes
pub const WORD_SIZE: usize = 32;

/// Frame memory
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    limit: usize,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Create empty memory with the default growth limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MEMORY_LIMIT)
    }

    /// Create empty memory that faults beyond `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// Number of 32-byte words currently allocated
    pub fn words(&self) -> usize {
        self.data.len() / WORD_SIZE
    }

    /// Current size in bytes (what MSIZE reports)
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Grow to `words` words, zero-filling. No-op if already that large.
    pub fn expand(&mut self, words: usize) -> EvmResult<()> {
        if words <= self.words() {
            return Ok(());
        }
        let bytes = words
            .checked_mul(WORD_SIZE)
            .ok_or(EvmError::InvalidMemoryAccess)?;
        if bytes > self.limit {
            return Err(EvmError::MemoryLimitExceeded {
                requested: bytes,
                limit: self.limit,
            });
        }
        self.data.resize(bytes, 0);
        Ok(())
    }

    /// Make `offset..offset + size` addressable
    pub fn ensure(&mut self, offset: usize, size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }
        let end = offset
            .checked_add(size)
            .ok_or(EvmError::InvalidMemoryAccess)?;
        self.expand(end.div_ceil(WORD_SIZE))
    }

    /// Read `size` bytes at `offset`, expanding as needed
    pub fn read(&mut self, offset: usize, size: usize) -> EvmResult<Vec<u8>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        self.ensure(offset, size)?;
        Ok(self.data[offset..offset + size].to_vec())
    }

    /// Read the 32-byte word at `offset` (MLOAD)
    pub fn read_word(&mut self, offset: usize) -> EvmResult<Word> {
        self.ensure(offset, WORD_SIZE)?;
        Ok(word_from_be_slice(&self.data[offset..offset + WORD_SIZE]))
    }

    /// Write `value` big-endian as exactly `size` bytes at `offset`.
    ///
    /// Sizes under 32 keep the low-order bytes; larger sizes are left-padded
    /// with zeros.
    pub fn store(&mut self, offset: usize, value: &Word, size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }
        self.ensure(offset, size)?;
        let bytes = word_to_be_bytes(value);
        let region = &mut self.data[offset..offset + size];
        if size <= WORD_SIZE {
            region.copy_from_slice(&bytes[WORD_SIZE - size..]);
        } else {
            let pad = size - WORD_SIZE;
            region[..pad].fill(0);
            region[pad..].copy_from_slice(&bytes);
        }
        Ok(())
    }

    /// Write `bytes` at `offset`
    pub fn store_bytes(&mut self, offset: usize, bytes: &[u8]) -> EvmResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.ensure(offset, bytes.len())?;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Write exactly `size` bytes at `offset`: `source` truncated to fit and
    /// zero-padded on the right if shorter
    pub fn store_padded(&mut self, offset: usize, source: &[u8], size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }
        self.ensure(offset, size)?;
        let region = &mut self.data[offset..offset + size];
        let n = source.len().min(size);
        region[..n].copy_from_slice(&source[..n]);
        region[n..].fill(0);
        Ok(())
    }

    /// Overlap-safe copy within memory (MCOPY)
    pub fn copy_within(&mut self, dest: usize, src: usize, size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }
        self.ensure(src, size)?;
        self.ensure(dest, size)?;
        self.data.copy_within(src..src + size, dest);
        Ok(())
    }
}

/// Convert an `(offset, size)` operand pair into native indices.
///
/// A zero size never touches memory, so its offset is not validated.
pub fn resolve_range(offset: Word, size: Word) -> EvmResult<(usize, usize)> {
    if size.is_zero() {
        return Ok((0, 0));
    }
    let offset = word::to_usize(&offset).ok_or(EvmError::InvalidMemoryAccess)?;
    let size = word::to_usize(&size).ok_or(EvmError::InvalidMemoryAccess)?;
    Ok((offset, size))
}
