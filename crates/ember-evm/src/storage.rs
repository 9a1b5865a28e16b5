//! Contract storage shared by every frame of one top-level invocation

use ember_primitives::{Address, Word};
use std::collections::HashMap;

type Slots = HashMap<Word, Word>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Table {
    Persistent,
    Transient,
}

/// Value a slot held before a write
#[derive(Clone, Debug)]
struct JournalEntry {
    table: Table,
    address: Address,
    key: Word,
    previous: Word,
}

/// Persistent and transient storage keyed by (contract address, key).
///
/// Unset keys read as zero and writing zero removes the slot. Every write
/// is journaled with the slot's previous value, so rolling back to a
/// [`Checkpoint`] costs the number of writes made since, not the size of
/// the tables.
#[derive(Clone, Debug, Default)]
pub struct Storage {
    persistent: HashMap<Address, Slots>,
    transient: HashMap<Address, Slots>,
    journal: Vec<JournalEntry>,
}

/// Journal position, restored when a frame fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint(usize);

fn read(table: &HashMap<Address, Slots>, address: &Address, key: &Word) -> Word {
    table
        .get(address)
        .and_then(|slots| slots.get(key))
        .copied()
        .unwrap_or_default()
}

fn write(table: &mut HashMap<Address, Slots>, address: Address, key: Word, value: Word) {
    if value.is_zero() {
        if let Some(slots) = table.get_mut(&address) {
            slots.remove(&key);
            if slots.is_empty() {
                table.remove(&address);
            }
        }
    } else {
        table.entry(address).or_default().insert(key, value);
    }
}

impl Storage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    fn table_mut(&mut self, table: Table) -> &mut HashMap<Address, Slots> {
        match table {
            Table::Persistent => &mut self.persistent,
            Table::Transient => &mut self.transient,
        }
    }

    fn set(&mut self, table: Table, address: Address, key: Word, value: Word) {
        let slots = self.table_mut(table);
        let previous = read(slots, &address, &key);
        if previous == value {
            return;
        }
        write(slots, address, key, value);
        self.journal.push(JournalEntry {
            table,
            address,
            key,
            previous,
        });
    }

    /// SLOAD
    pub fn load(&self, address: &Address, key: &Word) -> Word {
        read(&self.persistent, address, key)
    }

    /// SSTORE
    pub fn store(&mut self, address: Address, key: Word, value: Word) {
        self.set(Table::Persistent, address, key, value);
    }

    /// TLOAD
    pub fn tload(&self, address: &Address, key: &Word) -> Word {
        read(&self.transient, address, key)
    }

    /// TSTORE
    pub fn tstore(&mut self, address: Address, key: Word, value: Word) {
        self.set(Table::Transient, address, key, value);
    }

    /// Check if no persistent or transient slot is set
    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.transient.is_empty()
    }

    /// Mark the current journal position
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.journal.len())
    }

    /// Undo every write made since `checkpoint`, newest first
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            let table = self.table_mut(entry.table);
            write(table, entry.address, entry.key, entry.previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn test_unset_reads_zero() {
        let storage = Storage::new();
        assert_eq!(storage.load(&addr(1), &Word::one()), Word::zero());
        assert_eq!(storage.tload(&addr(1), &Word::one()), Word::zero());
    }

    #[test]
    fn test_keyed_by_address() {
        let mut storage = Storage::new();
        storage.store(addr(1), Word::one(), Word::from(10u64));
        storage.store(addr(2), Word::one(), Word::from(20u64));
        assert_eq!(storage.load(&addr(1), &Word::one()), Word::from(10u64));
        assert_eq!(storage.load(&addr(2), &Word::one()), Word::from(20u64));
    }

    #[test]
    fn test_zero_write_clears_slot() {
        let mut storage = Storage::new();
        storage.store(addr(1), Word::one(), Word::from(5u64));
        storage.store(addr(1), Word::one(), Word::zero());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_transient_is_separate() {
        let mut storage = Storage::new();
        storage.tstore(addr(1), Word::one(), Word::from(7u64));
        assert_eq!(storage.load(&addr(1), &Word::one()), Word::zero());
        assert_eq!(storage.tload(&addr(1), &Word::one()), Word::from(7u64));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut storage = Storage::new();
        storage.store(addr(1), Word::one(), Word::from(1u64));
        let checkpoint = storage.checkpoint();

        storage.store(addr(1), Word::one(), Word::from(2u64));
        storage.tstore(addr(3), Word::one(), Word::from(3u64));
        storage.restore(checkpoint);

        assert_eq!(storage.load(&addr(1), &Word::one()), Word::from(1u64));
        assert_eq!(storage.tload(&addr(3), &Word::one()), Word::zero());
    }

    #[test]
    fn test_nested_checkpoints_unwind_in_order() {
        let mut storage = Storage::new();
        let outer = storage.checkpoint();
        storage.store(addr(1), Word::one(), Word::from(1u64));

        let inner = storage.checkpoint();
        storage.store(addr(1), Word::one(), Word::from(2u64));
        storage.store(addr(1), Word::one(), Word::from(3u64));
        storage.restore(inner);
        assert_eq!(storage.load(&addr(1), &Word::one()), Word::from(1u64));

        storage.restore(outer);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_journal_tracks_writes_not_slots() {
        let mut storage = Storage::new();
        for i in 0..100u64 {
            storage.store(addr(1), Word::from(i), Word::from(i + 1));
        }
        let checkpoint = storage.checkpoint();
        assert_eq!(checkpoint, Checkpoint(100));

        // Unchanged writes are not journaled
        storage.store(addr(1), Word::zero(), Word::one());
        assert_eq!(storage.checkpoint(), checkpoint);

        storage.store(addr(2), Word::one(), Word::one());
        assert_eq!(storage.checkpoint(), Checkpoint(101));
        storage.restore(checkpoint);
        assert_eq!(storage.load(&addr(2), &Word::one()), Word::zero());
        assert_eq!(storage.load(&addr(1), &Word::from(99u64)), Word::from(100u64));
    }

    #[test]
    fn test_restore_of_later_checkpoint_is_noop() {
        let mut storage = Storage::new();
        storage.store(addr(1), Word::one(), Word::one());
        storage.restore(Checkpoint(10));
        assert_eq!(storage.load(&addr(1), &Word::one()), Word::one());
    }
}
