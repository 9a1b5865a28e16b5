//! Read-only world-state view

use ember_primitives::{Address, Word};
use std::collections::HashMap;

/// Account data visible to the interpreter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Account balance
    pub balance: Word,
    /// Account nonce
    pub nonce: u64,
    /// Deployed code
    pub code: Vec<u8>,
}

impl Account {
    /// Account holding only a balance
    pub fn with_balance(balance: Word) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Account holding only code
    pub fn with_code(code: Vec<u8>) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }
}

/// Per-address balance, nonce and code lookups.
///
/// Frames only read through this trait; value transfers and deployments
/// are left to the caller.
pub trait WorldState {
    /// Account record, if the address exists
    fn account(&self, address: &Address) -> Option<&Account>;

    /// Check if the address exists
    fn exists(&self, address: &Address) -> bool {
        self.account(address).is_some()
    }

    /// Balance (zero if absent)
    fn balance(&self, address: &Address) -> Word {
        self.account(address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    /// Code (empty if absent)
    fn code(&self, address: &Address) -> &[u8] {
        self.account(address).map(|a| a.code.as_slice()).unwrap_or(&[])
    }
}

/// World state held in a hash map
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorld {
    accounts: HashMap<Address, Account>,
}

impl InMemoryWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account
    pub fn insert(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Builder form of [`InMemoryWorld::insert`]
    pub fn with_account(mut self, address: Address, account: Account) -> Self {
        self.insert(address, account);
        self
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if no account exists
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl WorldState for InMemoryWorld {
    fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }
}
