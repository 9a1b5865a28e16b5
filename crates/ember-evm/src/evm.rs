//! Top-level entry point

use crate::config::EvmConfig;
use crate::context::Environment;
use crate::interpreter::{Host, Interpreter};
use crate::outcome::Outcome;
use crate::storage::Storage;
use crate::world::WorldState;
use ember_crypto::{Hasher, Keccak256Hasher};

/// Executes contract code against a world-state view
pub struct Evm<'w> {
    world: &'w dyn WorldState,
    hasher: &'w dyn Hasher,
    config: EvmConfig,
}

impl<'w> Evm<'w> {
    /// Create an EVM with default limits and keccak-256
    pub fn new(world: &'w dyn WorldState) -> Self {
        Self {
            world,
            hasher: &Keccak256Hasher,
            config: EvmConfig::default(),
        }
    }

    /// Replace the limits
    pub fn with_config(mut self, config: EvmConfig) -> Self {
        self.config = config;
        self
    }

    /// Run `code` as the top-level frame, sharing `storage` with every nested
    /// call. If the frame reverts or faults, `storage` is left as it was.
    pub fn execute(&self, code: &[u8], env: &Environment, storage: &mut Storage) -> Outcome {
        let mut host = Host {
            world: self.world,
            storage,
            hasher: self.hasher,
            config: &self.config,
        };
        Interpreter::new(code, &self.config).run(env, &mut host)
    }

    /// Run `code` against fresh, empty storage
    pub fn execute_isolated(&self, code: &[u8], env: &Environment) -> Outcome {
        let mut storage = Storage::new();
        self.execute(code, env, &mut storage)
    }
}
