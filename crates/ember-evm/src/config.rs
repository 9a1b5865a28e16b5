//! Interpreter limits

use crate::memory::DEFAULT_MEMORY_LIMIT;
use serde::{Deserialize, Serialize};

/// Default maximum call depth
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Interpreter limits.
///
/// Gas is not metered, so these are the only bounds on a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmConfig {
    /// Deepest allowed nested frame; a CALL beyond it pushes 0
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Per-frame memory size in bytes; growth beyond it is a fault
    #[serde(default = "default_max_memory_bytes")]
    pub max_memory_bytes: usize,
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

fn default_max_memory_bytes() -> usize {
    DEFAULT_MEMORY_LIMIT
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: default_max_call_depth(),
            max_memory_bytes: default_max_memory_bytes(),
        }
    }
}
