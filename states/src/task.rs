//! Identifiers for spawned command tasks.

use std::any::TypeId;

/// Unique identifier for a spawned command task.
///
/// Combines the command's `TypeId` with a generation counter that grows with
/// every spawn, so two runs of the same command can be told apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher values were spawned later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
