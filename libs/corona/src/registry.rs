//! Rings of several blocks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builder::Corona;

/// Identifies a ring in a [`BlockRegistry`].
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u64);

impl BlockId {
    fn alloc(&mut self) -> Self {
        *self = Self(self.0 + 1);
        *self
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block{}", self.0)
    }
}

/// Owns the rings of a design, keyed by block.
///
/// Rings are iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    block_id: BlockId,
    blocks: IndexMap<BlockId, Corona>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a ring and returns its identifier.
    pub fn insert(&mut self, ring: Corona) -> BlockId {
        let id = self.block_id.alloc();
        self.blocks.insert(id, ring);
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Corona> {
        self.blocks.get(&id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Corona> {
        self.blocks.get_mut(&id)
    }

    /// Removes a ring. Identifiers are never reused.
    pub fn remove(&mut self, id: BlockId) -> Option<Corona> {
        self.blocks.shift_remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Corona)> {
        self.blocks.iter().map(|(id, ring)| (*id, ring))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
