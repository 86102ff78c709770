//! Per-class stage buffers.

use std::collections::HashMap;

use glam::IVec3;

use crate::block::BlockState;

/// A buffered write awaiting commit.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingWrite {
    pub pos: IVec3,
    pub state: BlockState,
}

/// Insertion-ordered collection of pending writes, at most one per position.
///
/// Re-staging a position replaces the earlier record in place: last write
/// wins, at the original order index.
#[derive(Debug, Default)]
pub struct StageBuffer {
    entries: Vec<PendingWrite>,
    index: HashMap<IVec3, usize>,
}

impl StageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write, superseding any earlier write to the same position.
    pub fn put(&mut self, pos: IVec3, state: BlockState) {
        match self.index.get(&pos) {
            Some(&i) => self.entries[i].state = state,
            None => {
                self.index.insert(pos, self.entries.len());
                self.entries.push(PendingWrite { pos, state });
            }
        }
    }

    /// Staged state for a position, if any.
    pub fn get(&self, pos: IVec3) -> Option<&BlockState> {
        self.index.get(&pos).map(|&i| &self.entries[i].state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn state(name: &str) -> BlockState {
        BlockState::new(BlockType::by_name(name).unwrap())
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut buffer = StageBuffer::new();
        buffer.put(IVec3::new(2, 0, 0), state("stone"));
        buffer.put(IVec3::new(0, 0, 0), state("dirt"));
        buffer.put(IVec3::new(1, 0, 0), state("glass"));

        let order: Vec<i32> = buffer.iter().map(|w| w.pos.x).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_restage_supersedes_in_place() {
        let mut buffer = StageBuffer::new();
        let pos = IVec3::new(1, 1, 1);

        buffer.put(pos, state("stone"));
        buffer.put(IVec3::new(2, 2, 2), state("dirt"));
        buffer.put(pos, state("glass"));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get(pos), Some(&state("glass")));
        // Superseding keeps the original order index.
        assert_eq!(buffer.iter().next().unwrap().state, state("glass"));
    }

    #[test]
    fn test_clear_resets_for_reuse() {
        let mut buffer = StageBuffer::new();
        buffer.put(IVec3::ZERO, state("stone"));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.get(IVec3::ZERO), None);

        buffer.put(IVec3::ZERO, state("dirt"));
        assert_eq!(buffer.len(), 1);
    }
}
