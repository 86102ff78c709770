//! In-memory grid store backed by a hash map.

use std::collections::HashMap;

use glam::IVec3;

use crate::block::BlockState;
use crate::core::{Error, Result};

use super::Sink;

/// Sparse in-memory sink. Unset cells read as air.
///
/// Reference implementation of the [`Sink`] contract; also the store used
/// by the engine's own tests and benchmarks.
#[derive(Default)]
pub struct MemorySink {
    cells: HashMap<IVec3, BlockState>,
    bounds: Option<(IVec3, IVec3)>,
}

impl MemorySink {
    /// Unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink restricted to the inclusive box `min..=max`; access outside it
    /// fails with [`Error::OutOfBounds`].
    pub fn bounded(min: IVec3, max: IVec3) -> Self {
        Self {
            cells: HashMap::new(),
            bounds: Some((min, max)),
        }
    }

    /// Number of non-air cells held.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn check(&self, pos: IVec3) -> Result<()> {
        if let Some((min, max)) = self.bounds {
            if pos.cmplt(min).any() || pos.cmpgt(max).any() {
                return Err(Error::OutOfBounds(pos));
            }
        }
        Ok(())
    }
}

impl Sink for MemorySink {
    fn read(&self, pos: IVec3) -> Result<BlockState> {
        self.check(pos)?;
        Ok(self.cells.get(&pos).cloned().unwrap_or_else(BlockState::air))
    }

    fn write(&mut self, pos: IVec3, state: BlockState) -> Result<bool> {
        self.check(pos)?;
        let changed = !self.read(pos)?.fuzzy_eq(&state);
        if state.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, state);
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn stone() -> BlockState {
        BlockState::new(BlockType::by_name("stone").unwrap())
    }

    #[test]
    fn test_unset_cells_read_as_air() {
        let sink = MemorySink::new();
        assert!(sink.read(IVec3::new(3, -7, 12)).unwrap().is_air());
    }

    #[test]
    fn test_write_reports_change() {
        let mut sink = MemorySink::new();
        let pos = IVec3::ZERO;

        assert!(sink.write(pos, stone()).unwrap());
        assert!(!sink.write(pos, stone()).unwrap());
        assert_eq!(sink.read(pos).unwrap(), stone());
    }

    #[test]
    fn test_air_write_clears_cell() {
        let mut sink = MemorySink::new();
        let pos = IVec3::new(1, 2, 3);

        sink.write(pos, stone()).unwrap();
        assert_eq!(sink.cell_count(), 1);

        assert!(sink.write(pos, BlockState::air()).unwrap());
        assert_eq!(sink.cell_count(), 0);
        assert!(!sink.write(pos, BlockState::air()).unwrap());
    }

    #[test]
    fn test_bounds_enforced() {
        let mut sink = MemorySink::bounded(IVec3::ZERO, IVec3::new(15, 15, 15));

        assert!(sink.write(IVec3::new(15, 0, 15), stone()).is_ok());
        assert!(matches!(
            sink.write(IVec3::new(16, 0, 0), stone()),
            Err(Error::OutOfBounds(_))
        ));
        assert!(sink.read(IVec3::new(0, -1, 0)).is_err());
    }
}
