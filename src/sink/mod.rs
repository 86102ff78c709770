//! Grid store contract and implementations

pub mod memory;

pub use memory::MemorySink;

use glam::IVec3;

use crate::block::BlockState;
use crate::core::Result;

/// Downstream grid store targeted by the commit engine.
///
/// Implementations must tolerate single-cell reads and writes in any
/// order; the engine does not require any locking from the store.
pub trait Sink {
    /// Current state of the cell at `pos`.
    fn read(&self, pos: IVec3) -> Result<BlockState>;

    /// Store `state` at `pos`, returning whether the cell's effective
    /// state changed.
    fn write(&mut self, pos: IVec3, state: BlockState) -> Result<bool>;
}
