//! Blockstage - a staged block-commit engine for voxel worlds
//!
//! Bulk edits applied in arbitrary order corrupt order-sensitive blocks:
//! a door's upper half written before its lower half gets simplified away
//! by the store, a rail written before the block beneath it pops off.
//! This crate intercepts single-cell writes, buffers them into
//! placement-priority stages, and flushes the stages to the sink in an
//! order that keeps such blocks intact.

pub mod core;
pub mod block;
pub mod sink;
pub mod stage;
