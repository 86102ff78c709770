//! Block identity, materials, and state

pub mod registry;
pub mod state;

pub use registry::{registry, BlockRegistry, BlockType, Category, Material};
pub use state::BlockState;
