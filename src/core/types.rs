//! Core type aliases and re-exports

pub use glam::IVec3;

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Offset of the cell directly above
pub const UP: IVec3 = IVec3::new(0, 1, 0);

/// Offset of the cell directly below
pub const DOWN: IVec3 = IVec3::new(0, -1, 0);
