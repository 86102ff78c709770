//! Error types for the blockstage engine

use glam::IVec3;
use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("position {0} is outside the sink bounds")]
    OutOfBounds(IVec3),

    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("sink error: {0}")]
    Sink(String),
}
