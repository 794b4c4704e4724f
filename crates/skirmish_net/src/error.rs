//! Networking error types.

use thiserror::Error;

/// Errors from the snapshot wire layer.
#[derive(Debug, Error)]
pub enum NetError {
    /// Socket read/write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame payload failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Incoming frame length exceeds the protocol limit.
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge {
        /// Declared payload length.
        len: usize,
        /// Maximum allowed payload length.
        max: usize,
    },

    /// The peer closed the connection.
    #[error("connection closed")]
    Closed,
}
