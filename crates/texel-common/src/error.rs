//! Error types for texel-common.

use thiserror::Error;

/// Common error type for Texel operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A bit-field read would run past the end of the buffer.
    #[error("buffer too short: reading {needed} bytes at offset {offset}, but only {available} available")]
    BufferTooShort {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Bit widths must be in `1..=64`.
    #[error("invalid bit width {0}, expected 1..=64")]
    InvalidBitWidth(u32),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
