//! Error types for DDS decoding.

use thiserror::Error;

use crate::header::FourCC;

/// Errors that can occur when decoding DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] texel_common::Error),

    /// The header could not be read from the stream.
    #[error("failed to read DDS header: {0}")]
    HeaderRead(#[source] std::io::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// The pixel format flags match no known color model.
    #[error(
        "unrecognized image format: has_alpha: {has_alpha}, has_rgb: {has_rgb}, \
         has_yuv: {has_yuv}, has_luminance: {has_luminance}, flags: {flags:#x}"
    )]
    UnrecognizedFormat {
        has_alpha: bool,
        has_rgb: bool,
        has_yuv: bool,
        has_luminance: bool,
        flags: u32,
    },

    /// The FourCC tag names a compression scheme we cannot decode.
    #[error("unsupported FourCC {0}")]
    UnsupportedFourCC(FourCC),

    /// The packed pixel layout cannot be addressed per pixel.
    #[error("unsupported pixel format: flags {flags:#x}, {rgb_bit_count} bits per pixel")]
    UnsupportedPixelFormat { flags: u32, rgb_bit_count: u32 },

    /// The pixel payload ended before the expected number of bytes.
    #[error("reading image data: expected {expected} bytes, got {actual}")]
    DataRead { expected: usize, actual: usize },

    /// The header describes an image larger than the configured limit.
    #[error("image of {width}x{height} exceeds the limit of {max_pixels} pixels")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    /// A pixel outside the image bounds was requested.
    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
