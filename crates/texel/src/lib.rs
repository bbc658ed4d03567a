//! Texel - DDS texture decoding library.
//!
//! This crate provides a unified interface to the Texel library ecosystem.
//!
//! # Crates
//!
//! - [`texel_common`] - Common utilities (binary reading, bit-field extraction)
//! - [`texel_dds`] - DDS header parsing, pixel format classification and decoding
//!
//! # Example
//!
//! ```no_run
//! use texel::prelude::*;
//!
//! let data = std::fs::read("texture.dds")?;
//!
//! let info = probe(&data[..])?;
//! println!("{}x{} {}", info.width, info.height, info.color_model.name());
//!
//! let image = decode(&data[..])?;
//! let (width, height) = image.dimensions();
//! println!("decoded {} pixels", width * height);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use texel_common as common;
pub use texel_dds as dds;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use texel_dds::{
        decode, decode_with, probe, ColorModel, DdsDecoder, DecodeOptions, DxtVariant, Header,
        ImageInfo, SurfaceKind,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
