//! DDS (DirectDraw Surface) texture decoding.
//!
//! Decodes the top surface of a DDS file into an [`image::RgbaImage`]
//! without GPU support:
//!
//! - Block-compressed surfaces: DXT1, DXT3 and DXT5 (DXT2/DXT4 decode as
//!   DXT3/DXT5 with alpha passed through unchanged)
//! - Uncompressed RGB surfaces with any byte-aligned pixel size up to 64 bits
//!   and arbitrary channel bit masks
//!
//! Mipmaps below the top level, cube map faces, volume textures and the DX10
//! extended header are not decoded.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let info = texel_dds::probe(BufReader::new(File::open("texture.dds")?))?;
//! println!("{}x{} {:?}", info.width, info.height, info.color_model);
//!
//! let image = texel_dds::decode(BufReader::new(File::open("texture.dds")?))?;
//! assert_eq!(image.dimensions(), (info.width, info.height));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decoder;
mod error;
mod format;
mod header;
mod unpack;

pub mod bc;

pub use bc::{BlockGrid, DxtVariant};
pub use decoder::{decode, decode_with, probe, DdsDecoder, DecodeOptions, SurfaceKind};
pub use error::{Error, Result};
pub use format::{ColorModel, ImageInfo};
pub use header::{DdsHeader, DdsPixelFormat, FourCC, Header, PixelFormat, PixelFormatFlags};
pub use unpack::{unpack_rgba, PackedLayout, UncompressedSurface};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
