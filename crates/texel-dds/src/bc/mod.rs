//! S3TC block decompression (DXT1, DXT3, DXT5).
//!
//! All three formats split the image into 4x4 texel blocks stored row by row.
//! Decoding runs in two phases: [`BlockGrid`] fixes the block geometry up
//! front, then each block is read from the buffer, decoded into 16 texels and
//! written into a pre-allocated raster. Texels that fall outside the image
//! (right or bottom edge of a partial block) are dropped.
//!
//! A buffer that ends early is not an error: decoding stops at the first
//! block that is not fully present and the remaining pixels stay zero.

pub mod color;
pub mod dxt1;
pub mod dxt3;
pub mod dxt5;

use image::{Rgba, RgbaImage};

use crate::header::FourCC;
use crate::{Error, Result};

use color::Texel;

/// Which S3TC variant a payload is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxtVariant {
    /// 8-byte blocks, 1-bit alpha.
    Dxt1,
    /// 16-byte blocks, explicit 4-bit alpha. Also used for DXT2.
    Dxt3,
    /// 16-byte blocks, interpolated alpha. Also used for DXT4.
    Dxt5,
}

impl DxtVariant {
    /// Map a FourCC tag to a variant.
    ///
    /// DXT2 and DXT4 are the premultiplied forms of DXT3 and DXT5; their
    /// payloads decode identically and the alpha is passed through as stored.
    pub fn from_four_cc(four_cc: FourCC) -> Result<Self> {
        match four_cc {
            FourCC::DXT1 => Ok(Self::Dxt1),
            FourCC::DXT2 | FourCC::DXT3 => Ok(Self::Dxt3),
            FourCC::DXT4 | FourCC::DXT5 => Ok(Self::Dxt5),
            other => Err(Error::UnsupportedFourCC(other)),
        }
    }

    /// Encoded bytes per 4x4 block.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Dxt1 => dxt1::BLOCK_SIZE,
            Self::Dxt3 => dxt3::BLOCK_SIZE,
            Self::Dxt5 => dxt5::BLOCK_SIZE,
        }
    }

    /// Decode a single block into 16 row-major texels.
    ///
    /// Returns `false` if `block` is not exactly one block long.
    pub fn decode_block(self, block: &[u8], out: &mut [Texel; 16]) -> bool {
        match self {
            Self::Dxt1 => decode_with(block, out, dxt1::decode_block),
            Self::Dxt3 => decode_with(block, out, dxt3::decode_block),
            Self::Dxt5 => decode_with(block, out, dxt5::decode_block),
        }
    }
}

impl std::fmt::Display for DxtVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dxt1 => write!(f, "DXT1"),
            Self::Dxt3 => write!(f, "DXT3"),
            Self::Dxt5 => write!(f, "DXT5"),
        }
    }
}

fn decode_with<const N: usize>(
    block: &[u8],
    out: &mut [Texel; 16],
    decode: fn(&[u8; N], &mut [Texel; 16]),
) -> bool {
    match <&[u8; N]>::try_from(block) {
        Ok(block) => {
            decode(block, out);
            true
        }
        Err(_) => false,
    }
}

/// Block geometry of an image: `ceil(width / 4) x ceil(height / 4)` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    pub width: u32,
    pub height: u32,
    pub blocks_wide: u32,
    pub blocks_high: u32,
    pub variant: DxtVariant,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32, variant: DxtVariant) -> Self {
        Self {
            width,
            height,
            blocks_wide: width.div_ceil(4),
            blocks_high: height.div_ceil(4),
            variant,
        }
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> u64 {
        u64::from(self.blocks_wide) * u64::from(self.blocks_high)
    }

    /// Encoded payload size in bytes, or `None` if it does not fit in a `u64`.
    pub fn byte_len(&self) -> Option<u64> {
        self.block_count().checked_mul(self.variant.block_size() as u64)
    }

    /// Top-left pixel of the block at `index` (row-major).
    pub fn block_origin(&self, index: u64) -> (u32, u32) {
        let bx = (index % u64::from(self.blocks_wide)) as u32;
        let by = (index / u64::from(self.blocks_wide)) as u32;
        (bx * 4, by * 4)
    }
}

/// Decode a block-compressed payload into `image`.
///
/// The image dimensions define the block grid. Returns the number of blocks
/// decoded, which is less than [`BlockGrid::block_count`] when `data` is
/// short.
pub fn decode_blocks(data: &[u8], variant: DxtVariant, image: &mut RgbaImage) -> u64 {
    let grid = BlockGrid::new(image.width(), image.height(), variant);
    if grid.blocks_wide == 0 {
        return 0;
    }

    let block_size = variant.block_size();
    let mut texels = [[0u8; 4]; 16];
    let mut decoded = 0;

    for index in 0..grid.block_count() {
        let Some(block) = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(block_size))
            .and_then(|start| data.get(start..start + block_size))
        else {
            break;
        };

        variant.decode_block(block, &mut texels);
        let (x, y) = grid.block_origin(index);
        write_block(image, x, y, &texels);
        decoded += 1;
    }

    if decoded < grid.block_count() {
        tracing::warn!(
            "{} payload holds {} of {} blocks ({} bytes), leaving the rest blank",
            variant,
            decoded,
            grid.block_count(),
            data.len()
        );
    } else {
        tracing::trace!("decoded {} {} blocks", decoded, variant);
    }

    decoded
}

/// Copy a decoded block into the image, clipping texels past the right and
/// bottom edges.
fn write_block(image: &mut RgbaImage, x: u32, y: u32, texels: &[Texel; 16]) {
    let (width, height) = image.dimensions();
    for (i, texel) in texels.iter().enumerate() {
        let px = x + (i % 4) as u32;
        let py = y + (i / 4) as u32;
        if px >= width || py >= height {
            continue;
        }
        image.put_pixel(px, py, Rgba(*texel));
    }
}

/// Decode a complete image of `variant` blocks.
pub fn decode(data: &[u8], width: u32, height: u32, variant: DxtVariant) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    decode_blocks(data, variant, &mut image);
    image
}

/// Decode a DXT1 payload.
pub fn decode_dxt1(data: &[u8], width: u32, height: u32) -> RgbaImage {
    decode(data, width, height, DxtVariant::Dxt1)
}

/// Decode a DXT3 payload.
pub fn decode_dxt3(data: &[u8], width: u32, height: u32) -> RgbaImage {
    decode(data, width, height, DxtVariant::Dxt3)
}

/// Decode a DXT5 payload.
pub fn decode_dxt5(data: &[u8], width: u32, height: u32) -> RgbaImage {
    decode(data, width, height, DxtVariant::Dxt5)
}
