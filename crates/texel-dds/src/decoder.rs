//! Stream decoding: header, format routing and payload.

use std::io::Read;

use image::RgbaImage;
use texel_common::ReadExt;

use crate::bc::{self, BlockGrid, DxtVariant};
use crate::format::ImageInfo;
use crate::header::{Header, PixelFormatFlags};
use crate::unpack::{self, PackedLayout, UncompressedSurface};
use crate::{Error, Result};

/// Options controlling how a DDS stream is read.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// Whether the stream starts directly at the header, without `"DDS "`.
    ///
    /// Defaults to `false`.
    pub skip_magic_bytes: bool,

    /// Whether a block-compressed payload that ends early is decoded as far
    /// as it goes instead of failing with [`Error::DataRead`].
    ///
    /// Missing blocks are left transparent black. Uncompressed payloads are
    /// always read in full.
    ///
    /// Defaults to `false`.
    pub allow_truncated_payload: bool,

    /// Largest `width * height` the decoder will allocate a raster for.
    ///
    /// Defaults to `1 << 28` (a 16384x16384 texture).
    pub max_pixels: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            skip_magic_bytes: false,
            allow_truncated_payload: false,
            max_pixels: 1 << 28,
        }
    }
}

impl DecodeOptions {
    pub fn skip_magic_bytes(mut self, skip: bool) -> Self {
        self.skip_magic_bytes = skip;
        self
    }

    pub fn allow_truncated_payload(mut self, allow: bool) -> Self {
        self.allow_truncated_payload = allow;
        self
    }

    pub fn max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }
}

/// How the payload of a surface is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// S3TC blocks.
    Compressed(DxtVariant),
    /// Packed pixels addressed by bit masks.
    Uncompressed(PackedLayout),
}

impl SurfaceKind {
    /// Route a header to the block codec or the bit-unpacker.
    ///
    /// The FourCC flag alone decides: its tag is taken from the header and
    /// must name a DXT variant.
    pub fn from_header(header: &Header) -> Result<Self> {
        let pf = &header.pixel_format;
        if pf.flags.contains(PixelFormatFlags::FOURCC) {
            DxtVariant::from_four_cc(pf.four_cc).map(Self::Compressed)
        } else {
            PackedLayout::from_header(header).map(Self::Uncompressed)
        }
    }

    /// Payload size for a `width x height` surface.
    pub fn data_len(&self, width: u32, height: u32) -> Option<usize> {
        match self {
            Self::Compressed(variant) => BlockGrid::new(width, height, *variant)
                .byte_len()
                .and_then(|len| usize::try_from(len).ok()),
            Self::Uncompressed(layout) => layout.data_len(height),
        }
    }
}

/// Decoder for a single DDS surface.
///
/// Construction reads only the magic bytes and the header; the payload is
/// read by [`DdsDecoder::read_rgba`] or [`DdsDecoder::read_uncompressed`].
#[derive(Debug, Clone)]
pub struct DdsDecoder {
    header: Header,
    surface: SurfaceKind,
    options: DecodeOptions,
}

impl DdsDecoder {
    /// Read the header with default options.
    pub fn new<R: Read>(reader: R) -> Result<Self> {
        Self::new_with(reader, DecodeOptions::default())
    }

    /// Read the header from `reader`, leaving it positioned at the payload.
    pub fn new_with<R: Read>(mut reader: R, options: DecodeOptions) -> Result<Self> {
        if !options.skip_magic_bytes {
            Header::read_magic(&mut reader)?;
        }
        let header = Header::read(&mut reader)?;

        Self::from_header_with(header, options)
    }

    pub fn from_header(header: Header) -> Result<Self> {
        Self::from_header_with(header, DecodeOptions::default())
    }

    pub fn from_header_with(header: Header, options: DecodeOptions) -> Result<Self> {
        let pixels = u64::from(header.width) * u64::from(header.height);
        if pixels > options.max_pixels {
            return Err(Error::ImageTooLarge {
                width: header.width,
                height: header.height,
                max_pixels: options.max_pixels,
            });
        }

        let surface = SurfaceKind::from_header(&header)?;

        tracing::debug!(
            "DDS {}x{}, flags {:#x}, {} bpp, surface {:?}",
            header.width,
            header.height,
            header.pixel_format.flags.bits(),
            header.pixel_format.rgb_bit_count,
            surface
        );
        if header.mipmap_count > 1 {
            tracing::debug!(
                "ignoring {} mipmap levels below the top surface",
                header.mipmap_count - 1
            );
        }

        Ok(Self {
            header,
            surface,
            options,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn surface(&self) -> SurfaceKind {
        self.surface
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.header.width, self.header.height)
    }

    /// Classify the header's pixel format.
    pub fn info(&self) -> Result<ImageInfo> {
        ImageInfo::from_header(&self.header)
    }

    /// Number of payload bytes the surface occupies.
    pub fn data_len(&self) -> Result<usize> {
        self.surface
            .data_len(self.header.width, self.header.height)
            .ok_or(Error::ImageTooLarge {
                width: self.header.width,
                height: self.header.height,
                max_pixels: self.options.max_pixels,
            })
    }

    /// Read the payload and decode it into a straight-alpha RGBA raster.
    pub fn read_rgba<R: Read>(self, mut reader: R) -> Result<RgbaImage> {
        let (width, height) = self.dimensions();
        let expected = self.data_len()?;

        match self.surface {
            SurfaceKind::Compressed(variant) => {
                let data = reader.read_up_to(expected)?;
                if data.len() < expected && !self.options.allow_truncated_payload {
                    return Err(Error::DataRead {
                        expected,
                        actual: data.len(),
                    });
                }
                Ok(bc::decode(&data, width, height, variant))
            }
            SurfaceKind::Uncompressed(layout) => {
                let data = read_payload(&mut reader, expected)?;
                unpack::unpack_rgba(&data, width, height, &layout)
            }
        }
    }

    /// Read an uncompressed payload for lazy per-pixel access.
    pub fn read_uncompressed<R: Read>(self, mut reader: R) -> Result<UncompressedSurface> {
        let layout = match self.surface {
            SurfaceKind::Uncompressed(layout) => layout,
            SurfaceKind::Compressed(_) => {
                let pf = &self.header.pixel_format;
                return Err(Error::UnsupportedPixelFormat {
                    flags: pf.flags.bits(),
                    rgb_bit_count: pf.rgb_bit_count,
                });
            }
        };

        let data = read_payload(&mut reader, self.data_len()?)?;
        Ok(UncompressedSurface::new(
            self.header.width,
            self.header.height,
            layout,
            data,
        ))
    }
}

fn read_payload<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<u8>> {
    let data = reader.read_up_to(expected)?;
    if data.len() < expected {
        return Err(Error::DataRead {
            expected,
            actual: data.len(),
        });
    }
    Ok(data)
}

/// Read dimensions and color model without touching pixel data.
///
/// Only the magic bytes and the 124-byte header are consumed.
pub fn probe<R: Read>(mut reader: R) -> Result<ImageInfo> {
    Header::read_magic(&mut reader)?;
    let header = Header::read(&mut reader)?;
    let info = ImageInfo::from_header(&header)?;

    tracing::debug!(
        "probed {}x{} {:?}",
        info.width,
        info.height,
        info.color_model
    );
    Ok(info)
}

/// Decode a complete DDS stream with default options.
pub fn decode<R: Read>(mut reader: R) -> Result<RgbaImage> {
    DdsDecoder::new(&mut reader)?.read_rgba(&mut reader)
}

/// Decode a complete DDS stream.
pub fn decode_with<R: Read>(mut reader: R, options: DecodeOptions) -> Result<RgbaImage> {
    DdsDecoder::new_with(&mut reader, options)?.read_rgba(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{FourCC, PixelFormat};

    #[test]
    fn test_surface_routing_uses_header_four_cc() {
        let dxt1 = Header::new(4, 4, PixelFormat::compressed(FourCC::DXT1));
        let dxt4 = Header::new(4, 4, PixelFormat::compressed(FourCC::DXT4));
        assert_eq!(
            SurfaceKind::from_header(&dxt1).unwrap(),
            SurfaceKind::Compressed(DxtVariant::Dxt1)
        );
        assert_eq!(
            SurfaceKind::from_header(&dxt4).unwrap(),
            SurfaceKind::Compressed(DxtVariant::Dxt5)
        );
    }

    #[test]
    fn test_fourcc_flag_wins_over_rgb_depth() {
        let mut pf = PixelFormat::compressed(FourCC::DXT3);
        pf.flags = pf.flags | PixelFormatFlags::RGB;
        pf.rgb_bit_count = 32;
        let header = Header::new(8, 8, pf);

        assert_eq!(
            SurfaceKind::from_header(&header).unwrap(),
            SurfaceKind::Compressed(DxtVariant::Dxt3)
        );
    }

    #[test]
    fn test_unknown_four_cc() {
        let header = Header::new(4, 4, PixelFormat::compressed(FourCC::DX10));
        assert!(matches!(
            DdsDecoder::from_header(header),
            Err(Error::UnsupportedFourCC(FourCC::DX10))
        ));
    }

    #[test]
    fn test_max_pixels() {
        let header = Header::new(1024, 1024, PixelFormat::compressed(FourCC::DXT1));
        let options = DecodeOptions::default().max_pixels(1024);
        assert!(matches!(
            DdsDecoder::from_header_with(header, options),
            Err(Error::ImageTooLarge { width: 1024, height: 1024, max_pixels: 1024 })
        ));
    }

    #[test]
    fn test_data_len() {
        let decoder =
            DdsDecoder::from_header(Header::new(5, 5, PixelFormat::compressed(FourCC::DXT5)))
                .unwrap();
        assert_eq!(decoder.data_len().unwrap(), 4 * 16);
    }

    #[test]
    fn test_data_len_overflow_is_too_large() {
        let header = Header::new(u32::MAX, u32::MAX, PixelFormat::compressed(FourCC::DXT5));
        let options = DecodeOptions::default().max_pixels(u64::MAX);
        let decoder = DdsDecoder::from_header_with(header, options).unwrap();

        assert!(matches!(
            decoder.data_len(),
            Err(Error::ImageTooLarge { width: u32::MAX, height: u32::MAX, .. })
        ));
        assert!(matches!(
            decoder.read_rgba(&[0u8; 16][..]),
            Err(Error::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_header_only_stream_fails_without_reserving_payload() {
        // 16384x16384 RGBA8 claims 1 GiB of pixel data
        let pf = PixelFormat::packed(
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
            32,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        );
        let file = Header::new(16384, 16384, pf).to_bytes();

        assert!(matches!(
            decode(&file[..]),
            Err(Error::DataRead { expected: 0x4000_0000, actual: 0 })
        ));
    }

    #[test]
    fn test_read_uncompressed_rejects_compressed() {
        let decoder =
            DdsDecoder::from_header(Header::new(4, 4, PixelFormat::compressed(FourCC::DXT1)))
                .unwrap();
        assert!(matches!(
            decoder.read_uncompressed(&[0u8; 8][..]),
            Err(Error::UnsupportedPixelFormat { .. })
        ));
    }
}
