//! Uncompressed packed-pixel unpacking.
//!
//! Each pixel is a little-endian integer of `rgb_bit_count` bits; the header's
//! channel masks select which bits belong to red, green, blue and alpha.
//! Channels are narrowed to eight bits (see [`texel_common::bits::extract_channel`]),
//! so formats with wider channels decode at reduced precision.
//!
//! Only RGB surfaces are unpacked. Luminance, YUV and alpha-only layouts do
//! not map onto the red, green and blue masks and are rejected.

use image::{Rgba, RgbaImage};
use texel_common::bits::extract_channel;
use texel_common::BinaryReader;

use crate::header::{Header, PixelFormatFlags};
use crate::{Error, Result};

/// Row and pixel addressing for a packed uncompressed surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedLayout {
    bit_count: u32,
    stride: usize,
    pitch: usize,
    masks: [u64; 4],
    has_alpha: bool,
}

impl PackedLayout {
    /// Derive the layout from a header.
    ///
    /// The surface must carry the RGB flag, and pixels must be a whole number
    /// of bytes wide, between 8 and 64 bits.
    pub fn from_header(header: &Header) -> Result<Self> {
        let pf = &header.pixel_format;
        let bit_count = pf.rgb_bit_count;
        let is_rgb = pf.flags.contains(PixelFormatFlags::RGB);
        if !is_rgb || bit_count == 0 || bit_count > 64 || bit_count % 8 != 0 {
            return Err(Error::UnsupportedPixelFormat {
                flags: pf.flags.bits(),
                rgb_bit_count: bit_count,
            });
        }

        let row_bits = u64::from(header.width) * u64::from(bit_count);
        let pitch = usize::try_from((row_bits + 7) / 8).map_err(|_| Error::ImageTooLarge {
            width: header.width,
            height: header.height,
            max_pixels: u64::MAX,
        })?;

        Ok(Self {
            bit_count,
            stride: (bit_count / 8) as usize,
            pitch,
            masks: pf.masks().map(u64::from),
            has_alpha: pf.flags.contains(PixelFormatFlags::ALPHA_PIXELS),
        })
    }

    /// Bits per pixel.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Bytes per pixel.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Total payload size for `height` rows.
    pub fn data_len(&self, height: u32) -> Option<usize> {
        self.pitch.checked_mul(height as usize)
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        self.pitch * y as usize + self.stride * x as usize
    }

    /// Split a packed pixel value into straight RGBA.
    ///
    /// Alpha is read through its mask only when the surface sets
    /// `ALPHA_PIXELS`; otherwise the pixel is opaque whatever the alpha mask
    /// holds.
    pub fn split(&self, value: u64) -> Rgba<u8> {
        let [r, g, b, a] = self.masks;
        let alpha = if self.has_alpha {
            extract_channel(value, a)
        } else {
            u8::MAX
        };
        Rgba([
            extract_channel(value, r),
            extract_channel(value, g),
            extract_channel(value, b),
            alpha,
        ])
    }

    /// Read and split the pixel at `(x, y)` of `data`.
    pub fn read_pixel(&self, data: &[u8], x: u32, y: u32) -> Result<Rgba<u8>> {
        let value = BinaryReader::new_at(data, self.offset(x, y)).read_bits(self.bit_count)?;
        Ok(self.split(value))
    }
}

/// An uncompressed surface decoded lazily, one pixel per access.
#[derive(Debug, Clone)]
pub struct UncompressedSurface {
    width: u32,
    height: u32,
    layout: PackedLayout,
    data: Vec<u8>,
}

impl UncompressedSurface {
    /// Wrap a raw payload.
    ///
    /// The payload length is not checked here; accessing a pixel that lies
    /// past its end fails with a buffer error.
    pub fn new(width: u32, height: u32, layout: PackedLayout, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> &PackedLayout {
        &self.layout
    }

    /// Raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decode the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgba<u8>> {
        if x >= self.width || y >= self.height {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.layout.read_pixel(&self.data, x, y)
    }

    /// Decode every pixel into an owned raster.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        unpack_rgba(&self.data, self.width, self.height, &self.layout)
    }
}

/// Eagerly unpack a whole packed payload into an RGBA raster.
pub fn unpack_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    layout: &PackedLayout,
) -> Result<RgbaImage> {
    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = layout.read_pixel(data, x, y)?;
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{PixelFormat, PixelFormatFlags};

    const ARGB_MASKS: [u32; 4] = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000];

    fn header(width: u32, height: u32, bits: u32, masks: [u32; 4]) -> Header {
        let flags = if masks[3] == 0 {
            PixelFormatFlags::RGB
        } else {
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS
        };
        Header::new(width, height, PixelFormat::packed(flags, bits, masks))
    }

    #[test]
    fn test_layout_addressing() {
        let layout =
            PackedLayout::from_header(&header(5, 3, 24, [0xFF, 0xFF00, 0xFF_0000, 0])).unwrap();
        assert_eq!(layout.stride(), 3);
        assert_eq!(layout.pitch(), 15);
        assert_eq!(layout.data_len(3), Some(45));
        assert_eq!(layout.offset(2, 1), 21);
    }

    #[test]
    fn test_layout_rejects_sub_byte_and_oversized_pixels() {
        for bits in [0, 4, 12, 72] {
            assert!(matches!(
                PackedLayout::from_header(&header(4, 4, bits, ARGB_MASKS)),
                Err(Error::UnsupportedPixelFormat { .. })
            ));
        }
    }

    #[test]
    fn test_read_argb_pixel() {
        let layout = PackedLayout::from_header(&header(2, 1, 32, ARGB_MASKS)).unwrap();
        // second pixel: B=0x30 G=0x20 R=0x10 A=0x80
        let data = [0, 0, 0, 0, 0x30, 0x20, 0x10, 0x80];
        assert_eq!(
            layout.read_pixel(&data, 1, 0).unwrap(),
            Rgba([0x10, 0x20, 0x30, 0x80])
        );
    }

    #[test]
    fn test_missing_alpha_mask_is_opaque() {
        let layout =
            PackedLayout::from_header(&header(1, 1, 24, [0xFF_0000, 0xFF00, 0xFF, 0])).unwrap();
        let data = [0x03, 0x02, 0x01];
        assert_eq!(layout.read_pixel(&data, 0, 0).unwrap(), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_alpha_flag_with_zero_mask_reads_zero() {
        let pf = PixelFormat::packed(
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
            24,
            [0xFF_0000, 0xFF00, 0xFF, 0],
        );
        let layout = PackedLayout::from_header(&Header::new(1, 1, pf)).unwrap();
        assert_eq!(layout.split(0x01_0203), Rgba([1, 2, 3, 0]));
    }

    #[test]
    fn test_alpha_mask_ignored_without_alpha_flag() {
        let pf = PixelFormat::packed(PixelFormatFlags::RGB, 32, ARGB_MASKS);
        let layout = PackedLayout::from_header(&Header::new(1, 1, pf)).unwrap();
        assert_eq!(layout.split(0x0001_0203), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_layout_requires_rgb_flag() {
        for flags in [
            PixelFormatFlags::LUMINANCE,
            PixelFormatFlags::LUMINANCE | PixelFormatFlags::ALPHA_PIXELS,
            PixelFormatFlags::YUV,
            PixelFormatFlags::ALPHA,
        ] {
            let pf = PixelFormat::packed(flags, 8, [0xFF, 0, 0, 0]);
            assert!(matches!(
                PackedLayout::from_header(&Header::new(1, 1, pf)),
                Err(Error::UnsupportedPixelFormat { rgb_bit_count: 8, .. })
            ));
        }
    }

    #[test]
    fn test_rgb565_channels_are_raw_field_values() {
        let layout =
            PackedLayout::from_header(&header(1, 1, 16, [0xF800, 0x07E0, 0x001F, 0])).unwrap();
        let data = 0xF81Fu16.to_le_bytes();
        assert_eq!(layout.read_pixel(&data, 0, 0).unwrap(), Rgba([0x1F, 0, 0x1F, 255]));
    }

    #[test]
    fn test_lazy_surface_short_buffer() {
        let layout = PackedLayout::from_header(&header(2, 2, 32, ARGB_MASKS)).unwrap();
        let surface = UncompressedSurface::new(2, 2, layout, vec![0xFF; 12]);

        assert!(surface.pixel(0, 0).is_ok());
        assert!(surface.pixel(0, 1).is_ok());
        assert!(matches!(
            surface.pixel(1, 1),
            Err(Error::Common(texel_common::Error::BufferTooShort { offset: 12, .. }))
        ));
        assert!(matches!(
            surface.pixel(2, 0),
            Err(Error::PixelOutOfBounds { x: 2, y: 0, .. })
        ));
    }

    #[test]
    fn test_unpack_whole_surface() {
        let layout = PackedLayout::from_header(&header(2, 2, 8, [0xE0, 0x1C, 0x03, 0])).unwrap();
        let data = [0xE0, 0x1C, 0x03, 0xFF];
        let image = unpack_rgba(&data, 2, 2, &layout).unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgba([7, 0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([0, 7, 0, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([0, 0, 3, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([7, 7, 3, 255]));
    }
}
