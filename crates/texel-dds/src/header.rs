//! DDS header structures.
//!
//! [`DdsHeader`] and [`DdsPixelFormat`] mirror the on-disk layout and are read
//! with zerocopy. [`Header`] is the validated, owned view the decoder works
//! from.

use std::fmt;
use std::io::Read;

use texel_common::ReadExt;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result, DDS_MAGIC};

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    const FLAG_CAPS: u32 = 0x1;
    const FLAG_HEIGHT: u32 = 0x2;
    const FLAG_WIDTH: u32 = 0x4;
    const FLAG_PITCH: u32 = 0x8;
    const FLAG_PIXEL_FORMAT: u32 = 0x1000;
    const FLAG_LINEAR_SIZE: u32 = 0x8_0000;
    const CAPS_TEXTURE: u32 = 0x1000;
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected pixel format size.
    pub const SIZE: u32 = 32;
}

/// Four-character code for compression type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT2 compression (DXT3 with premultiplied alpha).
    pub const DXT2: Self = Self(*b"DXT2");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT4 compression (DXT5 with premultiplied alpha).
    pub const DXT4: Self = Self(*b"DXT4");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            let text: String = self.0.iter().map(|&b| b as char).collect();
            write!(f, "{:?}", text)
        } else {
            write!(f, "{:#010x}", u32::from_le_bytes(self.0))
        }
    }
}

/// Pixel format flags (`DDPF_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelFormatFlags(pub u32);

impl PixelFormatFlags {
    /// The surface has an alpha channel alongside color.
    pub const ALPHA_PIXELS: Self = Self(0x1);
    /// Alpha-only surface.
    pub const ALPHA: Self = Self(0x2);
    /// Compressed; the FourCC tag names the scheme.
    pub const FOURCC: Self = Self(0x4);
    /// Uncompressed RGB data.
    pub const RGB: Self = Self(0x40);
    /// Uncompressed YUV data.
    pub const YUV: Self = Self(0x200);
    /// Single-channel luminance data.
    pub const LUMINANCE: Self = Self(0x2_0000);

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for PixelFormatFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The pixel format as the decoder sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat {
    pub flags: PixelFormatFlags,
    pub four_cc: FourCC,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl PixelFormat {
    /// A block-compressed format identified by `four_cc`.
    pub fn compressed(four_cc: FourCC) -> Self {
        Self {
            flags: PixelFormatFlags::FOURCC,
            four_cc,
            ..Self::default()
        }
    }

    /// An uncompressed packed format described by bit count and channel masks.
    pub fn packed(flags: PixelFormatFlags, rgb_bit_count: u32, masks: [u32; 4]) -> Self {
        let [r_bit_mask, g_bit_mask, b_bit_mask, a_bit_mask] = masks;
        Self {
            flags,
            four_cc: FourCC::default(),
            rgb_bit_count,
            r_bit_mask,
            g_bit_mask,
            b_bit_mask,
            a_bit_mask,
        }
    }

    /// Channel masks in `[r, g, b, a]` order.
    pub fn masks(&self) -> [u32; 4] {
        [self.r_bit_mask, self.g_bit_mask, self.b_bit_mask, self.a_bit_mask]
    }

    fn from_raw(raw: &DdsPixelFormat) -> Self {
        Self {
            flags: PixelFormatFlags(raw.flags),
            four_cc: raw.four_cc,
            rgb_bit_count: raw.rgb_bit_count,
            r_bit_mask: raw.r_bit_mask,
            g_bit_mask: raw.g_bit_mask,
            b_bit_mask: raw.b_bit_mask,
            a_bit_mask: raw.a_bit_mask,
        }
    }

    fn to_raw(self) -> DdsPixelFormat {
        DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags: self.flags.bits(),
            four_cc: self.four_cc,
            rgb_bit_count: self.rgb_bit_count,
            r_bit_mask: self.r_bit_mask,
            g_bit_mask: self.g_bit_mask,
            b_bit_mask: self.b_bit_mask,
            a_bit_mask: self.a_bit_mask,
        }
    }
}

/// A parsed DDS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub mipmap_count: u32,
    pub pixel_format: PixelFormat,
}

impl Header {
    /// Build a single-surface header.
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            mipmap_count: 1,
            pixel_format,
        }
    }

    /// Read and check the `"DDS "` magic bytes.
    pub fn read_magic<R: Read>(reader: &mut R) -> Result<()> {
        let magic: [u8; 4] = reader.read_struct().map_err(Error::HeaderRead)?;
        if &magic != DDS_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }
        Ok(())
    }

    /// Read the 124-byte header that follows the magic bytes.
    ///
    /// Exactly [`DdsHeader::SIZE`] bytes are consumed; nothing past the
    /// header is touched.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let raw: DdsHeader = reader.read_struct().map_err(Error::HeaderRead)?;
        Self::from_raw(&raw)
    }

    /// Validate a raw header.
    pub fn from_raw(raw: &DdsHeader) -> Result<Self> {
        let size = raw.size;
        if size != DdsHeader::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size {} (expected {})",
                size,
                DdsHeader::SIZE
            )));
        }

        let pf_size = raw.pixel_format.size;
        if pf_size != DdsPixelFormat::SIZE {
            return Err(Error::InvalidHeader(format!(
                "pixel format size {} (expected {})",
                pf_size,
                DdsPixelFormat::SIZE
            )));
        }

        Ok(Self {
            width: raw.width,
            height: raw.height,
            mipmap_count: raw.mipmap_count.max(1),
            pixel_format: PixelFormat::from_raw(&raw.pixel_format),
        })
    }

    /// The on-disk header, without the magic bytes.
    pub fn to_raw(&self) -> DdsHeader {
        let pixel_format = self.pixel_format.to_raw();
        let compressed = self.pixel_format.flags.contains(PixelFormatFlags::FOURCC);

        let mut flags = DdsHeader::FLAG_CAPS
            | DdsHeader::FLAG_HEIGHT
            | DdsHeader::FLAG_WIDTH
            | DdsHeader::FLAG_PIXEL_FORMAT;
        let pitch_or_linear_size = if compressed {
            flags |= DdsHeader::FLAG_LINEAR_SIZE;
            0
        } else {
            flags |= DdsHeader::FLAG_PITCH;
            let bits = u64::from(self.width) * u64::from(self.pixel_format.rgb_bit_count);
            u32::try_from((bits + 7) / 8).unwrap_or(0)
        };

        DdsHeader {
            size: DdsHeader::SIZE,
            flags,
            height: self.height,
            width: self.width,
            pitch_or_linear_size,
            depth: 0,
            mipmap_count: self.mipmap_count,
            reserved1: [0; 11],
            pixel_format,
            caps: DdsHeader::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Serialize as a complete file prefix: magic bytes followed by the header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let raw = self.to_raw();
        let mut out = Vec::with_capacity(4 + DdsHeader::SIZE as usize);
        out.extend_from_slice(DDS_MAGIC);
        out.extend_from_slice(raw.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(
            std::mem::size_of::<DdsPixelFormat>(),
            DdsPixelFormat::SIZE as usize
        );
    }

    #[test]
    fn test_header_roundtrip_through_bytes() {
        let header = Header::new(
            16,
            8,
            PixelFormat::packed(
                PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
                32,
                [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
            ),
        );
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), 128);

        let mut stream = &bytes[4..];
        let raw: DdsHeader = stream.read_struct().unwrap();
        let pitch = raw.pitch_or_linear_size;
        assert_eq!(pitch, 64);
        assert_eq!(Header::from_raw(&raw).unwrap(), header);
    }

    #[test]
    fn test_read_consumes_only_header() {
        let header = Header::new(4, 4, PixelFormat::compressed(FourCC::DXT1));
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&[0xAA; 8]);

        let mut stream = &bytes[..];
        Header::read_magic(&mut stream).unwrap();
        let parsed = Header::read(&mut stream).unwrap();

        assert_eq!(parsed.pixel_format.four_cc, FourCC::DXT1);
        assert_eq!(stream, &[0xAA; 8]);
    }

    #[test]
    fn test_bad_magic() {
        let mut stream: &[u8] = b"PNG \x00\x00";
        match Header::read_magic(&mut stream) {
            Err(Error::InvalidMagic(magic)) => assert_eq!(&magic, b"PNG "),
            other => panic!("expected InvalidMagic, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_header() {
        let bytes = Header::new(4, 4, PixelFormat::compressed(FourCC::DXT5)).to_bytes();
        let mut stream = &bytes[4..60];
        assert!(matches!(
            Header::read(&mut stream),
            Err(Error::HeaderRead(_))
        ));
    }

    #[test]
    fn test_bad_header_size() {
        let mut raw = Header::new(4, 4, PixelFormat::compressed(FourCC::DXT1)).to_raw();
        raw.size = 100;
        assert!(matches!(
            Header::from_raw(&raw),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_four_cc_display() {
        assert_eq!(FourCC::DXT5.to_string(), "\"DXT5\"");
        assert_eq!(FourCC([0, 1, 2, 3]).to_string(), "0x03020100");
    }
}
