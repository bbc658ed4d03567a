//! Pixel format classification.

use crate::header::{FourCC, Header, PixelFormat, PixelFormatFlags};
use crate::{Error, Result};

/// The sampling scheme a DDS surface stores its pixels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// 32-bit packed RGBA.
    Rgba8,
    /// 64-bit packed RGBA.
    Rgba16,
    /// 24-bit YCbCr.
    YCbCr,
    /// 8-bit luminance.
    Gray8,
    /// 16-bit luminance.
    Gray16,
    /// 8-bit alpha only.
    Alpha8,
    /// 16-bit alpha only.
    Alpha16,
    /// Block compressed; the FourCC tag names the scheme.
    Compressed(FourCC),
}

impl ColorModel {
    /// Classify a pixel format.
    ///
    /// The checks overlap (a FourCC surface counts as RGB, for instance), so
    /// they run in a fixed priority order and the first match wins.
    pub fn classify(pf: &PixelFormat) -> Result<Self> {
        let flags = pf.flags;
        let has_alpha = flags.contains(PixelFormatFlags::ALPHA_PIXELS)
            || flags.contains(PixelFormatFlags::ALPHA);
        let has_rgb =
            flags.contains(PixelFormatFlags::FOURCC) || flags.contains(PixelFormatFlags::RGB);
        let has_yuv = flags.contains(PixelFormatFlags::YUV);
        let has_luminance = flags.contains(PixelFormatFlags::LUMINANCE);

        let model = match pf.rgb_bit_count {
            32 if has_rgb => Self::Rgba8,
            64 if has_rgb => Self::Rgba16,
            24 if has_yuv => Self::YCbCr,
            8 if has_luminance => Self::Gray8,
            16 if has_luminance => Self::Gray16,
            8 if has_alpha => Self::Alpha8,
            16 if has_alpha => Self::Alpha16,
            _ if flags.contains(PixelFormatFlags::FOURCC) => Self::Compressed(pf.four_cc),
            _ => {
                return Err(Error::UnrecognizedFormat {
                    has_alpha,
                    has_rgb,
                    has_yuv,
                    has_luminance,
                    flags: flags.bits(),
                })
            }
        };

        Ok(model)
    }

    /// Short human-readable name.
    pub fn name(self) -> String {
        match self {
            Self::Rgba8 => "RGBA8".into(),
            Self::Rgba16 => "RGBA16".into(),
            Self::YCbCr => "YCbCr".into(),
            Self::Gray8 => "Gray8".into(),
            Self::Gray16 => "Gray16".into(),
            Self::Alpha8 => "Alpha8".into(),
            Self::Alpha16 => "Alpha16".into(),
            Self::Compressed(four_cc) => format!("Compressed({})", four_cc),
        }
    }
}

/// Dimensions and color model of a DDS image, as reported by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
}

impl ImageInfo {
    /// Classify a parsed header.
    pub fn from_header(header: &Header) -> Result<Self> {
        Ok(Self {
            width: header.width,
            height: header.height,
            color_model: ColorModel::classify(&header.pixel_format)?,
        })
    }
}
