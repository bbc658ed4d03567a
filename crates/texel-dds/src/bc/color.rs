//! Endpoint colors shared by all three DXT variants.

/// An 8-bit RGBA texel.
pub type Texel = [u8; 4];

/// Fully transparent black, used for the fourth slot of a three-color block.
pub const TRANSPARENT: Texel = [0, 0, 0, 0];

/// Expand a 5:6:5 packed color to 8 bits per channel.
///
/// Channels are shifted up without replicating the high bits, so the
/// brightest red is 0xF8 rather than 0xFF.
#[inline]
pub fn rgb565_to_rgba(color: u16) -> Texel {
    let r = ((color >> 11) & 0x1F) << 3;
    let g = ((color >> 5) & 0x3F) << 2;
    let b = (color & 0x1F) << 3;
    [r as u8, g as u8, b as u8, u8::MAX]
}

/// Weighted blend of two opaque colors, `(c0 * w0 + c1 * w1) / (w0 + w1)`
/// per channel with truncating division.
#[inline]
pub fn interpolate(c0: Texel, c1: Texel, w0: u32, w1: u32) -> Texel {
    let mix = |a: u8, b: u8| ((u32::from(a) * w0 + u32::from(b) * w1) / (w0 + w1)) as u8;
    [mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]), u8::MAX]
}

/// Build the four-entry color table for a block from its raw endpoints.
///
/// Endpoints are compared as packed 16-bit values. `c0 > c1` selects the
/// opaque four-color mode; otherwise the block has three colors and the
/// last slot is transparent black.
pub fn color_table(c0: u16, c1: u16) -> [Texel; 4] {
    let color0 = rgb565_to_rgba(c0);
    let color1 = rgb565_to_rgba(c1);

    if c0 > c1 {
        [
            color0,
            color1,
            interpolate(color0, color1, 2, 1),
            interpolate(color0, color1, 1, 2),
        ]
    } else {
        [
            color0,
            color1,
            interpolate(color0, color1, 1, 1),
            TRANSPARENT,
        ]
    }
}

/// Extract the 2-bit color index of texel `i` (row-major) from a block's
/// index word.
#[inline]
pub fn color_index(indices: u32, i: usize) -> usize {
    ((indices >> (2 * i)) & 0x3) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_primaries() {
        assert_eq!(rgb565_to_rgba(0xF800), [0xF8, 0, 0, 255]);
        assert_eq!(rgb565_to_rgba(0x07E0), [0, 0xFC, 0, 255]);
        assert_eq!(rgb565_to_rgba(0x001F), [0, 0, 0xF8, 255]);
        assert_eq!(rgb565_to_rgba(0xFFFF), [0xF8, 0xFC, 0xF8, 255]);
        assert_eq!(rgb565_to_rgba(0x0000), [0, 0, 0, 255]);
    }

    #[test]
    fn test_interpolate_truncates() {
        // (248 * 2 + 0) / 3 = 165.33
        assert_eq!(interpolate([248, 0, 0, 255], [0, 0, 0, 255], 2, 1)[0], 165);
        // (1 + 2) / 2 = 1.5
        assert_eq!(interpolate([1, 0, 0, 255], [2, 0, 0, 255], 1, 1)[0], 1);
    }

    #[test]
    fn test_four_color_table() {
        let table = color_table(0xF800, 0x07E0);
        let c0 = rgb565_to_rgba(0xF800);
        let c1 = rgb565_to_rgba(0x07E0);

        assert_eq!(table[0], c0);
        assert_eq!(table[1], c1);
        assert_eq!(table[2], interpolate(c0, c1, 2, 1));
        assert_eq!(table[3], interpolate(c0, c1, 1, 2));
        assert_eq!(table[2], [165, 84, 0, 255]);
        assert_eq!(table[3], [82, 168, 0, 255]);
    }

    #[test]
    fn test_three_color_table() {
        for (c0, c1) in [(0x07E0, 0xF800), (0x1234, 0x1234), (0, 0xFFFF)] {
            let table = color_table(c0, c1);
            let color0 = rgb565_to_rgba(c0);
            let color1 = rgb565_to_rgba(c1);

            assert_eq!(table[2], interpolate(color0, color1, 1, 1));
            assert_eq!(table[3], TRANSPARENT);
        }
    }

    #[test]
    fn test_table_order_uses_packed_values() {
        // 0x0020 (green=1) > 0x001F (blue=31) as integers even though blue is brighter
        let table = color_table(0x0020, 0x001F);
        assert_eq!(table[3][3], 255);
    }

    #[test]
    fn test_color_index() {
        let indices = 0b11_10_01_00;
        assert_eq!(color_index(indices, 0), 0);
        assert_eq!(color_index(indices, 1), 1);
        assert_eq!(color_index(indices, 2), 2);
        assert_eq!(color_index(indices, 3), 3);
        assert_eq!(color_index(u32::MAX, 15), 3);
    }
}
