//! DXT3 (BC2): RGB with explicit 4-bit alpha, 16 bytes per block.

use byteorder::{ByteOrder, LittleEndian};

use super::color::{color_index, color_table, Texel};

/// Encoded size of one 4x4 block.
pub const BLOCK_SIZE: usize = 16;

/// Expand a 4-bit alpha value to 8 bits (`n * 17`, so 0xF maps to 0xFF).
#[inline]
pub fn expand_alpha(nibble: u8) -> u8 {
    (nibble & 0xF) * 17
}

/// Decode one block into 16 row-major texels.
///
/// Layout: `alpha: u64` (one nibble per texel, low nibble first), then a
/// DXT1-style color block. The explicit alpha replaces whatever alpha the
/// color table holds, including the transparent slot of a three-color block.
pub fn decode_block(block: &[u8; BLOCK_SIZE], out: &mut [Texel; 16]) {
    let alpha = LittleEndian::read_u64(&block[0..8]);
    let c0 = LittleEndian::read_u16(&block[8..10]);
    let c1 = LittleEndian::read_u16(&block[10..12]);
    let indices = LittleEndian::read_u32(&block[12..16]);

    let table = color_table(c0, c1);
    for (i, texel) in out.iter_mut().enumerate() {
        let [r, g, b, _] = table[color_index(indices, i)];
        let a = expand_alpha(((alpha >> (4 * i)) & 0xF) as u8);
        *texel = [r, g, b, a];
    }
}
