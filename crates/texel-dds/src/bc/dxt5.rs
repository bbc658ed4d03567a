//! DXT5 (BC3): RGB with interpolated 3-bit-coded alpha, 16 bytes per block.

use byteorder::{ByteOrder, LittleEndian};

use super::color::{color_index, color_table, Texel};

/// Encoded size of one 4x4 block.
pub const BLOCK_SIZE: usize = 16;

/// Build the eight-entry alpha palette from the two anchor values.
///
/// With `alpha0 > alpha1` codes 2..=7 are a six-step ramp in sevenths.
/// Otherwise codes 2..=5 are a four-step ramp in fifths, code 6 is fully
/// transparent and code 7 fully opaque.
pub fn alpha_table(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = u16::from(alpha0);
    let a1 = u16::from(alpha1);
    let mut table = [alpha0, alpha1, 0, 0, 0, 0, 0, u8::MAX];

    if alpha0 > alpha1 {
        for code in 2..8u16 {
            table[code as usize] = (((8 - code) * a0 + (code - 1) * a1) / 7) as u8;
        }
    } else {
        for code in 2..6u16 {
            table[code as usize] = (((6 - code) * a0 + (code - 1) * a1) / 5) as u8;
        }
    }

    table
}

/// Decode one block into 16 row-major texels.
///
/// Layout: `alpha0: u8, alpha1: u8`, 48 bits of 3-bit alpha codes (low bits
/// first), then a DXT1-style color block.
pub fn decode_block(block: &[u8; BLOCK_SIZE], out: &mut [Texel; 16]) {
    let alphas = alpha_table(block[0], block[1]);
    let codes = LittleEndian::read_u64(&block[0..8]) >> 16;
    let c0 = LittleEndian::read_u16(&block[8..10]);
    let c1 = LittleEndian::read_u16(&block[10..12]);
    let indices = LittleEndian::read_u32(&block[12..16]);

    let table = color_table(c0, c1);
    for (i, texel) in out.iter_mut().enumerate() {
        let [r, g, b, _] = table[color_index(indices, i)];
        let code = ((codes >> (3 * i)) & 0x7) as usize;
        *texel = [r, g, b, alphas[code]];
    }
}
