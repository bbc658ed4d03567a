//! DXT1 (BC1): RGB with optional 1-bit alpha, 8 bytes per block.

use byteorder::{ByteOrder, LittleEndian};

use super::color::{color_index, color_table, Texel};

/// Encoded size of one 4x4 block.
pub const BLOCK_SIZE: usize = 8;

/// Decode one block into 16 row-major texels.
///
/// Layout: `c0: u16, c1: u16, indices: u32`. Alpha comes only from the
/// transparent fourth slot of a three-color block.
pub fn decode_block(block: &[u8; BLOCK_SIZE], out: &mut [Texel; 16]) {
    let c0 = LittleEndian::read_u16(&block[0..2]);
    let c1 = LittleEndian::read_u16(&block[2..4]);
    let indices = LittleEndian::read_u32(&block[4..8]);

    let table = color_table(c0, c1);
    for (i, texel) in out.iter_mut().enumerate() {
        *texel = table[color_index(indices, i)];
    }
}
