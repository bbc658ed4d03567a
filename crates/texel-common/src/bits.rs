//! Bit-field helpers for packed pixel layouts.
//!
//! Uncompressed DDS surfaces describe each channel by a bit mask into a
//! packed little-endian integer. Masks are arbitrary: they may be zero,
//! wider than eight bits, or not byte aligned.

/// Number of whole bytes needed to hold `width` bits.
#[inline]
pub const fn bytes_for_bits(width: u32) -> usize {
    ((width as usize) + 7) / 8
}

/// A mask with the low `width` bits set.
#[inline]
pub const fn low_bits_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Extract the bits selected by `mask`, shift them down to bit zero and
/// narrow to eight bits.
///
/// Channels wider than eight bits keep only their low eight bits, so 10- or
/// 16-bit channels lose precision. A zero mask yields zero.
#[inline]
pub fn extract_channel(value: u64, mask: u64) -> u8 {
    if mask == 0 {
        return 0;
    }
    ((value & mask) >> mask.trailing_zeros()) as u8
}
