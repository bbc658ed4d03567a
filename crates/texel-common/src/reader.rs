//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian data from a byte slice without copying, and [`ReadExt`],
//! which does the same for fixed-size structures on `std::io::Read` streams.

use std::io::{self, Read};

use zerocopy::FromBytes;

use crate::bits;
use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use texel_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_bits(32).unwrap(), 0x04030201);
/// assert_eq!(reader.read_bits(24).unwrap(), 0x070605);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read the low `width` bits of a little-endian integer.
    ///
    /// Only `ceil(width / 8)` bytes are consumed, so a 24-bit read advances by
    /// three bytes and never touches the fourth.
    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        if !(1..=64).contains(&width) {
            return Err(Error::InvalidBitWidth(width));
        }

        let count = bits::bytes_for_bits(width);
        if self.remaining() < count {
            return Err(Error::BufferTooShort {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }

        let bytes = self.read_bytes(count)?;
        let value = bytes
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

        Ok(value & bits::low_bits_mask(width))
    }
}

/// Largest buffer [`ReadExt::read_up_to`] reserves before reading.
pub const MAX_PREALLOC: usize = 1 << 20;

/// Trait for reading binary data from streams.
///
/// This extends `Read` with methods for reading fixed-size structures and
/// payloads of a known length.
pub trait ReadExt: Read {
    /// Read a structure from the stream.
    fn read_struct<T: FromBytes>(&mut self) -> io::Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        self.read_exact(&mut bytes)?;
        T::read_from_bytes(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", e)))
    }

    /// Read up to `len` bytes, stopping early at end of stream.
    ///
    /// Unlike `read_exact`, a short stream is not an error; the caller
    /// compares the returned length against what it asked for.
    ///
    /// At most [`MAX_PREALLOC`] bytes are reserved up front; the buffer grows
    /// only as data actually arrives.
    fn read_up_to(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOC));
        Read::take(&mut *self, len as u64).read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl<R: Read> ReadExt for R {}
