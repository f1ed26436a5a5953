//! MSB-first bit I/O over byte buffers.
//!
//! Both the payload packer and the tree serializer go through these two types,
//! so every bit that ends up in a container is written in the same order: the
//! first bit written lands in the most significant bit of the first byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zeros
//! - BitReader: cannot tell padding from data; callers bound how much they read
//!
//! # Example
//! ```
//! use pixhuff_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bit(true);
//! // 1011 -> padded to 10110000
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.read_bit().unwrap());
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a growable byte buffer.
///
/// # Invariants
/// - `pending` holds the `pending_len` most recent bits, left-aligned
/// - `pending_len` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    pending: u8,
    pending_len: u8,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            pending: 0,
            pending_len: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.pending |= (bit as u8) << (7 - self.pending_len);
        self.pending_len += 1;
        if self.pending_len == 8 {
            self.bytes.push(self.pending);
            self.pending = 0;
            self.pending_len = 0;
        }
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.pending_len as usize;
            let take = remaining.min(free);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.pending |= chunk << (free - take);
            self.pending_len += take as u8;
            if self.pending_len == 8 {
                self.bytes.push(self.pending);
                self.pending = 0;
                self.pending_len = 0;
            }

            remaining -= take;
        }

        Ok(())
    }

    /// Total number of bits written so far, including the partial byte.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending_len as usize
    }

    /// Number of zero bits `finish` will append to reach a byte boundary.
    pub fn padding_needed(&self) -> u8 {
        (8 - self.pending_len) % 8
    }

    /// Flush the partial byte (zero padded) and return the output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_len > 0 {
            self.bytes.push(self.pending);
        }
        self.bytes
    }
}

/// Reads bits MSB-first from a borrowed byte buffer.
///
/// # Invariants
/// - `position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Ok(bit)
    }

    /// Read `count` bits (at most 64) into the low bits of a u64.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if fewer than `count` bits remain; the
    ///   reader does not move in that case
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        let mut remaining = count;
        while remaining > 0 {
            let offset = self.position % 8;
            let avail = 8 - offset;
            let take = remaining.min(avail);
            let byte = self.data[self.position / 8];
            let chunk = (byte >> (avail - take)) & (((1u16 << take) - 1) as u8);

            value = (value << take) | chunk as u64;
            self.position += take;
            remaining -= take;
        }

        Ok(value)
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Current bit position from the start of the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whole bytes touched so far, counting a partially read byte as consumed.
    pub fn bytes_consumed(&self) -> usize {
        self.position.div_ceil(8)
    }
}
