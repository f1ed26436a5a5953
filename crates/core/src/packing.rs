//! Bit packing of the encoded symbol stream.
//!
//! # Stream Format
//!
//! ```text
//! +-----------------+----------------------------------------+
//! | pad (1 byte)    | payload: logical bits + `pad` zero bits |
//! +-----------------+----------------------------------------+
//! ```
//!
//! `pad = (8 - L mod 8) mod 8` for a logical stream of `L` bits, so the
//! payload always ends on a byte boundary and `pad` is never 8. An empty
//! logical stream packs to the single byte `0x00`.

use crate::bitio::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{FormatError, HuffmanError, Result};
use crate::symbol::Symbol;

/// A padding header byte followed by the byte-aligned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedStream {
    bytes: Vec<u8>,
}

impl PackedStream {
    /// Validate raw stream bytes read from a container.
    ///
    /// # Errors
    /// - `FormatError::Truncated` if the padding header is missing
    /// - `FormatError::InvalidPadding` if `pad > 7` or the payload has fewer
    ///   than `pad` bits
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let Some(&pad) = bytes.first() else {
            return Err(FormatError::Truncated {
                section: "padding header",
                needed: 1,
                available: 0,
            }
            .into());
        };
        let available = (bytes.len() - 1) * 8;
        if pad > 7 || (pad as usize) > available {
            return Err(FormatError::InvalidPadding { pad, available }.into());
        }
        Ok(Self { bytes })
    }

    pub fn pad(&self) -> u8 {
        self.bytes[0]
    }

    /// Payload bytes after the padding header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Number of meaningful bits in the payload.
    pub fn logical_bit_len(&self) -> usize {
        self.payload().len() * 8 - self.pad() as usize
    }

    /// Header byte and payload, as stored in a container.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a stream holds at least its padding header.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the logical bits, padding excluded.
    pub fn bits(&self) -> BitUnpacker<'_> {
        BitUnpacker {
            reader: BitReader::new(self.payload()),
            remaining: self.logical_bit_len(),
        }
    }
}

/// Iterator over the logical bits of a [`PackedStream`].
#[derive(Debug, Clone)]
pub struct BitUnpacker<'a> {
    reader: BitReader<'a>,
    remaining: usize,
}

impl Iterator for BitUnpacker<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.reader.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BitUnpacker<'_> {}

/// Map every symbol to its code and pack the result.
///
/// # Errors
/// `HuffmanError::SymbolNotInTable` for the first symbol without a code.
pub fn pack(symbols: &[Symbol], table: &CodeTable) -> Result<PackedStream> {
    let bit_len = table.encoded_bit_len(symbols)?;
    let mut writer = BitWriter::with_capacity(1 + bit_len.div_ceil(8) as usize);
    writer.write_bits(0, 8)?;

    for &symbol in symbols {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::SymbolNotInTable { symbol })?;
        writer.write_bits(code.bits(), code.len())?;
    }

    let pad = writer.padding_needed();
    let mut bytes = writer.finish();
    bytes[0] = pad;

    tracing::debug!(logical_bits = bit_len, pad, bytes = bytes.len(), "packed payload");
    Ok(PackedStream { bytes })
}
