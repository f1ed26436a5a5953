//! Error types for the pixhuff codec.
//!
//! Encode and decode never panic on bad input; every failure is returned as a
//! structured error. Non-fatal conditions (empty input, a stream that ends in
//! the middle of a code) are not errors: the first is logged, the second is
//! reported as a [`crate::decode::DecodeWarning`] next to the decoded symbols.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: encode-time preconditions and code construction
/// - Format: corrupt, truncated or unsupported container on decode
/// - Count mismatch: decoded element count disagrees with the stored shape
/// - I/O: reading or writing container files
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., symbol missing from the code table)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Container or payload is malformed
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Decoded symbol count doesn't match the element count of the stored shape
    #[error("decoded {actual} symbols, shape expects {expected}")]
    CountMismatch { expected: u64, actual: u64 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Encode-side errors: violated preconditions and code construction failures.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// The encoder met a symbol that has no code. The code table is built from
    /// the same input, so this means the caller paired the wrong table.
    #[error("symbol {symbol} has no entry in the code table")]
    SymbolNotInTable { symbol: u16 },

    /// Symbol does not fit the declared symbol width
    #[error("symbol {symbol} does not fit in {width_bytes} byte(s)")]
    SymbolOutOfRange { symbol: u16, width_bytes: u8 },

    /// Number of symbols doesn't match the product of the shape dimensions
    #[error("shape describes {elements} elements but {symbols} symbols were given")]
    ShapeMismatch { elements: u64, symbols: u64 },

    /// Shape has more dimensions than the container can store
    #[error("shape has {dims} dimensions, at most 255 are supported")]
    TooManyDimensions { dims: usize },

    /// Adapter trailer is larger than its u32 length field
    #[error("trailer of {len} bytes exceeds the u32 length field")]
    TrailerTooLong { len: usize },

    /// An internal node other than the root lacks its right child
    #[error("internal node below the root has no right child")]
    IncompleteTree,

    /// Code length exceeds the 64-bit limit of the bit writer
    #[error("code length {length} exceeds maximum 64")]
    CodeLengthTooLong { length: usize },
}

/// Decode-side structural errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input ended before a section was complete
    #[error("truncated {section}: need {needed} bytes, {available} available")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    /// Version byte is not one this reader understands
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// Symbol width byte outside {1, 2}
    #[error("invalid symbol width {0}, expected 1 or 2")]
    InvalidSymbolWidth(u8),

    /// Padding header is out of range or longer than the payload
    #[error("invalid padding {pad} for {available} payload bits")]
    InvalidPadding { pad: u8, available: usize },

    /// A bit led to a child the tree does not have
    #[error("bit at position {position} leads to a missing child")]
    MissingChild { position: usize },

    /// Payload carries bits but the container has no tree
    #[error("payload has {bits} bits but the container holds no tree")]
    MissingTree { bits: usize },

    /// Serialized tree nests deeper than any valid code
    #[error("serialized tree deeper than {max} levels")]
    TreeTooDeep { max: usize },

    /// Serialized tree holds the same symbol at two leaves
    #[error("symbol {symbol} appears at more than one leaf")]
    DuplicateLeaf { symbol: u16 },

    /// Product of the shape dimensions doesn't fit in u64
    #[error("shape element count overflows")]
    ElementCountOverflow,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
