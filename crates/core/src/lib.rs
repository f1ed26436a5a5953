//! pixhuff-core: lossless Huffman codec for fixed-width pixel samples
//!
//! This library turns a flattened sequence of 8- or 16-bit samples into a
//! self-describing binary container and back:
//! - Counts symbol frequencies and builds a Huffman tree with a fixed tie-break
//! - Assigns codes from leaf paths and packs them MSB-first behind a padding header
//! - Stores the tree in a portable pre-order encoding next to shape metadata
//! - Decodes by walking the tree, checking the result against the stored shape
//!
//! # Architecture
//!
//! - `bitio`: Low-level bit reading/writing
//! - `symbol`: Symbol type and declared symbol width
//! - `frequency`: Frequency analysis
//! - `tree`: Huffman tree construction
//! - `code_table`: Code assignment from leaf paths
//! - `packing`: Packed stream with padding header
//! - `decode`: Tree-walk decoder
//! - `tree_codec`: Tree serialization
//! - `container`: Container wire format
//! - `codec`: Encode/decode entry points
//! - `metrics`: Compression statistics
//!
//! # Example
//!
//! ```
//! use pixhuff_core::{codec, Shape, SymbolWidth};
//!
//! let pixels = vec![0u16, 0, 255, 0, 128, 0];
//! let bytes = codec::encode_to_bytes(&pixels, SymbolWidth::One, Shape::new(vec![2, 3]))?;
//! let decoded = codec::decode_bytes(&bytes)?;
//! assert_eq!(decoded.symbols, pixels);
//! assert_eq!(decoded.shape.dims(), &[2, 3]);
//! # Ok::<(), pixhuff_core::Error>(())
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: malformed containers come back as structured errors
//! - **Deterministic**: the same input always produces the same bytes
//! - **Quiet**: progress goes through `tracing`, never to stdout

pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod container;
pub mod decode;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod packing;
pub mod symbol;
pub mod tree;
pub mod tree_codec;

// Re-export commonly used types
pub use codec::Decoded;
pub use container::{Container, Shape};
pub use decode::DecodeWarning;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use symbol::{Symbol, SymbolWidth};
