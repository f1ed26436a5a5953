//! Container serialization and parsing.
//!
//! A container packages everything needed to decode one symbol sequence:
//! - Header: format version, symbol width, shape
//! - Serialized Huffman tree (omitted when the shape holds no elements)
//! - Optional adapter trailer (version 2 only), never interpreted here
//! - Packed payload
//!
//! # Container Format
//!
//! ```text
//! +----------------------+
//! | version (1)          |  1 = no trailer, 2 = trailer present
//! +----------------------+
//! | symbol_width (1)     |  bytes per symbol: 1 or 2
//! +----------------------+
//! | n_dims (1)           |  number of shape dimensions
//! +----------------------+
//! | dims (4 * n_dims)    |  u32 little-endian each
//! +----------------------+
//! | tree (variable)      |  see `tree_codec`; absent if element count is 0
//! +----------------------+
//! | trailer_len (4)      |  version 2 only, u32 little-endian
//! | trailer (variable)   |
//! +----------------------+
//! | pad (1)              |  padding bits in the last payload byte (0-7)
//! +----------------------+
//! | payload (variable)   |  runs to the end of the container
//! +----------------------+
//! ```
//!
//! There is no checksum. A damaged payload is caught only when the decoded
//! symbol count disagrees with the shape or the bits walk off the tree.

use std::fmt;
use std::io::{Read, Write};

use crate::error::{FormatError, HuffmanError, Result};
use crate::packing::PackedStream;
use crate::symbol::SymbolWidth;
use crate::tree::HuffmanTree;
use crate::tree_codec::{parse_tree, serialize_tree, serialized_len};

/// Version written when there is no adapter trailer.
pub const VERSION_BASE: u8 = 1;

/// Version written when an adapter trailer is present.
pub const VERSION_WITH_TRAILER: u8 = 2;

/// Most dimensions a shape may have (the count is stored in one byte).
pub const MAX_DIMS: usize = u8::MAX as usize;

/// Dimensions of the array the symbols were flattened from, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape(Vec<u32>);

impl Shape {
    pub fn new(dims: Vec<u32>) -> Self {
        Self(dims)
    }

    pub fn dims(&self) -> &[u32] {
        &self.0
    }

    /// Product of the dimensions. An empty shape describes no elements.
    ///
    /// # Errors
    /// `FormatError::ElementCountOverflow` if the product doesn't fit in u64.
    pub fn element_count(&self) -> Result<u64> {
        if self.0.is_empty() {
            return Ok(0);
        }
        self.0
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d as u64))
            .ok_or_else(|| FormatError::ElementCountOverflow.into())
    }
}

impl From<Vec<u32>> for Shape {
    fn from(dims: Vec<u32>) -> Self {
        Self(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("()");
        }
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("x")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// A parsed or freshly encoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    symbol_width: SymbolWidth,
    shape: Shape,
    tree: Option<HuffmanTree>,
    payload: PackedStream,
    trailer: Option<Vec<u8>>,
}

impl Container {
    /// `tree` must be present exactly when `shape` holds elements.
    pub(crate) fn new(
        symbol_width: SymbolWidth,
        shape: Shape,
        tree: Option<HuffmanTree>,
        payload: PackedStream,
    ) -> Self {
        Self {
            symbol_width,
            shape,
            tree,
            payload,
            trailer: None,
        }
    }

    /// Attach adapter-owned metadata. The codec stores it verbatim.
    pub fn with_trailer(mut self, trailer: Vec<u8>) -> Self {
        self.trailer = Some(trailer);
        self
    }

    pub fn symbol_width(&self) -> SymbolWidth {
        self.symbol_width
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn payload(&self) -> &PackedStream {
        &self.payload
    }

    pub fn trailer(&self) -> Option<&[u8]> {
        self.trailer.as_deref()
    }

    /// Bytes the serialized tree occupies in [`Container::to_bytes`] output.
    pub fn tree_len(&self) -> usize {
        self.tree
            .as_ref()
            .map_or(0, |tree| serialized_len(tree, self.symbol_width))
    }

    pub fn version(&self) -> u8 {
        if self.trailer.is_some() {
            VERSION_WITH_TRAILER
        } else {
            VERSION_BASE
        }
    }

    /// Serialize into the wire format.
    ///
    /// # Errors
    /// - `HuffmanError::TooManyDimensions` if the shape has over 255 dims
    /// - `HuffmanError::TrailerTooLong` if the trailer exceeds `u32::MAX` bytes
    /// - tree serialization errors
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let dims = self.shape.dims();
        if dims.len() > MAX_DIMS {
            return Err(HuffmanError::TooManyDimensions { dims: dims.len() }.into());
        }

        let tree_bytes = match &self.tree {
            Some(tree) => serialize_tree(tree, self.symbol_width)?,
            None => Vec::new(),
        };
        let trailer_len = self.trailer.as_ref().map_or(0, |t| 4 + t.len());

        let mut out = Vec::with_capacity(
            3 + 4 * dims.len() + tree_bytes.len() + trailer_len + self.payload.len(),
        );
        out.push(self.version());
        out.push(self.symbol_width.bytes());
        out.push(dims.len() as u8);
        for d in dims {
            out.extend_from_slice(&d.to_le_bytes());
        }
        out.extend_from_slice(&tree_bytes);
        if let Some(trailer) = &self.trailer {
            let len = u32::try_from(trailer.len())
                .map_err(|_| HuffmanError::TrailerTooLong { len: trailer.len() })?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(trailer);
        }
        out.extend_from_slice(self.payload.as_bytes());

        tracing::debug!(
            version = self.version(),
            tree_bytes = tree_bytes.len(),
            payload_bytes = self.payload.len(),
            total = out.len(),
            "wrote container"
        );
        Ok(out)
    }

    /// Serialize and write to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Parse a container from its wire format.
    ///
    /// # Errors
    /// - `FormatError::Truncated` on any short read
    /// - `FormatError::UnsupportedVersion` for a version other than 1 or 2
    /// - `FormatError::InvalidSymbolWidth` for a width other than 1 or 2
    /// - tree and padding errors from the nested sections
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut input = ByteReader::new(bytes);

        let version = input.u8("version")?;
        if version != VERSION_BASE && version != VERSION_WITH_TRAILER {
            return Err(FormatError::UnsupportedVersion(version).into());
        }
        let symbol_width = SymbolWidth::from_byte(input.u8("symbol width")?)?;

        let n_dims = input.u8("dimension count")? as usize;
        let mut dims = Vec::with_capacity(n_dims);
        for _ in 0..n_dims {
            dims.push(input.u32_le("shape")?);
        }
        let shape = Shape::new(dims);

        let tree = if shape.element_count()? > 0 {
            let (tree, consumed) = parse_tree(input.remaining(), symbol_width)?;
            input.skip(consumed);
            Some(tree)
        } else {
            None
        };

        let trailer = if version == VERSION_WITH_TRAILER {
            let len = input.u32_le("trailer length")? as usize;
            Some(input.take(len, "trailer")?.to_vec())
        } else {
            None
        };

        let payload = PackedStream::from_bytes(input.remaining().to_vec())?;

        tracing::debug!(
            version,
            width = symbol_width.bytes(),
            %shape,
            payload_bytes = payload.len(),
            "parsed container"
        );
        Ok(Self {
            symbol_width,
            shape,
            tree,
            payload,
            trailer,
        })
    }

    /// Read `reader` to the end and parse it.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}

/// Sequential reader over a byte slice that reports short reads per section.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8]> {
        let available = self.bytes.len() - self.pos;
        if len > available {
            return Err(FormatError::Truncated {
                section,
                needed: len,
                available,
            }
            .into());
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u8(&mut self, section: &'static str) -> Result<u8> {
        Ok(self.take(1, section)?[0])
    }

    fn u32_le(&mut self, section: &'static str) -> Result<u32> {
        let b = self.take(4, section)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn skip(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.bytes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::CodeTable;
    use crate::error::Error;
    use crate::frequency::FrequencyTable;
    use crate::packing::pack;
    use crate::symbol::Symbol;

    fn container_for(data: &[Symbol], width: SymbolWidth, dims: Vec<u32>) -> Container {
        let tree = HuffmanTree::build(&FrequencyTable::from_symbols(data)).unwrap();
        let payload = pack(data, &CodeTable::from_tree(&tree).unwrap()).unwrap();
        Container::new(width, Shape::new(dims), Some(tree), payload)
    }

    #[test]
    fn test_single_symbol_bytes() {
        let container = container_for(&[7, 7, 7, 7], SymbolWidth::One, vec![4]);
        let bytes = container.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                1, 1, // version, width
                1, 4, 0, 0, 0, // one dimension: 4
                0b1000_0011, 0b1000_0000, // tree: leaf 7
                4, 0, // pad 4, "0000" + padding
            ]
        );
        assert_eq!(Container::from_bytes(&bytes).unwrap(), {
            // parsed trees carry no weights
            let (tree, _) = parse_tree(&[0b1000_0011, 0b1000_0000], SymbolWidth::One).unwrap();
            Container::new(
                SymbolWidth::One,
                Shape::new(vec![4]),
                Some(tree),
                container.payload().clone(),
            )
        });
    }

    #[test]
    fn test_empty_container_bytes() {
        let container = Container::new(
            SymbolWidth::Two,
            Shape::new(vec![0, 3]),
            None,
            PackedStream::from_bytes(vec![0]).unwrap(),
        );
        let bytes = container.to_bytes().unwrap();
        assert_eq!(bytes, vec![1, 2, 2, 0, 0, 0, 0, 3, 0, 0, 0, 0]);

        let parsed = Container::from_bytes(&bytes).unwrap();
        assert!(parsed.tree().is_none());
        assert_eq!(parsed.shape().dims(), &[0, 3]);
        assert_eq!(parsed.payload().logical_bit_len(), 0);
    }

    #[test]
    fn test_trailer_bumps_version() {
        let container = container_for(&[1, 2, 2, 3], SymbolWidth::One, vec![2, 2])
            .with_trailer(b"mode=P".to_vec());
        let bytes = container.to_bytes().unwrap();
        assert_eq!(bytes[0], VERSION_WITH_TRAILER);

        let parsed = Container::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.trailer(), Some(&b"mode=P"[..]));
        assert_eq!(parsed.payload(), container.payload());
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = container_for(&[1, 2], SymbolWidth::One, vec![2])
            .to_bytes()
            .unwrap();
        bytes[0] = 9;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(Error::Format(FormatError::UnsupportedVersion(9)))
        ));
    }

    #[test]
    fn test_invalid_width() {
        let bytes = [1, 4, 0, 0];
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(Error::Format(FormatError::InvalidSymbolWidth(4)))
        ));
    }

    #[test]
    fn test_short_reads() {
        let bytes = container_for(&[5, 6, 7, 5], SymbolWidth::Two, vec![2, 2])
            .to_bytes()
            .unwrap();
        // Every strict prefix up to the end of the tree must fail cleanly
        for len in 0..bytes.len() - 2 {
            let result = Container::from_bytes(&bytes[..len]);
            assert!(
                matches!(result, Err(Error::Format(_))),
                "prefix of {len} bytes parsed: {result:?}"
            );
        }
    }

    #[test]
    fn test_short_reads_with_trailer() {
        let container = container_for(&[5, 6, 5], SymbolWidth::One, vec![3])
            .with_trailer(b"RGB;palette".to_vec());
        let bytes = container.to_bytes().unwrap();
        let payload_start = bytes.len() - container.payload().len();

        // Cuts inside the trailer length, the trailer body, and right before the pad byte
        for len in 0..=payload_start {
            let result = Container::from_bytes(&bytes[..len]);
            assert!(
                matches!(result, Err(Error::Format(_))),
                "prefix of {len} bytes parsed: {result:?}"
            );
        }
        let tree_end = 3 + 4 + container.tree_len();
        assert!(matches!(
            Container::from_bytes(&bytes[..tree_end + 2]),
            Err(Error::Format(FormatError::Truncated {
                section: "trailer length",
                ..
            }))
        ));
        assert!(matches!(
            Container::from_bytes(&bytes[..tree_end + 4 + 5]),
            Err(Error::Format(FormatError::Truncated {
                section: "trailer",
                needed: 11,
                available: 5,
            }))
        ));
    }

    #[test]
    fn test_tree_len() {
        let container = container_for(&[1, 2, 2, 3], SymbolWidth::Two, vec![4]);
        let header = 3 + 4;
        let bytes = container.to_bytes().unwrap();
        assert_eq!(
            container.tree_len(),
            bytes.len() - header - container.payload().len()
        );
        let empty = Container::new(
            SymbolWidth::One,
            Shape::default(),
            None,
            PackedStream::from_bytes(vec![0]).unwrap(),
        );
        assert_eq!(empty.tree_len(), 0);
    }

    #[test]
    fn test_shape_helpers() {
        assert_eq!(Shape::new(vec![480, 640, 3]).element_count().unwrap(), 921_600);
        assert_eq!(Shape::new(vec![]).element_count().unwrap(), 0);
        assert_eq!(Shape::new(vec![5, 0]).element_count().unwrap(), 0);
        assert_eq!(Shape::new(vec![480, 640, 3]).to_string(), "480x640x3");
        assert_eq!(Shape::default().to_string(), "()");
        assert!(Shape::new(vec![u32::MAX; 3]).element_count().is_err());
    }
}
