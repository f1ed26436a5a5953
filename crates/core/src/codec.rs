//! Encode/decode entry points for adapters.
//!
//! These functions are the whole public surface an image adapter needs: hand
//! in a flattened symbol sequence with its width and shape, get a
//! [`Container`] back; hand in a container, get the sequence and shape back.
//!
//! Status is reported through `tracing` events. Whoever installs the
//! subscriber decides where they go.

use crate::code_table::CodeTable;
use crate::container::{Container, Shape, MAX_DIMS};
use crate::decode::{decode_stream, DecodeWarning};
use crate::error::{Error, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::packing::pack;
use crate::symbol::{Symbol, SymbolWidth};
use crate::tree::HuffmanTree;

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Symbols in the order they were encoded (row-major for images)
    pub symbols: Vec<Symbol>,
    pub shape: Shape,
    pub symbol_width: SymbolWidth,
    /// Adapter trailer, if the container carried one
    pub trailer: Option<Vec<u8>>,
    pub warning: Option<DecodeWarning>,
}

/// Compress `symbols` into a container.
///
/// Zero-length input is valid: the container has no tree and a payload of
/// just the padding header.
///
/// # Errors
/// - `HuffmanError::ShapeMismatch` if the shape doesn't describe `symbols.len()` elements
/// - `HuffmanError::TooManyDimensions` if the shape has over 255 dimensions
/// - `HuffmanError::SymbolOutOfRange` if a symbol doesn't fit `width`
#[tracing::instrument(skip_all, fields(symbols = symbols.len(), width = width.bytes(), %shape))]
pub fn encode(symbols: &[Symbol], width: SymbolWidth, shape: Shape) -> Result<Container> {
    if shape.dims().len() > MAX_DIMS {
        return Err(HuffmanError::TooManyDimensions {
            dims: shape.dims().len(),
        }
        .into());
    }
    let elements = shape.element_count()?;
    if elements != symbols.len() as u64 {
        return Err(HuffmanError::ShapeMismatch {
            elements,
            symbols: symbols.len() as u64,
        }
        .into());
    }
    width.check_all(symbols)?;

    if symbols.is_empty() {
        tracing::info!("empty input, writing a container without tree or payload");
        let payload = pack(&[], &CodeTable::default())?;
        return Ok(Container::new(width, shape, None, payload));
    }

    let freqs = FrequencyTable::from_symbols(symbols);
    let tree = HuffmanTree::build(&freqs)?;
    let table = CodeTable::from_tree(&tree)?;
    let payload = pack(symbols, &table)?;

    tracing::debug!(
        distinct_symbols = table.len(),
        max_code_len = tree.depth(),
        payload_bits = payload.logical_bit_len(),
        "encoded symbols"
    );
    Ok(Container::new(width, shape, Some(tree), payload))
}

/// Compress and serialize in one step.
pub fn encode_to_bytes(symbols: &[Symbol], width: SymbolWidth, shape: Shape) -> Result<Vec<u8>> {
    encode(symbols, width, shape)?.to_bytes()
}

/// Recover the symbol sequence stored in `container`.
///
/// # Errors
/// - format errors from the payload walk
/// - `Error::CountMismatch` if the number of decoded symbols differs from the
///   element count of the stored shape
#[tracing::instrument(skip_all, fields(shape = %container.shape()))]
pub fn decode(container: &Container) -> Result<Decoded> {
    let expected = container.shape().element_count()?;
    let hint = usize::try_from(expected).unwrap_or(usize::MAX);
    let stream = decode_stream(container.payload(), container.tree(), hint)?;

    let actual = stream.symbols.len() as u64;
    if actual != expected {
        tracing::warn!(expected, actual, "decoded count disagrees with shape");
        return Err(Error::CountMismatch { expected, actual });
    }

    tracing::debug!(symbols = actual, "decoded container");
    Ok(Decoded {
        symbols: stream.symbols,
        shape: container.shape().clone(),
        symbol_width: container.symbol_width(),
        trailer: container.trailer().map(<[u8]>::to_vec),
        warning: stream.warning,
    })
}

/// Parse and decode in one step.
pub fn decode_bytes(bytes: &[u8]) -> Result<Decoded> {
    decode(&Container::from_bytes(bytes)?)
}
