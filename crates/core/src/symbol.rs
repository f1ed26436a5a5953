//! Symbol values and their declared width.

use crate::error::{FormatError, HuffmanError, Result};

/// A pixel sample as the codec sees it: an opaque unsigned value.
pub type Symbol = u16;

/// Bytes per symbol. Always given explicitly by the caller, never inferred
/// from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolWidth {
    /// 8-bit samples (grayscale, palette indices, RGB channels)
    One = 1,
    /// 16-bit samples
    Two = 2,
}

impl SymbolWidth {
    /// Parse the width byte stored in a container.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(SymbolWidth::One),
            2 => Ok(SymbolWidth::Two),
            other => Err(FormatError::InvalidSymbolWidth(other).into()),
        }
    }

    pub fn bytes(self) -> u8 {
        self as u8
    }

    pub fn bits(self) -> usize {
        self.bytes() as usize * 8
    }

    pub fn max_symbol(self) -> Symbol {
        match self {
            SymbolWidth::One => u8::MAX as Symbol,
            SymbolWidth::Two => u16::MAX,
        }
    }

    /// Reject the first symbol that does not fit this width.
    pub fn check_all(self, symbols: &[Symbol]) -> Result<()> {
        let max = self.max_symbol();
        match symbols.iter().find(|&&s| s > max) {
            Some(&symbol) => Err(HuffmanError::SymbolOutOfRange {
                symbol,
                width_bytes: self.bytes(),
            }
            .into()),
            None => Ok(()),
        }
    }
}
