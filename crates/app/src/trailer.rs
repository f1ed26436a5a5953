//! Image metadata stored in the container trailer.
//!
//! The codec keeps the trailer as opaque bytes. This adapter lays it out as
//! `[label length: u8][label][palette]`, where the palette runs to the end of
//! the trailer and holds RGB triplets (mode `P` images).

use anyhow::{bail, Context, Result};

/// Largest palette: 256 RGB entries.
pub const MAX_PALETTE_BYTES: usize = 256 * 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    /// Colour-mode label, e.g. `L`, `RGB`, `P`, `I;16`
    pub mode: String,
    pub palette: Option<Vec<u8>>,
}

impl ImageMeta {
    pub fn new(mode: String, palette: Option<Vec<u8>>) -> Result<Self> {
        if mode.len() > u8::MAX as usize {
            bail!("mode label is {} bytes, at most 255 fit", mode.len());
        }
        if let Some(palette) = &palette {
            check_palette(palette)?;
        }
        Ok(Self { mode, palette })
    }

    /// Whether decoding needs a palette that isn't there.
    pub fn missing_palette(&self) -> bool {
        self.mode == "P" && self.palette.is_none()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let palette = self.palette.as_deref().unwrap_or_default();
        let mut out = Vec::with_capacity(1 + self.mode.len() + palette.len());
        out.push(self.mode.len() as u8);
        out.extend_from_slice(self.mode.as_bytes());
        out.extend_from_slice(palette);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((&len, rest)) = bytes.split_first() else {
            bail!("empty trailer");
        };
        let len = len as usize;
        if rest.len() < len {
            bail!("trailer holds {} label bytes, header says {len}", rest.len());
        }
        let (label, palette) = rest.split_at(len);
        let mode = String::from_utf8(label.to_vec()).context("mode label is not UTF-8")?;
        let palette = if palette.is_empty() {
            None
        } else {
            check_palette(palette)?;
            Some(palette.to_vec())
        };
        Ok(Self { mode, palette })
    }
}

fn check_palette(palette: &[u8]) -> Result<()> {
    if palette.is_empty() || palette.len() % 3 != 0 || palette.len() > MAX_PALETTE_BYTES {
        bail!(
            "palette is {} bytes, expected 1 to 256 RGB triplets",
            palette.len()
        );
    }
    Ok(())
}
