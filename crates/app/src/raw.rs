//! Raw sample files: the simplest possible image adapter.
//!
//! A raw file is a headerless run of samples in row-major order, one byte per
//! sample for width 1 and two big-endian bytes per sample for width 2. The
//! shape travels separately (command line or container header).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pixhuff_core::{Symbol, SymbolWidth};

/// Split raw bytes into samples.
pub fn samples_from_bytes(bytes: &[u8], width: SymbolWidth) -> Result<Vec<Symbol>> {
    match width {
        SymbolWidth::One => Ok(bytes.iter().map(|&b| b as Symbol).collect()),
        SymbolWidth::Two => {
            if bytes.len() % 2 != 0 {
                bail!(
                    "{} bytes is not a whole number of 2-byte samples",
                    bytes.len()
                );
            }
            Ok(bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect())
        }
    }
}

/// Join samples back into raw bytes.
pub fn samples_to_bytes(samples: &[Symbol], width: SymbolWidth) -> Vec<u8> {
    match width {
        SymbolWidth::One => samples.iter().map(|&s| s as u8).collect(),
        SymbolWidth::Two => samples.iter().flat_map(|s| s.to_be_bytes()).collect(),
    }
}

pub fn read_samples(path: &Path, width: SymbolWidth) -> Result<Vec<Symbol>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    samples_from_bytes(&bytes, width).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_samples(path: &Path, samples: &[Symbol], width: SymbolWidth) -> Result<()> {
    fs::write(path, samples_to_bytes(samples, width))
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_byte_samples() {
        let samples = samples_from_bytes(&[0, 17, 255], SymbolWidth::One).unwrap();
        assert_eq!(samples, vec![0, 17, 255]);
        assert_eq!(samples_to_bytes(&samples, SymbolWidth::One), vec![0, 17, 255]);
    }

    #[test]
    fn test_two_byte_samples_are_big_endian() {
        let samples = samples_from_bytes(&[0x12, 0x34, 0xFF, 0x00], SymbolWidth::Two).unwrap();
        assert_eq!(samples, vec![0x1234, 0xFF00]);
        assert_eq!(
            samples_to_bytes(&samples, SymbolWidth::Two),
            vec![0x12, 0x34, 0xFF, 0x00]
        );
    }

    #[test]
    fn test_odd_length_rejected() {
        assert!(samples_from_bytes(&[1, 2, 3], SymbolWidth::Two).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("pixhuff-raw-{}.bin", std::process::id()));
        write_samples(&path, &[1, 500, 65_535], SymbolWidth::Two).unwrap();
        let samples = read_samples(&path, SymbolWidth::Two).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(samples, vec![1, 500, 65_535]);
    }
}
