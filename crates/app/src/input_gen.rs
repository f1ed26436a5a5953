//! Synthetic sample generation for testing.
//!
//! When no input file is given we generate pixel-like samples whose
//! compressibility varies across the array, so the statistics show something.
//!
//! # Design
//!
//! Samples come in bands of rows:
//! - Flat bands (one value), compress to about one bit per sample
//! - Gradients (values ramp across the row)
//! - Palette bands (a handful of values, like an indexed image)
//! - Noise (uniform over the whole width), close to incompressible

use std::io::Write;

use pixhuff_core::{Symbol, SymbolWidth};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Samples per band before the generator switches style.
const BAND_LEN: usize = 4096;

/// Generate `count` samples that fit `width`.
pub fn generate_samples(seed: u64, count: usize, width: SymbolWidth) -> Vec<Symbol> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max = width.max_symbol();
    let mut samples = Vec::with_capacity(count);

    while samples.len() < count {
        let band = (count - samples.len()).min(BAND_LEN);

        match rng.gen_range(0..10u8) {
            // 30% flat
            0..=2 => {
                let value = rng.gen_range(0..=max);
                samples.extend(std::iter::repeat(value).take(band));
            }

            // 30% gradient
            3..=5 => {
                let start = rng.gen_range(0..=max) as u32;
                let step = rng.gen_range(1..=4u32);
                let span = max as u32 + 1;
                samples.extend(
                    (0..band as u32).map(|i| ((start + i * step / 16) % span) as Symbol),
                );
            }

            // 20% palette
            6..=7 => {
                let palette = generate_palette(&mut rng, max);
                samples.extend((0..band).map(|_| palette[rng.gen_range(0..palette.len())]));
            }

            // 20% noise
            _ => {
                samples.extend((0..band).map(|_| rng.gen_range(0..=max)));
            }
        }
    }

    samples
}

/// Pick a small set of distinct-ish palette entries.
fn generate_palette(rng: &mut ChaCha8Rng, max: Symbol) -> Vec<Symbol> {
    let len = rng.gen_range(2..=16);
    (0..len).map(|_| rng.gen_range(0..=max)).collect()
}

/// Write generated samples to a raw file.
pub fn write_sample_file(
    path: &std::path::Path,
    seed: u64,
    count: usize,
    width: SymbolWidth,
) -> std::io::Result<()> {
    let samples = generate_samples(seed, count, width);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&crate::raw::samples_to_bytes(&samples, width))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_samples() {
        let samples = generate_samples(42, 1000, SymbolWidth::One);
        assert_eq!(samples.len(), 1000);
        assert!(samples.iter().all(|&s| s <= 255));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(
            generate_samples(12345, 20_000, SymbolWidth::Two),
            generate_samples(12345, 20_000, SymbolWidth::Two)
        );
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(
            generate_samples(1, 10_000, SymbolWidth::One),
            generate_samples(2, 10_000, SymbolWidth::One)
        );
    }

    #[test]
    fn test_various_sizes() {
        for size in [0, 1, 100, 4096, 4097, 50_000] {
            assert_eq!(generate_samples(999, size, SymbolWidth::One).len(), size);
        }
    }
}
