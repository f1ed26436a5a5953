//! Compression statistics for one encode/decode run.
//!
//! Single-threaded: the caller records each stage explicitly. Nothing here
//! prints; use the `Display` impl for a human-readable summary or
//! [`Metrics::export_text`] for `key=value` lines.

use std::fmt;
use std::time::{Duration, Instant};

use crate::codec::Decoded;
use crate::container::Container;
use crate::symbol::Symbol;

#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Input ===
    /// Symbols handed to the encoder
    pub input_symbols: u64,

    /// Bytes per symbol
    pub symbol_width: u8,

    /// Distinct symbols (tree leaves)
    pub distinct_symbols: u64,

    // === Container ===
    /// Serialized container size
    pub container_bytes: u64,

    /// Serialized tree size
    pub tree_bytes: u64,

    /// Meaningful payload bits, padding excluded
    pub payload_bits: u64,

    /// Padding bits in the last payload byte
    pub pad_bits: u64,

    // === Decoding ===
    pub decoded_symbols: u64,

    /// Decodes that ended inside a code
    pub truncation_warnings: u64,

    /// Whether the decoded symbols equal the encoded ones, once checked
    pub symbols_match: Option<bool>,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_symbols: 0,
            symbol_width: 0,
            distinct_symbols: 0,
            container_bytes: 0,
            tree_bytes: 0,
            payload_bits: 0,
            pad_bits: 0,
            decoded_symbols: 0,
            truncation_warnings: 0,
            symbols_match: None,
        }
    }

    /// Record an encode whose serialized form is `container_bytes` long.
    pub fn record_encode(
        &mut self,
        input_symbols: usize,
        container: &Container,
        container_bytes: usize,
    ) {
        let payload = container.payload();

        self.input_symbols = input_symbols as u64;
        self.symbol_width = container.symbol_width().bytes();
        self.distinct_symbols = container.tree().map_or(0, |t| t.leaf_count()) as u64;
        self.container_bytes = container_bytes as u64;
        self.tree_bytes = container.tree_len() as u64;
        self.payload_bits = payload.logical_bit_len() as u64;
        self.pad_bits = payload.pad() as u64;
    }

    /// Record a decode and check it against the symbols that were encoded.
    pub fn record_decode(&mut self, decoded: &Decoded, original: &[Symbol]) {
        self.decoded_symbols = decoded.symbols.len() as u64;
        self.symbols_match = Some(decoded.symbols == original);
        if decoded.warning.is_some() {
            self.truncation_warnings += 1;
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Size of the uncompressed samples.
    pub fn raw_bytes(&self) -> u64 {
        self.input_symbols * self.symbol_width as u64
    }

    /// Container size over raw size. Returns 0.0 if nothing was encoded.
    pub fn compression_ratio(&self) -> f64 {
        let raw = self.raw_bytes();
        if raw == 0 {
            0.0
        } else {
            self.container_bytes as f64 / raw as f64
        }
    }

    /// Percentage of raw bytes saved (negative when the container is larger).
    pub fn space_saving(&self) -> f64 {
        if self.raw_bytes() == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }

    /// Average code length over the input.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.input_symbols as f64
        }
    }

    /// Raw bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.raw_bytes() as f64 / secs
        }
    }

    /// Whether the decode reproduced the input exactly.
    ///
    /// False until [`Metrics::record_decode`] has run.
    pub fn verified(&self) -> bool {
        self.symbols_match == Some(true)
    }

    /// Export metrics as `key=value` lines.
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_symbols={}\n\
             symbol_width={}\n\
             raw_bytes={}\n\
             distinct_symbols={}\n\
             container_bytes={}\n\
             tree_bytes={}\n\
             payload_bits={}\n\
             pad_bits={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n\
             decoded_symbols={}\n\
             truncation_warnings={}\n",
            self.duration().as_millis(),
            self.input_symbols,
            self.symbol_width,
            self.raw_bytes(),
            self.distinct_symbols,
            self.container_bytes,
            self.tree_bytes,
            self.payload_bits,
            self.pad_bits,
            self.compression_ratio(),
            self.bits_per_symbol(),
            self.decoded_symbols,
            self.truncation_warnings,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Compression Summary ===")?;
        writeln!(f, "Duration: {} ms", self.duration().as_millis())?;
        writeln!(f)?;
        writeln!(
            f,
            "Input:     {} symbols x {} byte(s) = {} bytes",
            self.input_symbols,
            self.symbol_width,
            self.raw_bytes()
        )?;
        writeln!(f, "Distinct:  {} symbols", self.distinct_symbols)?;
        writeln!(f, "Container: {} bytes (tree {} bytes)", self.container_bytes, self.tree_bytes)?;
        writeln!(
            f,
            "Payload:   {} bits + {} padding ({:.3} bits/symbol)",
            self.payload_bits,
            self.pad_bits,
            self.bits_per_symbol()
        )?;
        writeln!(
            f,
            "Ratio:     {:.4} ({:.2}% saved)",
            self.compression_ratio(),
            self.space_saving()
        )?;
        writeln!(f)?;
        match self.symbols_match {
            Some(true) => writeln!(f, "Verification: PASSED ({} symbols)", self.decoded_symbols)?,
            Some(false) => writeln!(
                f,
                "Verification: FAILED ({} in, {} out)",
                self.input_symbols, self.decoded_symbols
            )?,
            None => writeln!(f, "Verification: not run")?,
        }
        if self.truncation_warnings > 0 {
            writeln!(f, "Truncation warnings: {}", self.truncation_warnings)?;
        }
        write!(f, "Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0)
    }
}
