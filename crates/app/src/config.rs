//! Command-line configuration for the pixhuff tool.
//!
//! Every subcommand works with only its file arguments; widths default to one
//! byte, shapes to a flat list of all samples, and seeds to the clock. The
//! resolved seed is always printed so runs can be reproduced.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pixhuff_core::{Shape, SymbolWidth};

#[derive(Debug, Parser)]
#[command(
    name = "pixhuff",
    version,
    about = "Lossless Huffman compression for raw pixel samples"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a raw sample file into a container
    Encode(EncodeArgs),
    /// Restore a raw sample file from a container
    Decode(DecodeArgs),
    /// Report per-sample differences between two raw sample files
    Compare(CompareArgs),
    /// Write seeded synthetic samples to a raw file
    Generate(GenerateArgs),
    /// Encode and decode in memory, verify, and print statistics
    Roundtrip(RoundtripArgs),
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Raw sample file (1 byte per sample, or 2 bytes big-endian)
    pub input: PathBuf,

    /// Container file to write
    pub output: PathBuf,

    /// Bytes per sample
    #[arg(long, default_value = "1", value_parser = parse_width)]
    pub width: SymbolWidth,

    /// Array shape, e.g. 480x640x3 (default: one flat dimension)
    #[arg(long, value_parser = parse_shape)]
    pub shape: Option<Shape>,

    /// Colour-mode label stored in the container trailer (e.g. L, RGB, P)
    #[arg(long)]
    pub mode: Option<String>,

    /// Raw RGB palette file (3 bytes per entry) stored after the mode; implies --mode P
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Print compression statistics
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Container file to read
    pub input: PathBuf,

    /// Raw sample file to write
    pub output: PathBuf,

    /// Write the stored palette, if any, to this file
    #[arg(long)]
    pub palette: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    pub left: PathBuf,

    pub right: PathBuf,

    /// Bytes per sample in both files
    #[arg(long, default_value = "1", value_parser = parse_width)]
    pub width: SymbolWidth,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Raw sample file to write
    pub output: PathBuf,

    /// Bytes per sample
    #[arg(long, default_value = "1", value_parser = parse_width)]
    pub width: SymbolWidth,

    /// Array shape; its element count is the number of samples
    #[arg(long, default_value = "256x256", value_parser = parse_shape)]
    pub shape: Shape,

    /// Random seed for determinism (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RoundtripArgs {
    /// Raw sample file to use instead of generated samples
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// Bytes per sample
    #[arg(long, default_value = "1", value_parser = parse_width)]
    pub width: SymbolWidth,

    /// Array shape (generated: default 256x256; input: one flat dimension)
    #[arg(long, value_parser = parse_shape)]
    pub shape: Option<Shape>,

    /// Random seed for generated samples (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print metrics as key=value lines instead of the summary
    #[arg(long)]
    pub export: bool,
}

/// Parse a sample width of `1` or `2` bytes.
pub fn parse_width(s: &str) -> Result<SymbolWidth, String> {
    match s.trim() {
        "1" => Ok(SymbolWidth::One),
        "2" => Ok(SymbolWidth::Two),
        other => Err(format!("width must be 1 or 2, got {other:?}")),
    }
}

/// Parse a shape like `480x640x3` (commas also accepted).
pub fn parse_shape(s: &str) -> Result<Shape, String> {
    let dims = s
        .split(['x', 'X', ','])
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid dimension {part:?} in shape {s:?}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if dims.len() > pixhuff_core::container::MAX_DIMS {
        return Err(format!("shape {s:?} has more than 255 dimensions"));
    }
    Ok(Shape::new(dims))
}

/// Use the given seed, or derive one from the clock.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("480x640x3", &[480, 640, 3] ; "x separated")]
    #[test_case("16,16", &[16, 16] ; "comma separated")]
    #[test_case(" 7 ", &[7] ; "single with spaces")]
    fn test_parse_shape(input: &str, dims: &[u32]) {
        assert_eq!(parse_shape(input).unwrap().dims(), dims);
    }

    #[test_case("" ; "empty")]
    #[test_case("4x" ; "trailing separator")]
    #[test_case("-1x4" ; "negative")]
    fn test_parse_shape_rejects(input: &str) {
        assert!(parse_shape(input).is_err());
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("1").unwrap(), SymbolWidth::One);
        assert_eq!(parse_width("2").unwrap(), SymbolWidth::Two);
        assert!(parse_width("3").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pixhuff", "generate", "out.raw"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.width, SymbolWidth::One);
                assert_eq!(args.shape.dims(), &[256, 256]);
                assert_eq!(args.seed, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_encode_flags() {
        let cli = Cli::try_parse_from([
            "pixhuff", "-vv", "encode", "in.raw", "out.phf", "--width", "2", "--shape", "4x4",
            "--mode", "I;16",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.width, SymbolWidth::Two);
                assert_eq!(args.shape.unwrap().dims(), &[4, 4]);
                assert_eq!(args.mode.as_deref(), Some("I;16"));
                assert_eq!(args.palette, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_palette_flags() {
        let cli =
            Cli::try_parse_from(["pixhuff", "decode", "in.phf", "out.raw", "--palette", "p.pal"])
                .unwrap();
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.palette, Some(PathBuf::from("p.pal")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resolve_seed() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }
}
