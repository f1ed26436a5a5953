//! pixhuff: command-line front-end for the pixhuff codec.
//!
//! Encodes raw sample files into containers, decodes them back, compares
//! sample files and generates synthetic input. Logs go to stderr through
//! `tracing`; results go to stdout.

mod compare;
mod config;
mod input_gen;
mod raw;
mod trailer;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pixhuff_core::{codec, Container, Decoded, Metrics, Shape, Symbol};
use tracing_subscriber::EnvFilter;

use crate::compare::Comparison;
use crate::config::{
    resolve_seed, Cli, Command, CompareArgs, DecodeArgs, EncodeArgs, GenerateArgs, RoundtripArgs,
};
use crate::trailer::ImageMeta;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pixhuff={level},pixhuff_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Encode(args) => encode(args),
        Command::Decode(args) => decode(args),
        Command::Compare(args) => compare(args),
        Command::Generate(args) => generate(args),
        Command::Roundtrip(args) => roundtrip(args),
    }
}

fn flat(samples: &[Symbol]) -> Result<Shape> {
    let len = u32::try_from(samples.len()).context("too many samples for a flat shape")?;
    Ok(Shape::new(vec![len]))
}

fn exit_status(comparison: &Comparison) -> ExitCode {
    if comparison.is_identical() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Trailer metadata from `--mode` and `--palette`; a palette alone means mode `P`.
fn image_meta(args: &EncodeArgs) -> Result<Option<ImageMeta>> {
    let palette = match &args.palette {
        Some(path) => {
            Some(fs::read(path).with_context(|| format!("reading {}", path.display()))?)
        }
        None => None,
    };
    let mode = match (&args.mode, &palette) {
        (Some(mode), _) => mode.clone(),
        (None, Some(_)) => "P".to_string(),
        (None, None) => return Ok(None),
    };
    ImageMeta::new(mode, palette).map(Some)
}

fn encode(args: EncodeArgs) -> Result<ExitCode> {
    let samples = raw::read_samples(&args.input, args.width)?;
    let shape = match args.shape.clone() {
        Some(shape) => shape,
        None => flat(&samples)?,
    };

    let mut metrics = Metrics::new();
    let mut container = codec::encode(&samples, args.width, shape)
        .with_context(|| format!("encoding {}", args.input.display()))?;
    if let Some(meta) = image_meta(&args)? {
        container = container.with_trailer(meta.to_bytes());
    }
    let bytes = container.to_bytes()?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;

    metrics.record_encode(samples.len(), &container, bytes.len());
    metrics.complete();
    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        container_bytes = bytes.len(),
        "encoded"
    );

    println!(
        "Encoded {} samples ({}) into {} bytes, ratio {:.4}",
        samples.len(),
        container.shape(),
        bytes.len(),
        metrics.compression_ratio()
    );
    if args.stats {
        println!("{metrics}");
    }
    Ok(ExitCode::SUCCESS)
}

fn decode(args: DecodeArgs) -> Result<ExitCode> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let container = Container::from_bytes(&bytes)
        .with_context(|| format!("parsing {}", args.input.display()))?;
    let decoded = codec::decode(&container)
        .with_context(|| format!("decoding {}", args.input.display()))?;

    let meta = decoded
        .trailer
        .as_deref()
        .map(ImageMeta::from_bytes)
        .transpose()
        .with_context(|| format!("reading trailer of {}", args.input.display()))?;

    raw::write_samples(&args.output, &decoded.symbols, decoded.symbol_width)?;
    let palette = meta.as_ref().and_then(|m| m.palette.as_ref());
    if let (Some(path), Some(palette)) = (&args.palette, palette) {
        fs::write(path, palette).with_context(|| format!("writing {}", path.display()))?;
    }
    if meta.as_ref().is_some_and(ImageMeta::missing_palette) {
        tracing::warn!("mode P image without a stored palette; colours may be wrong");
    }

    print!("{}", decode_report(&decoded, meta.as_ref()));
    Ok(ExitCode::SUCCESS)
}

fn decode_report(decoded: &Decoded, meta: Option<&ImageMeta>) -> String {
    let mut report = format!(
        "Decoded {} samples, shape {}, {} byte(s) per sample\n",
        decoded.symbols.len(),
        decoded.shape,
        decoded.symbol_width.bytes()
    );
    if let Some(meta) = meta {
        report.push_str(&format!("Mode: {}\n", meta.mode));
        match &meta.palette {
            Some(palette) => report.push_str(&format!("Palette: {} entries\n", palette.len() / 3)),
            None if meta.missing_palette() => {
                report.push_str("Warning: mode P without a palette\n")
            }
            None => {}
        }
    }
    if let Some(warning) = decoded.warning {
        report.push_str(&format!("Warning: {warning:?}\n"));
    }
    report
}

fn compare(args: CompareArgs) -> Result<ExitCode> {
    let left_bytes =
        fs::read(&args.left).with_context(|| format!("reading {}", args.left.display()))?;
    let right_bytes =
        fs::read(&args.right).with_context(|| format!("reading {}", args.right.display()))?;
    let left = raw::samples_from_bytes(&left_bytes, args.width)?;
    let right = raw::samples_from_bytes(&right_bytes, args.width)?;

    println!("Left:  {} (crc32 {:#010x})", args.left.display(), crc32fast::hash(&left_bytes));
    println!("Right: {} (crc32 {:#010x})", args.right.display(), crc32fast::hash(&right_bytes));

    let comparison = compare::compare_samples(&left, &right);
    println!("{comparison}");
    Ok(exit_status(&comparison))
}

fn generate(args: GenerateArgs) -> Result<ExitCode> {
    let seed = resolve_seed(args.seed);
    let count = usize::try_from(args.shape.element_count()?)
        .context("shape is too large to generate")?;

    input_gen::write_sample_file(&args.output, seed, count, args.width)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "Generated {count} samples ({}) with seed {seed} into {}",
        args.shape,
        args.output.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn roundtrip(args: RoundtripArgs) -> Result<ExitCode> {
    let (samples, shape) = match &args.input {
        Some(path) => {
            let samples = raw::read_samples(path, args.width)?;
            let shape = match &args.shape {
                Some(shape) => shape.clone(),
                None => flat(&samples)?,
            };
            (samples, shape)
        }
        None => {
            let seed = resolve_seed(args.seed);
            let shape = args
                .shape
                .clone()
                .unwrap_or_else(|| Shape::new(vec![256, 256]));
            let count = usize::try_from(shape.element_count()?)
                .context("shape is too large to generate")?;
            println!("Seed: {seed}");
            (input_gen::generate_samples(seed, count, args.width), shape)
        }
    };

    let mut metrics = Metrics::new();
    let container = codec::encode(&samples, args.width, shape)?;
    let bytes = container.to_bytes()?;
    metrics.record_encode(samples.len(), &container, bytes.len());

    let decoded = codec::decode_bytes(&bytes)?;
    metrics.record_decode(&decoded, &samples);
    metrics.complete();

    let comparison = compare::compare_samples(&samples, &decoded.symbols);
    if args.export {
        print!("{}", metrics.export_text());
    } else {
        println!("{metrics}");
        println!("{comparison}");
    }
    Ok(exit_status(&comparison))
}
