//! huffpack CLI - Huffman file compression tool
//!
//! Compresses any file into the huffpack format and restores it bit for bit.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use huffpack::config::CompressionConfig;
use huffpack::{inspect, Compressor, HeaderFormat, PSEUDO_EOF};

/// Extension appended to compressed files.
const EXTENSION: &str = "hf";

/// Lossless Huffman compression for arbitrary files.
#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print statistics as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (defaults to INPUT.hf)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Header format (overrides the configuration file)
        #[arg(long, value_enum)]
        header: Option<HeaderArg>,
    },
    /// Decompress a file
    Decompress {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (defaults to INPUT without .hf, or INPUT.out)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the header and code table of a compressed file
    Inspect {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeaderArg {
    /// Serialized code tree
    Tree,
    /// Byte frequency table
    Counts,
}

impl From<HeaderArg> for HeaderFormat {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Tree => HeaderFormat::Tree,
            HeaderArg::Counts => HeaderFormat::Counts,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => CompressionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompressionConfig::default(),
    };

    match args.command {
        Command::Compress {
            input,
            output,
            header,
        } => {
            if let Some(header) = header {
                config.header = header.into();
            }
            let output = output.unwrap_or_else(|| compressed_name(&input));
            let start = Instant::now();
            let stats = guard_output(&output, || {
                Compressor::new(config).compress_file(&input, &output)
            })?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                eprintln!("Compressed: {:?} -> {:?}", input, output);
                eprintln!("  Header: {:?}", stats.header);
                eprintln!(
                    "  Size: {} -> {} bytes ({:.1}%)",
                    stats.original_size,
                    stats.compressed_size,
                    stats.ratio * 100.0
                );
                eprintln!(
                    "  Entropy: {:.3} bits/byte, mean code length {:.3}",
                    stats.metadata.entropy_bits, stats.metadata.mean_code_length
                );
                eprintln!("  Time: {:.2?}", start.elapsed());
            }
        }
        Command::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| decompressed_name(&input));
            let start = Instant::now();
            let written = guard_output(&output, || {
                Compressor::new(config).decompress_file(&input, &output)
            })?;
            if args.json {
                println!("{}", serde_json::json!({ "bytes_written": written }));
            } else {
                eprintln!("Decompressed: {:?} -> {:?}", input, output);
                eprintln!("  Size: {} bytes", written);
                eprintln!("  Time: {:.2?}", start.elapsed());
            }
        }
        Command::Inspect { input } => {
            let data = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let info = inspect(&data)?;
            let codes = info.codes();
            if args.json {
                let table: Vec<_> = codes
                    .iter()
                    .map(|(sym, code)| {
                        serde_json::json!({ "symbol": sym, "code": code.to_string() })
                    })
                    .collect();
                let report = serde_json::json!({
                    "header": info.format,
                    "header_bits": info.header_bits,
                    "leaves": info.tree.leaf_count(),
                    "depth": info.tree.depth(),
                    "codes": table,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Header: {:?} ({} bits)", info.format, info.header_bits);
                println!("Leaves: {}, depth {}", info.tree.leaf_count(), info.tree.depth());
                for (sym, code) in codes.iter() {
                    if sym == PSEUDO_EOF {
                        println!("  EOF   {code}");
                    } else {
                        println!("  0x{sym:02x}  {code}");
                    }
                }
            }
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "huffpack=debug",
        _ => "huffpack=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run `op`, removing `output` if it fails and the file did not exist before.
fn guard_output<T>(output: &Path, op: impl FnOnce() -> huffpack::error::Result<T>) -> Result<T> {
    let existed = output.exists();
    op().or_else(|e| {
        if !existed && output.exists() {
            if let Err(rm) = fs::remove_file(output) {
                tracing::warn!(
                    path = %output.display(),
                    error = %rm,
                    "could not remove partial output"
                );
            }
        }
        Err(e).with_context(|| format!("writing {}", output.display()))
    })
}

fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn decompressed_name(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}
