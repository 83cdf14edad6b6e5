//! huffpack: lossless Huffman compression for byte streams.
//!
//! Compression reads its input twice: once to count byte frequencies, once to
//! emit codes. The output is self-describing:
//! - a 32-bit magic number naming the header format
//! - the header (serialized code tree, or the frequency table)
//! - the payload, one code per input byte followed by the end-of-stream code
//!
//! Decompression reads the header, rebuilds the tree and walks it bit by bit
//! until the end-of-stream code.

pub mod bitio;
pub mod codes;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod frequency;
pub mod header;
pub mod tree;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitio::{BitInput, BitOutput};
use crate::codes::CodeTable;
use crate::config::CompressionConfig;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffTree;

pub use crate::header::HeaderFormat;

/// A byte value, or [`PSEUDO_EOF`].
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;
pub const ALPHABET_SIZE: usize = 1 << BITS_PER_WORD;
/// Synthetic symbol marking the end of the payload.
pub const PSEUDO_EOF: Symbol = ALPHABET_SIZE as Symbol;
pub const SYMBOL_COUNT: usize = ALPHABET_SIZE + 1;
/// Width of a symbol in the tree header.
pub const SYMBOL_BITS: u32 = 9;

/// Statistics gathered while compressing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionStats {
    pub header: HeaderFormat,
    pub original_size: u64,
    pub compressed_size: u64,
    pub ratio: f64,
    pub metadata: CompressionMetadata,
}

/// Details of the code built for one input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionMetadata {
    pub header_bits: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
    pub tree_depth: usize,
    pub entropy_bits: f64,
    pub mean_code_length: f64,
}

/// Compressed output container
#[derive(Debug, Clone)]
pub struct CompressedOutput {
    pub data: Vec<u8>,
    pub stats: CompressionStats,
}

/// Header of a compressed buffer, as reported by [`inspect`]
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub format: HeaderFormat,
    /// Magic number included.
    pub header_bits: u64,
    pub tree: HuffTree,
}

impl HeaderInfo {
    pub fn codes(&self) -> CodeTable {
        CodeTable::from_tree(&self.tree)
    }
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress an in-memory buffer
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput> {
        let mut out = Vec::new();
        let stats = self.compress_stream(Cursor::new(data), &mut out)?;
        Ok(CompressedOutput { data: out, stats })
    }

    /// Decompress an in-memory buffer
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decompress_stream(data, &mut out)?;
        Ok(out)
    }

    /// Compress `reader` into `writer`, starting from its current position. The
    /// reader is read to its end, sought back to that position, and read again.
    pub fn compress_stream<R: Read + Seek, W: Write>(
        &self,
        reader: R,
        writer: W,
    ) -> Result<CompressionStats> {
        let mut input = BitInput::seekable(reader)?;
        let freq = FrequencyTable::from_source(&mut input)?;
        let original_size = freq.total();
        if original_size > self.config.max_input_size {
            return Err(HuffError::InputTooLarge {
                size: original_size,
                limit: self.config.max_input_size,
            });
        }

        let tree = HuffTree::from_frequencies(&freq);
        let codes = CodeTable::from_tree(&tree);
        debug!(
            original_size,
            distinct = freq.distinct(),
            depth = tree.depth(),
            header = ?self.config.header,
            "built huffman code"
        );

        let mut output = BitOutput::new(writer);
        header::write_header(&mut output, self.config.header, &tree, &freq)?;
        let header_bits = output.bits_written();

        let mut input = input.rewind()?;
        let summary = encoder::encode(&mut input, &codes, &mut output)?;
        if summary.bytes_read != original_size {
            return Err(HuffError::InputChanged {
                counted: original_size,
                encoded: summary.bytes_read,
            });
        }
        output.finish()?;

        let total_bits = header_bits + summary.bits_written;
        let compressed_size = total_bits.div_ceil(8);
        let ratio = if original_size == 0 {
            1.0
        } else {
            compressed_size as f64 / original_size as f64
        };
        debug!(compressed_size, ratio, "compression finished");

        Ok(CompressionStats {
            header: self.config.header,
            original_size,
            compressed_size,
            ratio,
            metadata: CompressionMetadata {
                header_bits,
                payload_bits: summary.bits_written,
                distinct_symbols: freq.distinct(),
                tree_depth: tree.depth(),
                entropy_bits: entropy::shannon_entropy(&freq),
                mean_code_length: entropy::mean_code_length(&freq, &codes),
            },
        })
    }

    /// Decompress `reader` into `writer`, returning the number of bytes written.
    pub fn decompress_stream<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<u64> {
        let mut input = BitInput::new(reader);
        let (format, tree) = header::read_header(&mut input)?;
        debug!(
            ?format,
            leaves = tree.leaf_count(),
            header_bits = input.bits_read(),
            "read header"
        );

        let mut output = BitOutput::new(writer);
        let decoded = decoder::decode(&tree, &mut input, &mut output)?;
        output.finish()?;
        debug!(decoded, "decompression finished");
        Ok(decoded)
    }

    /// Compress the file at `input` into a new file at `output`.
    ///
    /// A partially written `output` is left in place on error.
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionStats> {
        let reader = BufReader::with_capacity(self.config.buffer_size, File::open(input)?);
        let writer = BufWriter::with_capacity(self.config.buffer_size, File::create(output)?);
        self.compress_stream(reader, writer)
    }

    /// Decompress the file at `input` into a new file at `output`.
    ///
    /// A partially written `output` is left in place on error.
    pub fn decompress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<u64> {
        let reader = BufReader::with_capacity(self.config.buffer_size, File::open(input)?);
        let writer = BufWriter::with_capacity(self.config.buffer_size, File::create(output)?);
        self.decompress_stream(reader, writer)
    }
}

/// Read only the header of a compressed buffer.
pub fn inspect(data: &[u8]) -> Result<HeaderInfo> {
    let mut input = BitInput::new(data);
    let (format, tree) = header::read_header(&mut input)?;
    Ok(HeaderInfo {
        format,
        header_bits: input.bits_read(),
        tree,
    })
}
