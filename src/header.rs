//! Compressed file header: magic number plus either the serialized code tree
//! or the frequency table it was built from.
//!
//! Tree layout (pre-order): a leaf is a `1` bit followed by its 9-bit symbol;
//! an internal node is a `0` bit followed by its left then right subtree.
//!
//! Counts layout: a 9-bit entry count, then per entry an 8-bit byte value and
//! its 64-bit count, byte values strictly ascending. The decoder rebuilds the
//! tree with the same deterministic builder the encoder used.

use serde::{Deserialize, Serialize};

use crate::bitio::{BitSink, BitSource};
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffNode, HuffTree};
use crate::{Symbol, BITS_PER_INT, BITS_PER_WORD, PSEUDO_EOF, SYMBOL_BITS, SYMBOL_COUNT};

pub const HUFF_NUMBER: u32 = 0xface_8200;
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
pub const HUFF_COUNTS: u32 = HUFF_NUMBER | 2;

/// Deepest root-to-leaf path a tree over the full alphabet can have.
const MAX_TREE_DEPTH: usize = SYMBOL_COUNT - 1;

/// Header encoding written in front of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFormat {
    /// Pre-order serialized code tree.
    #[default]
    Tree,
    /// Byte frequency table.
    Counts,
}

impl HeaderFormat {
    pub fn magic(self) -> u32 {
        match self {
            HeaderFormat::Tree => HUFF_TREE,
            HeaderFormat::Counts => HUFF_COUNTS,
        }
    }

    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            HUFF_TREE => Some(HeaderFormat::Tree),
            HUFF_COUNTS => Some(HeaderFormat::Counts),
            _ => None,
        }
    }
}

/// Write the magic number and header body for `format`.
pub fn write_header<S: BitSink>(
    sink: &mut S,
    format: HeaderFormat,
    tree: &HuffTree,
    freq: &FrequencyTable,
) -> Result<()> {
    sink.write_bits(BITS_PER_INT, format.magic())?;
    match format {
        HeaderFormat::Tree => write_tree(sink, tree),
        HeaderFormat::Counts => write_counts(sink, freq),
    }
}

/// Read the magic number and the header it announces.
pub fn read_header<S: BitSource>(source: &mut S) -> Result<(HeaderFormat, HuffTree)> {
    let magic = source.read_bits(BITS_PER_INT)?;
    let format = magic
        .and_then(HeaderFormat::from_magic)
        .ok_or(HuffError::InvalidMagic { found: magic })?;
    let tree = match format {
        HeaderFormat::Tree => read_tree(source)?,
        HeaderFormat::Counts => HuffTree::from_frequencies(&read_counts(source)?),
    };
    Ok((format, tree))
}

pub fn write_tree<S: BitSink>(sink: &mut S, tree: &HuffTree) -> Result<()> {
    write_node(sink, tree.root())
}

fn write_node<S: BitSink>(sink: &mut S, node: &HuffNode) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            if *symbol > PSEUDO_EOF {
                return Err(HuffError::UnencodableSymbol(*symbol));
            }
            sink.write_bit(true)?;
            sink.write_bits(SYMBOL_BITS, u32::from(*symbol))?;
        }
        HuffNode::Internal { left, right, .. } => {
            sink.write_bit(false)?;
            write_node(sink, left)?;
            write_node(sink, right)?;
        }
    }
    Ok(())
}

/// Read a pre-order serialized tree. The result carries zero weights.
pub fn read_tree<S: BitSource>(source: &mut S) -> Result<HuffTree> {
    let mut seen = [false; SYMBOL_COUNT];
    let root = read_node(source, 0, &mut seen)?;
    if !seen[PSEUDO_EOF as usize] {
        return Err(HuffError::MalformedHeader("tree has no end-of-stream leaf".into()));
    }
    Ok(HuffTree::from_root(root))
}

fn read_node<S: BitSource>(
    source: &mut S,
    depth: usize,
    seen: &mut [bool; SYMBOL_COUNT],
) -> Result<HuffNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(HuffError::MalformedHeader(format!(
            "tree deeper than {MAX_TREE_DEPTH} levels"
        )));
    }
    let is_leaf = source.read_bit()?.ok_or_else(header_exhausted)?;
    if !is_leaf {
        let left = read_node(source, depth + 1, seen)?;
        let right = read_node(source, depth + 1, seen)?;
        return Ok(HuffNode::internal(left, right));
    }

    let value = source.read_bits(SYMBOL_BITS)?.ok_or_else(header_exhausted)?;
    if value > u32::from(PSEUDO_EOF) {
        return Err(HuffError::MalformedHeader(format!(
            "leaf symbol {value} out of range"
        )));
    }
    let symbol = value as Symbol;
    if std::mem::replace(&mut seen[symbol as usize], true) {
        return Err(HuffError::MalformedHeader(format!(
            "symbol {symbol} appears in more than one leaf"
        )));
    }
    Ok(HuffNode::leaf(symbol, 0))
}

pub fn write_counts<S: BitSink>(sink: &mut S, freq: &FrequencyTable) -> Result<()> {
    sink.write_bits(SYMBOL_BITS, freq.distinct() as u32)?;
    for (byte, count) in freq.iter() {
        sink.write_bits(BITS_PER_WORD, u32::from(byte))?;
        sink.write_bits(BITS_PER_INT, (count >> 32) as u32)?;
        sink.write_bits(BITS_PER_INT, count as u32)?;
    }
    Ok(())
}

pub fn read_counts<S: BitSource>(source: &mut S) -> Result<FrequencyTable> {
    let entries = source.read_bits(SYMBOL_BITS)?.ok_or_else(header_exhausted)?;
    if entries > 256 {
        return Err(HuffError::MalformedHeader(format!(
            "{entries} frequency entries exceed the byte alphabet"
        )));
    }

    let mut freq = FrequencyTable::new();
    let mut previous: Option<u32> = None;
    for _ in 0..entries {
        let byte = source.read_bits(BITS_PER_WORD)?.ok_or_else(header_exhausted)?;
        let high = source.read_bits(BITS_PER_INT)?.ok_or_else(header_exhausted)?;
        let low = source.read_bits(BITS_PER_INT)?.ok_or_else(header_exhausted)?;
        if previous.is_some_and(|p| p >= byte) {
            return Err(HuffError::MalformedHeader("frequency entries out of order".into()));
        }
        let count = (u64::from(high) << 32) | u64::from(low);
        if count == 0 {
            return Err(HuffError::MalformedHeader(format!(
                "zero count stored for byte {byte}"
            )));
        }
        freq.set(byte as u8, count);
        previous = Some(byte);
    }
    Ok(freq)
}

fn header_exhausted() -> HuffError {
    HuffError::MalformedHeader("input ended inside the header".into())
}
