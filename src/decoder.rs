//! Payload decoding

use tracing::trace;

use crate::bitio::{BitSink, BitSource};
use crate::error::{HuffError, Result};
use crate::tree::{HuffNode, HuffTree};
use crate::{BITS_PER_WORD, PSEUDO_EOF};

/// Walk `tree` one payload bit at a time, writing each decoded byte to `sink`
/// until the end-of-stream leaf is reached. Returns the number of bytes
/// written.
///
/// A leaf is acted on as soon as it is reached, so no bit after the
/// end-of-stream code is ever read and trailing padding is ignored.
pub fn decode<R: BitSource, W: BitSink>(
    tree: &HuffTree,
    source: &mut R,
    sink: &mut W,
) -> Result<u64> {
    let root = tree.root();
    let mut current = root;
    let mut decoded = 0u64;
    loop {
        match current {
            HuffNode::Leaf { symbol, .. } if *symbol == PSEUDO_EOF => {
                trace!(decoded, "reached end-of-stream code");
                return Ok(decoded);
            }
            HuffNode::Leaf { symbol, .. } if std::ptr::eq(current, root) => {
                return Err(HuffError::MalformedHeader(format!(
                    "root is a leaf for symbol {symbol}, payload cannot terminate"
                )));
            }
            HuffNode::Leaf { symbol, .. } => {
                sink.write_bits(BITS_PER_WORD, u32::from(*symbol))?;
                decoded += 1;
                current = root;
            }
            HuffNode::Internal { left, right, .. } => {
                let bit = source
                    .read_bit()?
                    .ok_or(HuffError::TruncatedStream { decoded })?;
                current = if bit { right.as_ref() } else { left.as_ref() };
            }
        }
    }
}
