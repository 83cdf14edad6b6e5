//! Payload encoding

use crate::bitio::{BitSink, BitSource};
use crate::codes::{Code, CodeTable};
use crate::error::{HuffError, Result};
use crate::{Symbol, BITS_PER_INT, BITS_PER_WORD, PSEUDO_EOF};

/// Counters reported by [`encode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub bytes_read: u64,
    pub bits_written: u64,
}

/// Emit the code of every byte in `source`, then the end-of-stream code.
pub fn encode<R: BitSource, W: BitSink>(
    source: &mut R,
    codes: &CodeTable,
    sink: &mut W,
) -> Result<EncodeSummary> {
    let mut summary = EncodeSummary::default();
    while let Some(byte) = source.read_bits(BITS_PER_WORD)? {
        summary.bits_written += write_symbol(sink, codes, byte as Symbol)?;
        summary.bytes_read += 1;
    }
    summary.bits_written += write_symbol(sink, codes, PSEUDO_EOF)?;
    Ok(summary)
}

fn write_symbol<W: BitSink>(sink: &mut W, codes: &CodeTable, symbol: Symbol) -> Result<u64> {
    let code = codes
        .get(symbol)
        .ok_or(HuffError::UnencodableSymbol(symbol))?;
    write_code(sink, code)?;
    Ok(code.len() as u64)
}

/// Write `code` first bit first, in chunks of up to 32 bits.
fn write_code<W: BitSink>(sink: &mut W, code: &Code) -> Result<()> {
    for chunk in code.bits().chunks(BITS_PER_INT as usize) {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
        sink.write_bits(chunk.len() as u32, value)?;
    }
    Ok(())
}
