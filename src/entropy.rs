//! Shannon entropy of a byte distribution

use crate::codes::CodeTable;
use crate::frequency::FrequencyTable;
use crate::Symbol;

/// Entropy of `freq` in bits per byte. Zero for an empty table.
pub fn shannon_entropy(freq: &FrequencyTable) -> f64 {
    let total = freq.total();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for (_, count) in freq.iter() {
        let p = count as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}

/// Average code length in bits per input byte, excluding the end-of-stream
/// code. Never below [`shannon_entropy`] for the same table.
pub fn mean_code_length(freq: &FrequencyTable, codes: &CodeTable) -> f64 {
    let total = freq.total();
    if total == 0 {
        return 0.0;
    }
    let bits: u64 = freq
        .iter()
        .map(|(byte, count)| {
            let len = codes.get(Symbol::from(byte)).map_or(0, |c| c.len() as u64);
            count * len
        })
        .sum();
    bits as f64 / total as f64
}
