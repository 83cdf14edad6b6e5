//! Byte frequency counting

use std::io;

use crate::bitio::BitSource;
use crate::{ALPHABET_SIZE, BITS_PER_WORD};

/// Occurrence counts for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &b in data {
            table.counts[b as usize] += 1;
        }
        table
    }

    /// Consume `source` to its end, one byte at a time. The caller must rewind
    /// the source before reading it again.
    pub fn from_source<S: BitSource>(source: &mut S) -> io::Result<Self> {
        let mut table = Self::new();
        while let Some(byte) = source.read_bits(BITS_PER_WORD)? {
            table.counts[byte as usize] += 1;
        }
        Ok(table)
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn set(&mut self, byte: u8, count: u64) {
        self.counts[byte as usize] = count;
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct byte values observed.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Non-zero `(byte, count)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }
}
