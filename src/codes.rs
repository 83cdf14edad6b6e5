//! Code table derivation

use std::fmt;

use crate::tree::{HuffNode, HuffTree};
use crate::{Symbol, SYMBOL_COUNT};

/// The bit string assigned to one symbol, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping covering exactly the leaves of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffTree) -> Self {
        let mut codes = vec![None; SYMBOL_COUNT];
        match tree.root() {
            // Only the end-of-stream leaf: give it a one-bit code so that no
            // code is ever empty.
            HuffNode::Leaf { symbol, .. } => {
                if let Some(slot) = codes.get_mut(*symbol as usize) {
                    *slot = Some(Code { bits: vec![false] });
                }
            }
            root => build_codes(root, &mut Vec::new(), &mut codes),
        }
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(sym, code)| code.as_ref().map(|c| (sym as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_codes(node: &HuffNode, prefix: &mut Vec<bool>, codes: &mut [Option<Code>]) {
    match node {
        // Symbols outside the alphabet get no code.
        HuffNode::Leaf { symbol, .. } => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(Code {
                    bits: prefix.clone(),
                });
            }
        }
        HuffNode::Internal { left, right, .. } => {
            prefix.push(false);
            build_codes(left, prefix, codes);
            prefix.pop();
            prefix.push(true);
            build_codes(right, prefix, codes);
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::PSEUDO_EOF;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&HuffTree::from_frequencies(&FrequencyTable::from_bytes(data)))
    }

    #[test]
    fn test_left_zero_right_one() {
        let tree = HuffTree::from_root(HuffNode::internal(
            HuffNode::leaf(7, 1),
            HuffNode::internal(HuffNode::leaf(8, 1), HuffNode::leaf(PSEUDO_EOF, 1)),
        ));
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.get(7).unwrap().to_string(), "0");
        assert_eq!(table.get(8).unwrap().to_string(), "10");
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "11");
        assert!(table.get(9).is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_symbol_outside_alphabet_has_no_code() {
        let tree = HuffTree::from_root(HuffNode::internal(
            HuffNode::leaf(300, 1),
            HuffNode::leaf(PSEUDO_EOF, 1),
        ));
        let table = CodeTable::from_tree(&tree);
        assert!(table.get(300).is_none());
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "1");
        assert_eq!(table.len(), 1);

        let table = CodeTable::from_tree(&HuffTree::from_root(HuffNode::leaf(999, 1)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"it was the best of times, it was the worst of times");
        let codes: Vec<_> = table.iter().collect();
        for (i, (_, a)) in codes.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_covers_exactly_observed_symbols() {
        let table = table_for(b"hello");
        let symbols: Vec<Symbol> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(
            symbols,
            vec![b'e' as u16, b'h' as u16, b'l' as u16, b'o' as u16, PSEUDO_EOF]
        );
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'a'; 100];
        data.extend_from_slice(b"bcdefg");
        let table = table_for(&data);
        let a = table.get(b'a' as u16).unwrap().len();
        for sym in b"bcdefg" {
            assert!(a <= table.get(*sym as u16).unwrap().len());
        }
    }

    #[test]
    fn test_single_symbol_codes_are_one_bit() {
        let table = table_for(&[0x41; 1000]);
        assert_eq!(table.get(0x41).unwrap().len(), 1);
        assert_eq!(table.get(PSEUDO_EOF).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_input_eof_code() {
        let table = table_for(b"");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "0");
    }
}
