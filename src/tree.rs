//! Huffman code tree construction
//!
//! Leaves carry a symbol (a byte value or [`PSEUDO_EOF`]) and its weight;
//! internal nodes own exactly two children. Leaf-ness is the enum variant,
//! never a reserved symbol value.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;
use crate::{Symbol, PSEUDO_EOF};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal { left: l1, right: r1, .. },
                HuffNode::Internal { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }
}

/// A node waiting in the priority queue. Ordered so that `BinaryHeap` pops
/// the lowest weight first, and among equal weights the earliest inserted.
#[derive(Debug)]
struct Pending {
    weight: u64,
    order: usize,
    node: HuffNode,
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
    root: HuffNode,
}

impl HuffTree {
    /// Build an optimal code tree for `freq`, always including a leaf for
    /// [`PSEUDO_EOF`] with weight 1.
    ///
    /// Ties are broken by insertion order: byte leaves in ascending value, then
    /// the end-of-stream leaf, then merged nodes in the order they are created.
    /// The same table therefore always yields the same tree.
    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::new();
        let mut order = 0usize;
        let mut push = |heap: &mut BinaryHeap<Pending>, node: HuffNode| {
            heap.push(Pending {
                weight: node.weight(),
                order,
                node,
            });
            order += 1;
        };

        for (byte, count) in freq.iter() {
            push(&mut heap, HuffNode::leaf(Symbol::from(byte), count));
        }
        push(&mut heap, HuffNode::leaf(PSEUDO_EOF, 1));

        while heap.len() > 1 {
            if let (Some(first), Some(second)) = (heap.pop(), heap.pop()) {
                push(&mut heap, HuffNode::internal(first.node, second.node));
            }
        }

        // The end-of-stream leaf guarantees one node is left.
        let root = heap
            .pop()
            .map_or_else(|| HuffNode::leaf(PSEUDO_EOF, 1), |p| p.node);
        Self { root }
    }

    pub fn from_root(root: HuffNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Whether both trees place the same symbols at the same positions,
    /// ignoring weights. Weights are not stored in the tree header, so this is
    /// the equality that matters for decoding.
    pub fn same_shape(&self, other: &HuffTree) -> bool {
        self.root.same_shape(&other.root)
    }
}
