// Huffman code lengths for command signatures

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

/// Code lengths of an optimal prefix code. Only lengths are kept; the
/// estimator never needs the codes themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    lengths: BTreeMap<String, u32>,
}

enum Node {
    Leaf(usize),
    Branch(usize, usize),
}

impl HuffmanTree {
    /// Build from symbol frequencies. Ties are broken by insertion order,
    /// so a sorted input always yields the same tree.
    pub fn build<'a, I>(frequencies: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut symbols = Vec::new();
        let mut nodes = Vec::new();
        let mut heap = BinaryHeap::new();

        for (symbol, frequency) in frequencies {
            let id = nodes.len();
            nodes.push(Node::Leaf(symbols.len()));
            symbols.push(symbol.to_string());
            heap.push(Reverse((frequency, id)));
        }

        while heap.len() > 1 {
            let (Some(Reverse((fa, a))), Some(Reverse((fb, b)))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let id = nodes.len();
            nodes.push(Node::Branch(a, b));
            heap.push(Reverse((fa + fb, id)));
        }

        let mut lengths = BTreeMap::new();
        if let Some(Reverse((_, root))) = heap.pop() {
            let mut stack = vec![(root, 0u32)];
            while let Some((id, depth)) = stack.pop() {
                match nodes[id] {
                    // a lone symbol still needs one bit
                    Node::Leaf(sym) => {
                        lengths.insert(symbols[sym].clone(), depth.max(1));
                    }
                    Node::Branch(left, right) => {
                        stack.push((left, depth + 1));
                        stack.push((right, depth + 1));
                    }
                }
            }
        }

        Self { lengths }
    }

    pub fn code_length(&self, symbol: &str) -> Option<u32> {
        self.lengths.get(symbol).copied()
    }

    /// Longest code in the tree, 0 when empty.
    pub fn max_code_length(&self) -> u32 {
        self.lengths.values().copied().max().unwrap_or(0)
    }

    /// Bits needed to encode every occurrence. Unknown symbols contribute
    /// nothing.
    pub fn encoded_bits<'a, I>(&self, frequencies: I) -> u64
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        frequencies
            .into_iter()
            .filter_map(|(sym, freq)| self.code_length(sym).map(|len| freq * len as u64))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}
