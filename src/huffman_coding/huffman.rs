use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::error::{HuffError, Result};
use crate::tools::freq_count::FrequencyTable;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
}

/// One node of a Huffman tree. Leaves carry a symbol, internal nodes own exactly two children.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, node_data: NodeData) -> Node {
        Node { weight, node_data }
    }

    /// Create a leaf for `symbol`
    pub fn leaf(symbol: u8, weight: u64) -> Node {
        Node::new(weight, NodeData::Leaf(symbol))
    }

    /// Join two nodes under a new parent whose weight is their sum
    pub fn join(left: Node, right: Node) -> Node {
        Node::new(
            left.weight + right.weight,
            NodeData::Kids(Box::new(left), Box::new(right)),
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match &self.node_data {
            NodeData::Kids(left, right) => 1 + left.depth().max(right.depth()),
            NodeData::Leaf(_) => 0,
        }
    }

    /// Number of leaves (distinct symbols) under this node.
    pub fn leaf_count(&self) -> usize {
        match &self.node_data {
            NodeData::Kids(left, right) => left.leaf_count() + right.leaf_count(),
            NodeData::Leaf(_) => 1,
        }
    }
}

/// A node waiting in the priority queue, tagged with the order it was queued in.
#[derive(Debug)]
struct Queued {
    seq: u32,
    node: Node,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Queued {}

impl Ord for Queued {
    /// Reverse order by weight, then by queue order, so BinaryHeap pops the lightest node
    /// first and the earliest queued node among equals.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .weight
            .cmp(&self.node.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build a Huffman tree from a frequency table and return its root.
///
/// Leaves are queued in ascending symbol order, merged nodes after them in the order they are
/// made. The two lightest nodes are popped (earliest queued wins a tie), the first becomes the
/// left child and the second the right child of their parent. A single symbol alphabet returns
/// the leaf itself as the root.
pub fn build_tree(freqs: &FrequencyTable) -> Result<Node> {
    let mut queue = BinaryHeap::with_capacity(freqs.len());
    let mut seq = 0_u32;
    for (symbol, weight) in freqs.iter() {
        queue.push(Queued {
            seq,
            node: Node::leaf(symbol, weight),
        });
        seq += 1;
    }

    let root = loop {
        let first = queue.pop().ok_or(HuffError::EmptyInput)?;
        let second = match queue.pop() {
            Some(second) => second,
            None => break first.node,
        };
        trace!(
            "Merging weights {} (#{}) and {} (#{}) as #{}",
            first.node.weight,
            first.seq,
            second.node.weight,
            second.seq,
            seq
        );
        queue.push(Queued {
            seq,
            node: Node::join(first.node, second.node),
        });
        seq += 1;
    };

    debug!(
        "Built tree over {} symbols, weight {}, depth {}.",
        root.leaf_count(),
        root.weight,
        root.depth()
    );
    Ok(root)
}
