//! The huffman module builds the prefix code used by the encoder and decoder.
//!
//! The byte frequencies of the input are merged into a binary tree with a min-priority-queue:
//! the two lightest nodes are repeatedly joined under a new parent until one node (the root)
//! is left. Every leaf holds one byte, and the path from the root to that leaf (0 for a left
//! edge, 1 for a right edge) is the byte's code. Frequent bytes end up near the root and get
//! short codes.
//!
//! Ties in the queue are broken by insertion order so the same input always produces the
//! same codes, bit for bit.
//!

pub mod code_table;
pub mod huffman;
