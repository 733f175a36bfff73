//! The compression module manages both directions of the Huffman coder.
//!
//! Compression happens in the following steps:
//! - Frequency count: how often each byte occurs in the input.
//! - Tree build: merge the counts into a Huffman tree.
//! - Code table: derive each byte's bit path from the tree.
//! - Encode: replace every byte by its code and pack the bits, MSB first.
//! - Write: header (symbol count), serialized code table, packed payload.
//!
//! Decompression reads the header and table back, then walks the payload bit by bit until
//! exactly the recorded number of symbols has been produced. The zero padding at the end of
//! the payload is never decoded.
//!
//! The whole input is read into memory first; there is no streaming.
//!

pub mod compress;
pub mod decompress;
