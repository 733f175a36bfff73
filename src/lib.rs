//! Static Huffman coding for byte streams.
//!
//! Version 0.1.0
//!
//! Builds a prefix-free code from the byte frequencies of an input, packs the coded
//! bitstream MSB-first into bytes, and reverses the process. The code table and the
//! original symbol count travel with the packed bytes in a single artifact.
//!
//! The pipeline, leaf first:
//! - tools::freq_count: count how often each byte occurs.
//! - huffman_coding::huffman: merge the counts into a Huffman tree.
//! - huffman_coding::code_table: derive each byte's root-to-leaf bit path.
//! - bitstream: pack and unpack bits, and write the artifact.
//! - compression: encode and decode, in memory and file to file.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffman -z test.txt`
//!
//! This will compress the file and create the file test.txt.huf.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::HuffError;
