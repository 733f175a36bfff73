//! The bitstream module forms the I/O subsystem of the Huffman coder.
//!
//! Codes are variable length, so the encoder produces a stream of bits that must be packed
//! into bytes, most significant bit first. The final byte is padded with zero bits; the padding
//! is not self describing, which is why the symbol count travels in the artifact header.
//!
//! - bitpacker: queue bits and codes, emit whole bytes.
//! - bitreader: read bits, integers and bytes back out of a packed buffer.
//! - bitwriter: assemble the artifact (header, code table, payload) and write it out.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitwriter;
