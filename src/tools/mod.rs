//! The tools module provides several helper functions for the Huffman coder.
//!
//! The tools are:
//! - cli: Command line interface.
//! - freq_count: Frequency count of the input bytes.
//! - timer: Phase timing and the compression report.
//!
pub mod cli;
pub mod freq_count;
pub mod timer;
