use std::fs::{self, OpenOptions};

use log::{debug, info, warn};

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::build_tree;
use crate::tools::cli::HufOpts;
use crate::tools::freq_count::freqs;
use crate::tools::timer::{compression_ratio, Timer};

/// Everything needed to restore an input: the packed bitstream, the code table that
/// produced it and the number of symbols it holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compressed {
    pub table: CodeTable,
    pub symbols: u64,
    pub data: Vec<u8>,
}

/// Sizes reported after compressing a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressStats {
    pub original: u64,
    pub compressed: u64,
}

impl CompressStats {
    /// (original - compressed) / original
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.original, self.compressed)
    }
}

/// Encode `data` with `table` and return the packed bytes. Fails with UnknownSymbol if a
/// byte has no code, which only happens when the table came from different data.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    let estimate = data.len() / 2 + 1;
    let mut bp = BitPacker::new(estimate);
    for &symbol in data {
        let code = table.get(symbol).ok_or(HuffError::UnknownSymbol(symbol))?;
        bp.out_code(code);
    }
    bp.flush();
    debug!(
        "Encoded {} symbols in {} bytes, {} bits used in the last byte.",
        data.len(),
        bp.output.len(),
        bp.last_bits
    );
    Ok(bp.output)
}

/// Run the whole pipeline over `data`: count, build the tree, derive the table, encode.
/// Empty input is a no-op and returns None.
pub fn compress_data(data: &[u8]) -> Result<Option<Compressed>> {
    let freq = freqs(data);
    if freq.is_empty() {
        return Ok(None);
    }
    let root = build_tree(&freq)?;
    let table = CodeTable::from_tree(&root);
    let packed = encode(data, &table)?;
    Ok(Some(Compressed {
        table,
        symbols: data.len() as u64,
        data: packed,
    }))
}

/// Serialize a compressed result into the single file layout: header, code table, payload.
pub fn write_artifact<W: std::io::Write>(compressed: &Compressed, writer: W) -> Result<usize> {
    let mut bw = BitWriter::new(writer);
    bw.push_header(compressed.symbols, &compressed.table.serialize());
    bw.add_payload(&compressed.data)?;
    Ok(bw.finish()?)
}

/// Compress the file named in opts. Returns None, and writes nothing, when the input is empty.
pub fn compress(opts: &HufOpts, timer: &mut Timer) -> Result<Option<CompressStats>> {
    let data = fs::read(&opts.origin)?;
    timer.mark("read");
    info!("Read {} bytes from {}.", data.len(), opts.origin);

    let compressed = match compress_data(&data)? {
        Some(compressed) => compressed,
        None => {
            warn!("{} is empty, nothing to compress.", opts.origin);
            return Ok(None);
        }
    };
    timer.mark("encode");
    info!(
        "Coded {} symbols with {} distinct codes.",
        compressed.symbols,
        compressed.table.len()
    );

    let out_path = opts.output_path().ok_or_else(|| {
        HuffError::InvalidArtifact("no output file for compression".to_string())
    })?;
    // create_new refuses to clobber an existing file unless forced
    let f_out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!opts.force_overwrite)
        .open(&out_path)?;
    let written = write_artifact(&compressed, f_out)?;
    timer.mark("write");
    info!("Wrote {} bytes to {}.", written, out_path);

    Ok(Some(CompressStats {
        original: data.len() as u64,
        compressed: written as u64,
    }))
}

#[cfg(test)]
mod test {
    use super::{compress_data, encode, write_artifact};
    use crate::bitstream::bitwriter::HEADER_LEN;
    use crate::error::HuffError;
    use crate::huffman_coding::code_table::CodeTable;
    use crate::huffman_coding::huffman::build_tree;
    use crate::tools::freq_count::freqs;

    #[test]
    fn aaabbc_encode_test() {
        let table = CodeTable::from_tree(&build_tree(&freqs(b"aaabbc")).unwrap());
        // 0 0 0 11 11 10, then seven bits of padding
        assert_eq!(encode(b"aaabbc", &table).unwrap(), [0b0001_1111, 0b0000_0000]);
    }

    #[test]
    fn unknown_symbol_test() {
        let table = CodeTable::from_tree(&build_tree(&freqs(b"aaabbc")).unwrap());
        assert!(matches!(
            encode(b"abcd", &table),
            Err(HuffError::UnknownSymbol(b'd'))
        ));
    }

    #[test]
    fn empty_input_test() {
        assert_eq!(compress_data(&[]).unwrap(), None);
    }

    #[test]
    fn single_symbol_test() {
        let compressed = compress_data(b"qqqqqqqqqq").unwrap().unwrap();
        assert_eq!(compressed.symbols, 10);
        assert_eq!(compressed.table.get(b'q').map(|c| c.to_string()), Some("1".to_string()));
        // Ten one bit codes: 1111_1111 11
        assert_eq!(compressed.data, [0xff, 0xc0]);
    }

    #[test]
    fn artifact_size_test() {
        let compressed = compress_data(b"aaabbc").unwrap().unwrap();
        let mut out = Vec::new();
        let written = write_artifact(&compressed, &mut out).unwrap();
        // header + 15 byte table + 2 byte payload
        assert_eq!(written, HEADER_LEN + 15 + 2);
        assert_eq!(out.len(), written);
    }
}
