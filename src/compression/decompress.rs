use std::fs::{self, OpenOptions};
use std::io::Write;

use log::{debug, error, info, trace};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::{MAGIC, VERSION};
use crate::compression::compress::Compressed;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::huffman::{Node, NodeData};
use crate::tools::cli::HufOpts;
use crate::tools::timer::Timer;

const EOF_MESSAGE: &str = "unexpected end of file";

/// Decode `count` symbols from `packed` by walking the tree: 0 goes left, 1 goes right, and
/// reaching a leaf emits its symbol and restarts at the root.
///
/// A tree that is a single leaf needs no bits at all; its symbol is emitted `count` times,
/// or InvalidArtifact is returned if that many bytes cannot be allocated.
/// Fails with TruncatedStream if the bits run out first.
pub fn decode_with_tree(packed: &[u8], root: &Node, count: u64) -> Result<Vec<u8>> {
    if let NodeData::Leaf(symbol) = root.node_data {
        let too_many =
            || HuffError::InvalidArtifact(format!("{} symbols do not fit in memory", count));
        let len = usize::try_from(count).map_err(|_| too_many())?;
        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(|_| too_many())?;
        out.resize(len, symbol);
        return Ok(out);
    }
    let mut br = BitReader::new(packed);
    // Every symbol takes at least one bit
    let mut out = Vec::with_capacity(capacity(count, br.bits_left()));
    while (out.len() as u64) < count {
        let mut node = root;
        while let NodeData::Kids(left, right) = &node.node_data {
            node = match br.bool_bit() {
                Some(false) => &**left,
                Some(true) => &**right,
                None => {
                    return Err(HuffError::TruncatedStream {
                        expected: count,
                        decoded: out.len() as u64,
                    })
                }
            };
        }
        if let NodeData::Leaf(symbol) = node.node_data {
            out.push(symbol);
        }
    }
    trace!("Tree decode stopped at {} with {} bits left.", br.loc(), br.bits_left());
    Ok(out)
}

/// Decode `count` symbols from `packed` using the code table alone.
///
/// The table must be the one the payload was encoded with. A bit path that grows past the
/// longest code without matching gives CodeTableMismatch; other mismatches decode to garbage.
pub fn decode_with_table(packed: &[u8], table: &CodeTable, count: u64) -> Result<Vec<u8>> {
    let mut br = BitReader::new(packed);
    decode_codes(&mut br, table, count)
}

/// Table driven decode loop, leaving the reader just past the last symbol.
fn decode_codes(br: &mut BitReader<'_>, table: &CodeTable, count: u64) -> Result<Vec<u8>> {
    let lookup = table.invert();
    let max_len = table.max_len();
    let mut out = Vec::with_capacity(capacity(count, br.bits_left()));
    let mut code = Code::new();
    while (out.len() as u64) < count {
        let bit = br.bool_bit().ok_or(HuffError::TruncatedStream {
            expected: count,
            decoded: out.len() as u64,
        })?;
        code.push(bit);
        if let Some(&symbol) = lookup.get(&code) {
            out.push(symbol);
            code.clear();
        } else if code.len() >= max_len {
            error!("No code matches {} at {}.", code, br.loc());
            return Err(HuffError::CodeTableMismatch {
                position: out.len() as u64,
            });
        }
    }
    Ok(out)
}

/// Output capacity for `count` symbols, bounded by the bits actually available.
fn capacity(count: u64, bits_left: usize) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX).min(bits_left)
}

/// Split a compressed file into its header fields, code table and payload.
pub fn read_artifact(bytes: &[u8]) -> Result<Compressed> {
    let eof = || HuffError::InvalidArtifact(EOF_MESSAGE.to_string());
    let mut br = BitReader::new(bytes);

    // Look for a valid signature.
    if br.bytes(3).ok_or_else(eof)? != MAGIC {
        return Err(HuffError::InvalidArtifact(
            "not a huffman compressed file".to_string(),
        ));
    }
    let version = br.byte().ok_or_else(eof)?;
    if version != VERSION {
        return Err(HuffError::InvalidArtifact(format!(
            "unsupported version {}",
            version
        )));
    }
    let high = br.bint(32).ok_or_else(eof)? as u64;
    let low = br.bint(32).ok_or_else(eof)? as u64;
    let symbols = high << 32 | low;
    let table_len = br.bint(32).ok_or_else(eof)?;
    let table = CodeTable::deserialize(&br.bytes(table_len).ok_or_else(eof)?)?;
    let data = br.remaining().ok_or_else(eof)?.to_vec();
    debug!(
        "Header: {} symbols, {} codes, {} payload bytes.",
        symbols,
        table.len(),
        data.len()
    );

    Ok(Compressed {
        table,
        symbols,
        data,
    })
}

/// Restore the original bytes from a compressed file held in memory. Besides decoding, checks
/// that the payload ends with at most one byte of zero padding.
pub fn decompress_data(bytes: &[u8]) -> Result<Vec<u8>> {
    let compressed = read_artifact(bytes)?;
    let mut br = BitReader::new(&compressed.data);
    let out = decode_codes(&mut br, &compressed.table, compressed.symbols)?;

    let left = br.bits_left();
    if left >= 8 {
        return Err(HuffError::InvalidArtifact(format!(
            "{} bytes of trailing data",
            left / 8
        )));
    }
    if br.bint(left) != Some(0) {
        return Err(HuffError::InvalidArtifact(
            "padding bits are not zero".to_string(),
        ));
    }
    Ok(out)
}

/// Decompress the file named in opts. Returns the number of bytes restored.
pub fn decompress(opts: &HufOpts, timer: &mut Timer) -> Result<u64> {
    let out = read_and_decode(opts, timer)?;

    let out_path = opts.output_path().ok_or_else(|| {
        HuffError::InvalidArtifact("no output file for decompression".to_string())
    })?;
    let mut f_out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!opts.force_overwrite)
        .open(&out_path)?;
    f_out.write_all(&out)?;
    f_out.flush()?;
    timer.mark("write");
    info!("Wrote {} bytes to {}.", out.len(), out_path);

    Ok(out.len() as u64)
}

/// Check that the file named in opts decompresses cleanly, without writing anything.
pub fn test_integrity(opts: &HufOpts, timer: &mut Timer) -> Result<u64> {
    let out = read_and_decode(opts, timer)?;
    info!("{}: ok, {} bytes.", opts.origin, out.len());
    Ok(out.len() as u64)
}

fn read_and_decode(opts: &HufOpts, timer: &mut Timer) -> Result<Vec<u8>> {
    let bytes = fs::read(&opts.origin)?;
    timer.mark("read");
    info!("Read {} bytes from {}.", bytes.len(), opts.origin);

    let out = decompress_data(&bytes).map_err(|e| {
        error!("Fatal error: {} could not be decompressed.", opts.origin);
        e
    })?;
    timer.mark("decode");
    Ok(out)
}
