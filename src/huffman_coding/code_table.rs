//! Code table derivation and persistence.
//!
//! The code table maps each symbol to its root-to-leaf path in the Huffman tree. It is the key
//! needed to decode a payload, so it is serialized into the compressed file. The serialized
//! form is versioned and self delimiting:
//!
//! ```text
//! "HCT" | version u8 | entry count u16 BE | entries in ascending symbol order
//! entry: symbol u8 | code length u8 | code bits, MSB first, zero padded to a byte
//! ```
//!

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::huffman::{Node, NodeData};
use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};

const TABLE_MAGIC: &[u8; 3] = b"HCT";
const TABLE_VERSION: u8 = 1;
/// Longest code a 256 symbol alphabet can produce.
pub const MAX_CODE_LEN: usize = 255;

/// A Huffman code: the bits on the path from the root to a leaf, first edge first.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit)
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop()
    }

    pub fn clear(&mut self) {
        self.bits.clear()
    }

    /// True when every bit of self starts `other`. A code is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.bits
            .iter()
            .try_for_each(|&bit| write!(f, "{}", if bit { '1' } else { '0' }))
    }
}

impl FromStr for Code {
    type Err = HuffError;

    /// Parse a string of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(HuffError::InvalidCodeTable(format!(
                    "'{}' is not a binary digit",
                    other
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Code::from)
    }
}

/// Maps every symbol of an alphabet to its Huffman code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walk the tree and record the path to every leaf. A tree that is a single leaf gets
    /// the one bit code "1", since its natural path is empty.
    pub fn from_tree(root: &Node) -> CodeTable {
        let mut codes = BTreeMap::new();
        if let NodeData::Leaf(symbol) = root.node_data {
            codes.insert(symbol, Code::from(vec![true]));
        } else {
            let mut path = Code::new();
            return_leaves(root, &mut path, &mut codes);
        }
        let table = CodeTable { codes };
        debug!(
            "Derived {} codes, longest is {} bits.",
            table.len(),
            table.max_len()
        );
        table
    }

    /// Build a table from explicit (symbol, code) pairs. The result must be prefix free and
    /// have no empty or overlong codes.
    pub fn from_codes<I: IntoIterator<Item = (u8, Code)>>(pairs: I) -> Result<CodeTable> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in pairs {
            if code.is_empty() || code.len() > MAX_CODE_LEN {
                return Err(HuffError::InvalidCodeTable(format!(
                    "code for {:#04x} has length {}",
                    symbol,
                    code.len()
                )));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(HuffError::InvalidCodeTable(format!(
                    "symbol {:#04x} appears twice",
                    symbol
                )));
            }
        }
        let table = CodeTable { codes };
        if table.is_empty() {
            return Err(HuffError::InvalidCodeTable("no codes".to_string()));
        }
        if !table.is_prefix_free() {
            return Err(HuffError::InvalidCodeTable(
                "codes are not prefix free".to_string(),
            ));
        }
        Ok(table)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&sym, code)| (sym, code))
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Code to symbol lookup used by the table driven decoder.
    pub fn invert(&self) -> FxHashMap<Code, u8> {
        self.codes
            .iter()
            .map(|(&sym, code)| (code.clone(), sym))
            .collect()
    }

    /// True when no code is a prefix of (or equal to) another.
    pub fn is_prefix_free(&self) -> bool {
        // In sorted order a prefix always sits directly before some code it prefixes.
        let mut sorted = self.codes.values().collect::<Vec<&Code>>();
        sorted.sort_unstable();
        sorted.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    /// Serialize the table into its versioned binary form.
    pub fn serialize(&self) -> Vec<u8> {
        let size = 6 + self.codes.values().map(|c| 2 + (c.len() + 7) / 8).sum::<usize>();
        let mut bp = BitPacker::new(size);
        TABLE_MAGIC.iter().for_each(|&b| bp.out8(b));
        bp.out8(TABLE_VERSION);
        bp.out16(self.codes.len() as u16);
        for (&symbol, code) in &self.codes {
            bp.out8(symbol);
            bp.out8(code.len() as u8);
            bp.out_code(code);
            // Each entry starts on a byte boundary
            bp.flush();
        }
        trace!("Serialized code table in {} bytes.", bp.output.len());
        bp.output
    }

    /// Read a table written by serialize(). Every structural problem is reported as
    /// InvalidCodeTable; the bytes must hold exactly one table.
    pub fn deserialize(data: &[u8]) -> Result<CodeTable> {
        let truncated = || HuffError::InvalidCodeTable("table data is truncated".to_string());
        let mut br = BitReader::new(data);

        let magic = br.bytes(3).ok_or_else(truncated)?;
        if magic != TABLE_MAGIC {
            return Err(HuffError::InvalidCodeTable("bad magic".to_string()));
        }
        let version = br.byte().ok_or_else(truncated)?;
        if version != TABLE_VERSION {
            return Err(HuffError::InvalidCodeTable(format!(
                "unsupported version {}",
                version
            )));
        }
        let count = br.bint(16).ok_or_else(truncated)?;
        if !(1..=256).contains(&count) {
            return Err(HuffError::InvalidCodeTable(format!(
                "entry count {} out of range",
                count
            )));
        }

        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let symbol = br.byte().ok_or_else(truncated)?;
            let len = br.byte().ok_or_else(truncated)? as usize;
            let mut code = Code::new();
            for _ in 0..len {
                code.push(br.bool_bit().ok_or_else(truncated)?);
            }
            br.align();
            pairs.push((symbol, code));
        }
        if br.bits_left() > 0 {
            return Err(HuffError::InvalidCodeTable(format!(
                "{} trailing bytes",
                br.bits_left() / 8
            )));
        }
        CodeTable::from_codes(pairs)
    }
}

/// Recursively walk the tree, extending the path by 0 for each left edge and 1 for each
/// right edge, and record the path at every leaf.
fn return_leaves(node: &Node, path: &mut Code, codes: &mut BTreeMap<u8, Code>) {
    match &node.node_data {
        NodeData::Kids(left_child, right_child) => {
            path.push(false);
            return_leaves(left_child, path, codes);
            path.pop();
            path.push(true);
            return_leaves(right_child, path, codes);
            path.pop();
        }
        NodeData::Leaf(symbol) => {
            codes.insert(*symbol, path.clone());
        }
    };
}

#[cfg(test)]
mod test {
    use super::{Code, CodeTable};
    use crate::error::HuffError;
    use crate::huffman_coding::huffman::build_tree;
    use crate::tools::freq_count::freqs;

    fn table_of(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&build_tree(&freqs(data)).unwrap())
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn aaabbc_codes_test() {
        let table = table_of("aaabbc".as_bytes());
        assert_eq!(table.get(b'a'), Some(&code("0")));
        assert_eq!(table.get(b'c'), Some(&code("10")));
        assert_eq!(table.get(b'b'), Some(&code("11")));
        assert_eq!(table.get(b'd'), None);
        assert_eq!(table.max_len(), 2);
    }

    #[test]
    fn single_symbol_test() {
        let table = table_of("xxxxxxx".as_bytes());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'x'), Some(&code("1")));
    }

    #[test]
    fn prefix_free_test() {
        let data = "It was the best of times, it was the worst of times.".as_bytes();
        let table = table_of(data);
        assert!(table.is_prefix_free());
        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(!code_a.is_prefix_of(code_b), "{} prefixes {}", code_a, code_b);
                }
            }
        }
    }

    #[test]
    fn frequent_symbols_are_shorter_test() {
        let table = table_of("eeeeeeeeeeeeeeeettaz".as_bytes());
        let e = table.get(b'e').unwrap().len();
        let z = table.get(b'z').unwrap().len();
        assert!(e < z);
    }

    #[test]
    fn display_and_parse_test() {
        assert_eq!(code("0110").to_string(), "0110");
        assert!(matches!(
            "012".parse::<Code>(),
            Err(HuffError::InvalidCodeTable(_))
        ));
    }

    #[test]
    fn serialize_test() {
        let table = table_of("aaabbc".as_bytes());
        let bytes = table.serialize();
        assert_eq!(
            bytes,
            [
                b'H', b'C', b'T', 1, 0, 3, // header
                b'a', 1, 0b0000_0000, // a = 0
                b'b', 2, 0b1100_0000, // b = 11
                b'c', 2, 0b1000_0000, // c = 10
            ]
        );
        assert_eq!(CodeTable::deserialize(&bytes).unwrap(), table);
    }

    #[test]
    fn serialize_long_codes_test() {
        // Fibonacci weights give a maximally skewed tree with codes longer than a byte
        let mut data = Vec::new();
        let (mut x, mut y) = (1_usize, 1_usize);
        for sym in 0..14_u8 {
            data.extend(std::iter::repeat(sym).take(x));
            (x, y) = (y, x + y);
        }
        let table = table_of(&data);
        assert_eq!(table.max_len(), 13);
        assert_eq!(CodeTable::deserialize(&table.serialize()).unwrap(), table);
    }

    #[test]
    fn deserialize_rejects_test() {
        let good = table_of("aaabbc".as_bytes()).serialize();

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        assert!(CodeTable::deserialize(&bad_magic).is_err());

        let mut bad_version = good.clone();
        bad_version[3] = 9;
        assert!(CodeTable::deserialize(&bad_version).is_err());

        assert!(CodeTable::deserialize(&good[..good.len() - 1]).is_err());

        let mut trailing = good.clone();
        trailing.push(0);
        assert!(CodeTable::deserialize(&trailing).is_err());

        // Turn b's code into 0, which collides with a's
        let mut not_prefix_free = good.clone();
        not_prefix_free[11] = 0;
        assert!(CodeTable::deserialize(&not_prefix_free).is_err());

        // Zero length code
        let mut empty_code = good;
        empty_code[7] = 0;
        assert!(matches!(
            CodeTable::deserialize(&empty_code),
            Err(HuffError::InvalidCodeTable(_))
        ));
    }

    #[test]
    fn from_codes_test() {
        let table = CodeTable::from_codes(vec![(b'x', code("0")), (b'y', code("10"))]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(CodeTable::from_codes(vec![(b'x', code("0")), (b'y', code("01"))]).is_err());
        assert!(CodeTable::from_codes(vec![(b'x', code("0")), (b'x', code("1"))]).is_err());
        assert!(CodeTable::from_codes(Vec::new()).is_err());
    }
}
