//! Error type shared by the coding core and the file layer.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffError>;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, Error)]
pub enum HuffError {
    /// The tree builder was handed an empty frequency table. Compressing empty
    /// input is a no-op, so callers check for it before building a tree.
    #[error("no symbols to encode")]
    EmptyInput,

    /// The encoder met a byte that has no code in the table it was given.
    #[error("symbol {0:#04x} is not in the code table")]
    UnknownSymbol(u8),

    /// The bitstream ran out before the expected number of symbols was decoded.
    #[error("bitstream truncated: decoded {decoded} of {expected} symbols")]
    TruncatedStream { expected: u64, decoded: u64 },

    /// The bitstream contains a bit path that no code in the table matches.
    /// Only part of the table/payload mismatches can be detected this way; decoding
    /// with a table that was not used to encode the payload is a caller error.
    #[error("bitstream does not match the code table at symbol {position}")]
    CodeTableMismatch { position: u64 },

    /// A serialized code table could not be read back.
    #[error("invalid code table: {0}")]
    InvalidCodeTable(String),

    /// A compressed file has a bad header or layout.
    #[error("invalid compressed file: {0}")]
    InvalidArtifact(String),

    /// File layer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
