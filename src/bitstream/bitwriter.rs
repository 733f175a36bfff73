use std::io::Write;

use log::trace;

/// Magic bytes that open every compressed file.
pub const MAGIC: &[u8; 3] = b"HUF";
/// Layout version written after the magic.
pub const VERSION: u8 = 1;
/// Size of the fixed part of the header: magic, version, symbol count, table length.
pub const HEADER_LEN: usize = 3 + 1 + 8 + 4;

/// Writes a compressed file. Takes the code table and the payload packed by BitPacker and
/// assembles them behind the header, then writes everything to the output stream.
pub struct BitWriter<W> {
    /// Output buffer used to assemble the file.
    output: Vec<u8>,
    /// Handle to the output stream
    writer: W,
    /// Set once the header has been pushed.
    header_done: bool,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over the given output stream. Use push_header() first, then
    /// add_payload(), then finish().
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::new(),
            writer,
            header_done: false,
        }
    }

    /// Push the header and serialized code table to the output buffer.
    pub fn push_header(&mut self, symbols: u64, table: &[u8]) {
        self.output.reserve(HEADER_LEN + table.len());
        self.output.extend_from_slice(MAGIC);
        self.output.push(VERSION);
        self.output.extend_from_slice(&symbols.to_be_bytes());
        self.output
            .extend_from_slice(&(table.len() as u32).to_be_bytes());
        self.output.extend_from_slice(table);
        self.header_done = true;
        trace!(
            "Header written: {} symbols, {} byte code table.",
            symbols,
            table.len()
        );
    }

    /// Add the packed bitstream. The header must already be on the buffer.
    pub fn add_payload(&mut self, data: &[u8]) -> Result<(), std::io::Error> {
        if !self.header_done {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "payload added before the header",
            ));
        }
        self.output.extend_from_slice(data);
        Ok(())
    }

    /// Write the assembled file to the output stream. Returns the number of bytes written.
    pub fn finish(mut self) -> Result<usize, std::io::Error> {
        self.writer.write_all(&self.output)?;
        self.writer.flush()?;
        Ok(self.output.len())
    }
}
