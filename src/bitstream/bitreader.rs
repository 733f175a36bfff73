//! BitReader: reads a packed bitstream back out of a byte buffer.
//!
//! Bits are read most significant bit first, the same order BitPacker writes them. Every read
//! returns None once the buffer is exhausted instead of panicking, so callers decide what a
//! short stream means.
//!

const BIT_MASK: u8 = 0x80;

/// Reads bits, integers and bytes from a packed buffer.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader positioned on the first bit of the buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Number of bits not yet read, including any padding in the final byte.
    pub fn bits_left(&self) -> usize {
        (self.buffer.len() - self.cursor) * 8 - self.bit_index
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        let byte = *self.buffer.get(self.cursor)?;
        let bit = (byte & (BIT_MASK >> self.bit_index)) >> (7 - self.bit_index);
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<usize> of the next n bits (n <= 64), or None if fewer than n bits are left.
    /// Nothing is consumed when None is returned.
    pub fn bint(&mut self, n: usize) -> Option<usize> {
        if n > usize::BITS as usize || n > self.bits_left() {
            return None;
        }
        let mut result = 0_usize;
        for _ in 0..n {
            result = result << 1 | self.bit()?;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if fewer than n bytes are left.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if n * 8 > self.bits_left() {
            return None;
        }
        // Aligned reads can copy straight out of the buffer
        if self.bit_index == 0 {
            let out = self.buffer[self.cursor..self.cursor + n].to_vec();
            self.cursor += n;
            return Some(out);
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// Skips any bits left in the current byte so the next read starts on a byte boundary.
    pub fn align(&mut self) {
        if self.bit_index > 0 {
            self.bit_index = 0;
            self.cursor += 1;
        }
    }

    /// Returns the unread bytes when the reader is byte aligned, None otherwise.
    pub fn remaining(&self) -> Option<&'a [u8]> {
        if self.bit_index == 0 {
            Some(&self.buffer[self.cursor..])
        } else {
            None
        }
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

/// Unpacks a byte buffer into its full bit-string, 8 bits per byte, MSB first. Padding bits
/// are included; it is up to the decoder to stop before them.
pub fn unpack(bytes: &[u8]) -> Vec<bool> {
    let mut br = BitReader::new(bytes);
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    while let Some(bit) = br.bool_bit() {
        bits.push(bit);
    }
    bits
}
