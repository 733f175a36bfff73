use log::error;

use crate::huffman_coding::code_table::Code;

/// Creates a bitstream for output.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Count of meaningful bits in the final byte after flush(). Zero means the byte is full.
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified (in bytes). Call
    /// flush() to push the partial byte left in the queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.queue <<= 1;
        self.queue |= bit as u64;
        self.q_bits += 1;
        self.write_stream();
    }

    /// Puts every bit of a Huffman code on the stream, first bit first.
    pub fn out_code(&mut self, code: &Code) {
        code.bits().iter().for_each(|&bit| self.out_bit(bit));
    }

    /// Puts a byte of pre-packed data on the stream.
    pub fn out8(&mut self, data: u8) {
        self.queue <<= 8;
        self.queue |= data as u64;
        self.q_bits += 8;
        self.write_stream();
    }

    /// Puts a big endian 16 bit word on the stream.
    pub fn out16(&mut self, data: u16) {
        data.to_be_bytes().iter().for_each(|&b| self.out8(b));
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits. Also used to realign the stream on a byte boundary.
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Total number of bits put on the stream so far, padding excluded.
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]", self.bit_len() / 8, self.bit_len() % 8}
    }
}

/// Packs a bit-string into bytes, MSB first, zero padding the last byte.
/// Returns ceil(bits.len() / 8) bytes.
pub fn pack(bits: &[bool]) -> Vec<u8> {
    let mut bp = BitPacker::new((bits.len() + 7) / 8);
    bits.iter().for_each(|&bit| bp.out_bit(bit));
    bp.flush();
    bp.output
}
