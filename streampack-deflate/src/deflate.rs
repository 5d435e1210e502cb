//! DEFLATE compression.
//!
//! The default mode streams one fixed-Huffman block: the header goes out
//! with the first input, literals and back-references follow as input
//! arrives, and completion emits the end-of-block symbol and pads to a
//! byte. Stored mode buffers its input and writes byte-aligned stored
//! blocks on completion.

use crate::lz77::{Lz77Window, MAX_MATCH, MIN_MATCH};
use crate::tables::{
    END_OF_BLOCK, distance_to_symbol, fixed_distance_encoder, fixed_litlen_encoder,
    length_to_symbol,
};
use streampack_core::bitseq::BitSeq;
use streampack_core::error::Result;
use streampack_core::push::{PushStream, run_to_end};

/// Largest payload of a single stored block.
const MAX_STORED_BLOCK: usize = 65535;

/// Block strategy for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    /// One streaming block of fixed Huffman codes.
    Fixed,
    /// Byte-aligned stored blocks, no compression.
    Stored,
}

/// Push-stream DEFLATE compressor.
#[derive(Debug)]
pub struct Deflater {
    mode: BlockMode,
    /// Accepted input; also the back-reference search window.
    window: Lz77Window,
    /// Next window position to encode.
    emit_pos: usize,
    out: BitSeq,
    /// Bytes of `out` already handed to the caller.
    flushed: usize,
    header_written: bool,
    finished: bool,
}

impl Deflater {
    /// Create a compressor producing a fixed-Huffman block.
    pub fn new() -> Self {
        Self::with_mode(BlockMode::Fixed)
    }

    /// Create a compressor producing stored blocks only.
    pub fn stored() -> Self {
        Self::with_mode(BlockMode::Stored)
    }

    fn with_mode(mode: BlockMode) -> Self {
        Self {
            mode,
            window: Lz77Window::new(),
            emit_pos: 0,
            out: BitSeq::lsb(),
            flushed: 0,
            header_written: false,
            finished: false,
        }
    }

    /// Append a Huffman code, most significant bit first, then any extra
    /// bits in little-endian order.
    fn write_coded(&mut self, symbol: u16, extra: u16, extra_bits: u8, distance: bool) {
        let encoder = if distance {
            fixed_distance_encoder()
        } else {
            fixed_litlen_encoder()
        };
        encoder.append_code(symbol, &mut self.out);
        if extra_bits > 0 {
            self.out.append_bits(extra as u32, extra_bits);
        }
    }

    fn push_fixed(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        if !self.header_written {
            self.out.push(true); // the one block is also the last
            self.out.append_bits(0b01, 2);
            self.header_written = true;
        }
        self.window.extend(data);

        let end = self.window.len();
        while self.emit_pos < end {
            // Until the input is complete, decisions stand only where no
            // future byte can lengthen the match.
            if !complete && end - self.emit_pos < MAX_MATCH {
                break;
            }
            self.window.index_up_to(self.emit_pos);

            match self.window.find_match(self.emit_pos) {
                Some((length, distance)) => {
                    debug_assert!(length >= MIN_MATCH);
                    let (symbol, extra_bits, extra) = length_to_symbol(length as u16);
                    self.write_coded(symbol, extra, extra_bits, false);
                    let (symbol, extra_bits, extra) = distance_to_symbol(distance as u16);
                    self.write_coded(symbol, extra, extra_bits, true);
                    self.emit_pos += length;
                }
                None => {
                    let literal = self.window.byte(self.emit_pos) as u16;
                    self.write_coded(literal, 0, 0, false);
                    self.emit_pos += 1;
                }
            }
        }

        if complete {
            self.write_coded(END_OF_BLOCK, 0, 0, false);
            self.out.pad_to_byte();
            self.finished = true;
        }
        Ok(data.len())
    }

    fn push_stored(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        self.window.extend(data);
        if complete {
            let total = self.window.len();
            if total == 0 {
                self.write_stored_header(true, 0);
            }
            let mut offset = 0;
            while offset < total {
                let block = (total - offset).min(MAX_STORED_BLOCK);
                self.write_stored_header(offset + block == total, block as u16);
                self.out.append_bytes(&self.window.bytes()[offset..offset + block]);
                offset += block;
            }
            self.finished = true;
        }
        Ok(data.len())
    }

    fn write_stored_header(&mut self, last: bool, length: u16) {
        self.out.push(last);
        self.out.append_bits(0b00, 2);
        self.out.pad_to_byte();
        self.out.append_bits(length as u32, 16);
        self.out.append_bits(!length as u32, 16);
    }
}

impl Default for Deflater {
    fn default() -> Self {
        Self::new()
    }
}

impl PushStream for Deflater {
    fn push(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        if self.finished {
            return Ok(0);
        }
        match self.mode {
            BlockMode::Fixed => self.push_fixed(data, complete),
            BlockMode::Stored => self.push_stored(data, complete),
        }
    }

    fn take_output(&mut self) -> Vec<u8> {
        let end = if self.finished {
            self.out.byte_len()
        } else {
            self.out.len() / 8
        };
        let bytes = self.out.as_bytes()[self.flushed..end].to_vec();
        self.flushed = end;
        bytes
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Compress `data` into a fixed-Huffman DEFLATE stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    run_to_end(&mut Deflater::new(), data)
}

/// Wrap `data` in stored DEFLATE blocks without compressing it.
pub fn deflate_stored(data: &[u8]) -> Result<Vec<u8>> {
    run_to_end(&mut Deflater::stored(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflate::inflate;

    #[test]
    fn test_empty_fixed_stream() {
        assert_eq!(deflate(b"").unwrap(), [0x03, 0x00]);
    }

    #[test]
    fn test_stored_roundtrip() {
        let input = b"Hello, World!";
        let compressed = deflate_stored(input).unwrap();
        assert_eq!(compressed.len(), input.len() + 5);
        assert_eq!(inflate(&compressed).unwrap(), input);
    }

    #[test]
    fn test_stored_empty() {
        let compressed = deflate_stored(b"").unwrap();
        assert_eq!(compressed, [0x01, 0x00, 0x00, 0xFF, 0xFF]);
        assert!(inflate(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_stored_splits_large_input() {
        let input = vec![0x5Au8; MAX_STORED_BLOCK + 17];
        let compressed = deflate_stored(&input).unwrap();
        // Two block headers of five bytes each.
        assert_eq!(compressed.len(), input.len() + 10);
        assert_eq!(inflate(&compressed).unwrap(), input);
    }

    #[test]
    fn test_compresses_repetition() {
        let input = b"AAAAAAAAAABBBBBBBBBBCCCCCCCCCC";
        let compressed = deflate(input).unwrap();
        assert!(compressed.len() < input.len());
        assert_eq!(inflate(&compressed).unwrap(), input);
    }

    #[test]
    fn test_roundtrip_various_inputs() {
        let inputs: Vec<Vec<u8>> = vec![
            b"Hello".to_vec(),
            b"The quick brown fox jumps over the lazy dog".to_vec(),
            vec![0u8; 1000],
            (0..=255).collect(),
            (0..=255).cycle().take(5000).collect(),
        ];
        for input in &inputs {
            let compressed = deflate(input).unwrap();
            assert_eq!(&inflate(&compressed).unwrap(), input);
            let stored = deflate_stored(input).unwrap();
            assert_eq!(&inflate(&stored).unwrap(), input);
        }
    }

    #[test]
    fn test_max_length_matches() {
        // Runs long enough to need repeated 258-byte references.
        let input = vec![42u8; 258 * 10];
        let compressed = deflate(&input).unwrap();
        assert_eq!(inflate(&compressed).unwrap(), input);
    }
}
