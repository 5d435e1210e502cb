//! DEFLATE decompression (inflate).
//!
//! The decoder is an explicit state machine over the RFC 1951 block
//! grammar, driven through the push-stream contract. Every piece of parse
//! state — the bit buffer, a partially accumulated Huffman code, block
//! parameters, half-read dynamic tables — lives in the instance, so a bit,
//! a symbol, or a whole block may span push boundaries.

use crate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_EXTRA_BITS, END_OF_BLOCK, LENGTH_EXTRA_BITS, decode_distance,
    decode_length, fixed_distance_decoder, fixed_litlen_decoder,
};
use streampack_core::error::{CodecError, Result};
use streampack_core::push::{PushStream, run_to_end};
use streampack_huffman::{HuffmanDecoder, Lookup};

/// Where the decoder is in the block grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    BlockHeader,
    StoredLength,
    StoredData,
    DynamicTableSizes,
    DynamicWidthTable,
    DynamicWidth,
    DynamicWidthRepeat,
    DynamicZeroRunShort,
    DynamicZeroRunLong,
    LiteralLength,
    LengthExtra,
    DistanceSymbol,
    DistanceExtra,
    Done,
}

/// LSB-first bit extraction with a partial Huffman code carried across
/// calls.
#[derive(Debug, Default)]
struct BitCursor {
    buffer: u8,
    count: u8,
    /// Huffman code bits accumulated so far, first bit most significant.
    code: u16,
    code_width: u8,
}

impl BitCursor {
    /// Bits available between the buffer and the unconsumed input.
    fn remaining_bits(&self, data: &[u8], offset: usize) -> usize {
        self.count as usize + (data.len() - offset) * 8
    }

    /// Drop buffered bits so reading resumes at a byte boundary.
    fn byte_align(&mut self) {
        self.buffer = 0;
        self.count = 0;
    }

    /// Read one bit. The caller has checked availability.
    fn read_bit(&mut self, data: &[u8], offset: &mut usize) -> u8 {
        if self.count == 0 {
            self.buffer = data[*offset];
            self.count = 8;
            *offset += 1;
        }
        let bit = self.buffer & 0x01;
        self.buffer >>= 1;
        self.count -= 1;
        bit
    }

    /// Read a `width`-bit little-endian integer. The caller has checked
    /// availability.
    fn read_int(&mut self, width: u8, data: &[u8], offset: &mut usize) -> u16 {
        let mut value = 0u16;
        for i in 0..width {
            value |= (self.read_bit(data, offset) as u16) << i;
        }
        value
    }

    /// Accumulate bits against `decoder` until a symbol matches or input
    /// runs out. The partial code survives in the cursor.
    fn read_symbol(
        &mut self,
        decoder: &HuffmanDecoder,
        context: &'static str,
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<u16>> {
        while self.remaining_bits(data, *offset) > 0 {
            let bit = self.read_bit(data, offset);
            self.code = (self.code << 1) | bit as u16;
            self.code_width += 1;
            match decoder.lookup(self.code, self.code_width) {
                Lookup::Symbol(symbol) => {
                    self.code = 0;
                    self.code_width = 0;
                    return Ok(Some(symbol));
                }
                Lookup::Incomplete => {}
                Lookup::Invalid => return Err(CodecError::malformed_bit_pattern(context)),
            }
        }
        Ok(None)
    }
}

/// Push-stream DEFLATE decompressor.
#[derive(Debug)]
pub struct Inflater {
    state: DecodeState,
    bits: BitCursor,
    /// True while decoding the final block of the stream.
    last_block: bool,

    // Dynamic table transmission.
    n_litlen: usize,
    n_distance: usize,
    n_width_codes: usize,
    width_decoder: Option<HuffmanDecoder>,
    pending_widths: Vec<u8>,

    // Current stored length or back-reference being assembled.
    length: u16,
    length_symbol: u16,
    distance_symbol: u16,

    litlen_decoder: Option<HuffmanDecoder>,
    distance_decoder: Option<HuffmanDecoder>,

    /// All bytes produced so far. The whole history stays resident because
    /// it doubles as the back-reference window.
    output: Vec<u8>,
    /// Prefix of `output` already handed to the caller.
    taken: usize,
}

impl Inflater {
    /// Create a decoder positioned before the first block header.
    pub fn new() -> Self {
        Self {
            state: DecodeState::BlockHeader,
            bits: BitCursor::default(),
            last_block: false,
            n_litlen: 0,
            n_distance: 0,
            n_width_codes: 0,
            width_decoder: None,
            pending_widths: Vec::new(),
            length: 0,
            length_symbol: 0,
            distance_symbol: 0,
            litlen_decoder: None,
            distance_decoder: None,
            output: Vec::new(),
            taken: 0,
        }
    }

    /// All bytes decoded so far, including any already taken.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn read_block_header(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 3 {
            return Ok(false);
        }
        self.last_block = self.bits.read_bit(data, offset) == 1;
        let block_type = self.bits.read_int(2, data, offset) as u8;
        match block_type {
            0 => {
                // Stored blocks are byte aligned; partial bits are dropped.
                self.bits.byte_align();
                self.state = DecodeState::StoredLength;
            }
            1 => {
                self.litlen_decoder = Some(fixed_litlen_decoder().clone());
                self.distance_decoder = Some(fixed_distance_decoder().clone());
                self.state = DecodeState::LiteralLength;
            }
            2 => self.state = DecodeState::DynamicTableSizes,
            _ => return Err(CodecError::invalid_block_type(block_type)),
        }
        Ok(true)
    }

    fn read_stored_length(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if data.len() - *offset < 4 {
            return Ok(false);
        }
        let length = u16::from_le_bytes([data[*offset], data[*offset + 1]]);
        let complement = u16::from_le_bytes([data[*offset + 2], data[*offset + 3]]);
        if length != !complement {
            return Err(CodecError::stored_length_mismatch(length, complement));
        }
        self.length = length;
        *offset += 4;
        self.state = DecodeState::StoredData;
        Ok(true)
    }

    fn read_stored_data(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let length = self.length as usize;
        if data.len() - *offset < length {
            return Ok(false);
        }
        self.output.extend_from_slice(&data[*offset..*offset + length]);
        *offset += length;
        self.end_block();
        Ok(true)
    }

    fn read_dynamic_table_sizes(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 14 {
            return Ok(false);
        }
        self.n_litlen = 257 + self.bits.read_int(5, data, offset) as usize;
        self.n_distance = 1 + self.bits.read_int(5, data, offset) as usize;
        self.n_width_codes = 4 + self.bits.read_int(4, data, offset) as usize;
        self.pending_widths.clear();
        self.litlen_decoder = None;
        self.distance_decoder = None;
        self.state = DecodeState::DynamicWidthTable;
        Ok(true)
    }

    fn read_dynamic_width_table(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 3 * self.n_width_codes {
            return Ok(false);
        }
        let mut widths = [0u8; 19];
        for &symbol in CODE_LENGTH_ORDER.iter().take(self.n_width_codes) {
            widths[symbol] = self.bits.read_int(3, data, offset) as u8;
        }
        self.width_decoder = Some(HuffmanDecoder::new_canonical(&widths)?);
        self.state = DecodeState::DynamicWidth;
        Ok(true)
    }

    /// Record one transmitted code width, building each table as its count
    /// is reached: first literal/length, then distance.
    fn use_width(&mut self, width: u8) -> Result<()> {
        if self.state == DecodeState::LiteralLength {
            return Err(CodecError::invalid_code_widths(
                "more code widths than the header announced",
            ));
        }
        self.pending_widths.push(width);
        if self.litlen_decoder.is_none() {
            if self.pending_widths.len() == self.n_litlen {
                self.litlen_decoder = Some(HuffmanDecoder::new_canonical(&self.pending_widths)?);
                self.pending_widths.clear();
            }
        } else if self.pending_widths.len() == self.n_distance {
            self.distance_decoder = Some(HuffmanDecoder::new_canonical(&self.pending_widths)?);
            self.pending_widths.clear();
            self.state = DecodeState::LiteralLength;
        }
        Ok(())
    }

    fn read_dynamic_width(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let decoder = self
            .width_decoder
            .as_ref()
            .expect("width table is built before width symbols are read");
        match self.bits.read_symbol(decoder, "code width", data, offset)? {
            None => Ok(false),
            Some(symbol) => {
                match symbol {
                    0..=15 => self.use_width(symbol as u8)?,
                    16 => self.state = DecodeState::DynamicWidthRepeat,
                    17 => self.state = DecodeState::DynamicZeroRunShort,
                    18 => self.state = DecodeState::DynamicZeroRunLong,
                    _ => return Err(CodecError::malformed_bit_pattern("code width")),
                }
                Ok(true)
            }
        }
    }

    fn repeat_width(&mut self, width: u8, count: usize) -> Result<bool> {
        // Back to plain width symbols; use_width may finish the tables.
        self.state = DecodeState::DynamicWidth;
        for _ in 0..count {
            self.use_width(width)?;
        }
        Ok(true)
    }

    fn read_width_repeat(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 2 {
            return Ok(false);
        }
        let count = 3 + self.bits.read_int(2, data, offset) as usize;
        match self.pending_widths.last() {
            Some(&width) => self.repeat_width(width, count),
            None => Err(CodecError::invalid_code_widths(
                "width repeat with no previous width",
            )),
        }
    }

    fn read_zero_run_short(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 3 {
            return Ok(false);
        }
        let count = 3 + self.bits.read_int(3, data, offset) as usize;
        self.repeat_width(0, count)
    }

    fn read_zero_run_long(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        if self.bits.remaining_bits(data, *offset) < 7 {
            return Ok(false);
        }
        let count = 11 + self.bits.read_int(7, data, offset) as usize;
        self.repeat_width(0, count)
    }

    fn end_block(&mut self) {
        self.state = if self.last_block {
            DecodeState::Done
        } else {
            DecodeState::BlockHeader
        };
    }

    fn read_literal_length(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let decoder = self
            .litlen_decoder
            .as_ref()
            .expect("literal/length table is built before block data is read");
        match self
            .bits
            .read_symbol(decoder, "literal/length", data, offset)?
        {
            None => Ok(false),
            Some(symbol) if symbol < END_OF_BLOCK => {
                self.output.push(symbol as u8);
                Ok(true)
            }
            Some(END_OF_BLOCK) => {
                self.end_block();
                Ok(true)
            }
            Some(symbol) if symbol <= 285 => {
                self.length_symbol = symbol;
                self.state = DecodeState::LengthExtra;
                Ok(true)
            }
            Some(_) => Err(CodecError::malformed_bit_pattern("literal/length")),
        }
    }

    fn read_length_extra(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let extra_bits = LENGTH_EXTRA_BITS[(self.length_symbol - 257) as usize];
        if self.bits.remaining_bits(data, *offset) < extra_bits as usize {
            return Ok(false);
        }
        let extra = self.bits.read_int(extra_bits, data, offset);
        self.length = decode_length(self.length_symbol, extra);
        self.state = DecodeState::DistanceSymbol;
        Ok(true)
    }

    fn read_distance_symbol(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let decoder = self
            .distance_decoder
            .as_ref()
            .expect("distance table is built before block data is read");
        match self.bits.read_symbol(decoder, "distance", data, offset)? {
            None => Ok(false),
            Some(symbol) => {
                // Symbols 30 and 31 exist in the fixed code space but are
                // reserved.
                if symbol > 29 {
                    return Err(CodecError::malformed_bit_pattern("reserved distance"));
                }
                self.distance_symbol = symbol;
                self.state = DecodeState::DistanceExtra;
                Ok(true)
            }
        }
    }

    fn read_distance_extra(&mut self, data: &[u8], offset: &mut usize) -> Result<bool> {
        let extra_bits = DISTANCE_EXTRA_BITS[self.distance_symbol as usize];
        if self.bits.remaining_bits(data, *offset) < extra_bits as usize {
            return Ok(false);
        }
        let extra = self.bits.read_int(extra_bits, data, offset);
        let distance = decode_distance(self.distance_symbol, extra) as usize;

        if distance > self.output.len() {
            return Err(CodecError::invalid_back_reference(
                distance,
                self.output.len(),
            ));
        }
        // Byte-by-byte so an overlapping reference replicates the bytes it
        // is producing.
        let start = self.output.len() - distance;
        for i in 0..self.length as usize {
            let byte = self.output[start + i];
            self.output.push(byte);
        }
        self.state = DecodeState::LiteralLength;
        Ok(true)
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

impl PushStream for Inflater {
    fn push(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        let mut offset = 0;
        loop {
            let progressed = match self.state {
                DecodeState::BlockHeader => self.read_block_header(data, &mut offset)?,
                DecodeState::StoredLength => self.read_stored_length(data, &mut offset)?,
                DecodeState::StoredData => self.read_stored_data(data, &mut offset)?,
                DecodeState::DynamicTableSizes => self.read_dynamic_table_sizes(data, &mut offset)?,
                DecodeState::DynamicWidthTable => self.read_dynamic_width_table(data, &mut offset)?,
                DecodeState::DynamicWidth => self.read_dynamic_width(data, &mut offset)?,
                DecodeState::DynamicWidthRepeat => self.read_width_repeat(data, &mut offset)?,
                DecodeState::DynamicZeroRunShort => self.read_zero_run_short(data, &mut offset)?,
                DecodeState::DynamicZeroRunLong => self.read_zero_run_long(data, &mut offset)?,
                DecodeState::LiteralLength => self.read_literal_length(data, &mut offset)?,
                DecodeState::LengthExtra => self.read_length_extra(data, &mut offset)?,
                DecodeState::DistanceSymbol => self.read_distance_symbol(data, &mut offset)?,
                DecodeState::DistanceExtra => self.read_distance_extra(data, &mut offset)?,
                DecodeState::Done => false,
            };
            if !progressed {
                break;
            }
        }

        if complete && self.state != DecodeState::Done {
            return Err(CodecError::PrematureEndOfStream);
        }
        Ok(offset)
    }

    fn take_output(&mut self) -> Vec<u8> {
        let bytes = self.output[self.taken..].to_vec();
        self.taken = self.output.len();
        bytes
    }

    fn is_finished(&self) -> bool {
        self.state == DecodeState::Done
    }
}

/// Decompress a complete DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    run_to_end(&mut Inflater::new(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflate_stored() {
        let compressed = [
            0x01, // final, stored
            0x05, 0x00, // LEN = 5
            0xFA, 0xFF, // NLEN
            b'H', b'e', b'l', b'l', b'o',
        ];
        assert_eq!(inflate(&compressed).unwrap(), b"Hello");
    }

    #[test]
    fn test_inflate_empty_stored() {
        let compressed = [0x01, 0x00, 0x00, 0xFF, 0xFF];
        assert!(inflate(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_stored_length_mismatch() {
        let compressed = [0x01, 0x01, 0x00, 0xFE, 0xFE, 0x21];
        let err = inflate(&compressed).unwrap_err();
        assert!(matches!(err, CodecError::StoredLengthMismatch { .. }));
    }

    #[test]
    fn test_reserved_block_type() {
        // Header bits 1 (final), then type 0b11.
        let err = inflate(&[0x07]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidBlockType { block_type: 3 }));
    }

    #[test]
    fn test_back_reference_before_output_start() {
        // Fixed block: a length symbol then distance symbol 0, with no
        // produced bytes to copy from.
        let err = inflate(&[0x03, 0x01]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidBackReference { .. }));
    }

    #[test]
    fn test_truncated_stream() {
        let err = inflate(&[0xcb, 0x48, 0xcd]).unwrap_err();
        assert!(matches!(err, CodecError::PrematureEndOfStream));
    }

    #[test]
    fn test_trailing_bytes_left_unconsumed() {
        let mut decoder = Inflater::new();
        // "hello" followed by two trailing garbage bytes.
        let data = [0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0x07, 0x00, 0xAA, 0xBB];
        let used = decoder.push(&data, true).unwrap();
        assert_eq!(used, 7);
        assert!(decoder.is_finished());
        assert_eq!(decoder.take_output(), b"hello");
    }
}
