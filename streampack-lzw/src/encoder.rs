//! LZW encoding.

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use streampack_core::bitseq::BitSeq;
use streampack_core::error::{CodecError, Result};
use streampack_core::push::PushStream;

/// Push-stream LZW encoder.
///
/// The stream always opens with a clear code and terminates with the end
/// code. After each emitted code the dictionary gains the match extended by
/// the following literal; when it reaches capacity a clear code is emitted
/// and the dictionary reseeded.
#[derive(Debug)]
pub struct LzwEncoder {
    dict: LzwDictionary,
    out: BitSeq,
    /// Bytes of `out` already handed to the caller.
    flushed: usize,
    started: bool,
    finished: bool,
}

impl LzwEncoder {
    /// Create an encoder for the given stream parameters.
    pub fn new(config: LzwConfig) -> Self {
        Self {
            dict: LzwDictionary::new(config),
            out: BitSeq::new(config.order),
            flushed: 0,
            started: false,
            finished: false,
        }
    }

    /// Encoder producing LSB-first packed codes over an `n_symbols`
    /// alphabet.
    pub fn new_lsb(n_symbols: u16) -> Self {
        Self::new(LzwConfig::lsb(n_symbols))
    }

    /// Encoder producing MSB-first packed codes over an `n_symbols`
    /// alphabet.
    pub fn new_msb(n_symbols: u16) -> Self {
        Self::new(LzwConfig::msb(n_symbols))
    }

    /// Width of the next code to write.
    fn code_width(&self) -> u8 {
        let len = self.dict.len();
        let mut width = 1u8;
        while len > 1 << width {
            width += 1;
        }
        width
    }

    fn write_code(&mut self, code: u16) {
        let width = self.code_width();
        self.out.append_bits(code as u32, width);
    }
}

impl PushStream for LzwEncoder {
    fn push(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        if self.finished {
            return Ok(0);
        }
        if !self.started {
            self.write_code(self.dict.clear_code());
            self.started = true;
        }

        let mut offset = 0;
        'symbols: while offset < data.len() {
            let byte = data[offset];
            if byte as u16 >= self.dict.config().n_symbols {
                return Err(CodecError::undefined_dictionary_code(byte as u16));
            }

            // Greedy longest dictionary match starting at `offset`.
            let mut length = 1;
            let mut code = match self.dict.find(&data[offset..offset + 1]) {
                Some(code) => code,
                None => return Err(CodecError::undefined_dictionary_code(byte as u16)),
            };
            loop {
                if offset + length == data.len() {
                    if !complete {
                        // More input may extend this match; leave the tail
                        // unconsumed.
                        break 'symbols;
                    }
                    break;
                }
                match self.dict.find(&data[offset..offset + length + 1]) {
                    Some(longer) => {
                        length += 1;
                        code = longer;
                    }
                    None => break,
                }
            }

            self.write_code(code);
            offset += length;

            // Extend the match with the following literal. At the end of
            // input a zero placeholder keeps the dictionary length, and so
            // the width of the next code, in step with the decoder.
            let next = if offset < data.len() { data[offset] } else { 0 };
            self.dict.append(code, next);
            if self.dict.is_full() {
                self.write_code(self.dict.clear_code());
                self.dict.reset();
            }
        }

        if complete {
            self.write_code(self.dict.end_code());
            self.finished = true;
        }
        Ok(offset)
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

#[cfg(test)]
mod tests {
    use super::*;
    use streampack_core::run_to_end;

    #[test]
    fn test_empty_stream_is_clear_then_end() {
        let out = run_to_end(&mut LzwEncoder::new_lsb(256), b"").unwrap();
        assert_eq!(out, [0x00, 0x03, 0x02]);
    }

    #[test]
    fn test_partial_bytes_held_back_until_finished() {
        let mut encoder = LzwEncoder::new_lsb(256);
        let mut feeder = streampack_core::ChunkFeeder::new();
        feeder.feed(&mut encoder, b"a", false).unwrap();
        // Only the 9-bit clear code is pending; a partial trailing byte may
        // not be surfaced before the stream finishes.
        assert!(encoder.take_output().len() <= 1);
        feeder.feed(&mut encoder, b"", true).unwrap();
        let rest = encoder.take_output();
        assert!(encoder.is_finished());
        assert!(!rest.is_empty());
    }

    #[test]
    fn test_incomplete_match_defers_consumption() {
        let mut encoder = LzwEncoder::new_lsb(256);
        // A single byte always matches a literal entry that a longer entry
        // might extend, so nothing is consumed until more data arrives.
        let used = encoder.push(b"a", false).unwrap();
        assert_eq!(used, 0);
        let used = encoder.push(b"ab", false).unwrap();
        assert_eq!(used, 1);
    }
}
