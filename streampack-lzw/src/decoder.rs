//! LZW decoding.

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use streampack_core::bitseq::BitOrder;
use streampack_core::error::{CodecError, Result};
use streampack_core::push::PushStream;

/// Push-stream LZW decoder.
///
/// Code words are extracted from the incoming bytes at the current width;
/// bits left over at a chunk boundary stay in the instance, so a code split
/// across two pushes is reassembled transparently.
#[derive(Debug)]
pub struct LzwDecoder {
    dict: LzwDictionary,
    /// Unprocessed bits carried between pushes.
    read_buffer: u32,
    read_buffer_bits: u8,
    /// Last real code received; starts out as the clear code.
    last_code: u16,
    output: Vec<u8>,
    finished: bool,
}

impl LzwDecoder {
    /// Create a decoder for the given stream parameters.
    pub fn new(config: LzwConfig) -> Self {
        let dict = LzwDictionary::new(config);
        let last_code = dict.clear_code();
        Self {
            dict,
            read_buffer: 0,
            read_buffer_bits: 0,
            last_code,
            output: Vec::new(),
            finished: false,
        }
    }

    /// Decoder for LSB-first packed codes over an `n_symbols` alphabet.
    pub fn new_lsb(n_symbols: u16) -> Self {
        Self::new(LzwConfig::lsb(n_symbols))
    }

    /// Decoder for MSB-first packed codes over an `n_symbols` alphabet.
    pub fn new_msb(n_symbols: u16) -> Self {
        Self::new(LzwConfig::msb(n_symbols))
    }

    /// Width of the next code to read.
    ///
    /// The decoder trails the encoder's dictionary by one entry (the entry
    /// for the code being read is only added after it arrives), so the
    /// pending entry is counted in before sizing the width.
    fn code_width(&self) -> u8 {
        let mut len = self.dict.len();
        if self.last_code != self.dict.clear_code() && !self.dict.is_full() {
            len += 1;
        }
        let mut width = 1u8;
        while len > 1 << width {
            width += 1;
        }
        width
    }
}

impl PushStream for LzwDecoder {
    fn push(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        let mut offset = 0;

        while !self.finished {
            // Top up the bit buffer until a full code word is available.
            let width = self.code_width();
            while self.read_buffer_bits < width && offset < data.len() {
                let byte = data[offset] as u32;
                match self.dict.config().order {
                    BitOrder::Lsb => self.read_buffer |= byte << self.read_buffer_bits,
                    BitOrder::Msb => self.read_buffer = (self.read_buffer << 8) | byte,
                }
                self.read_buffer_bits += 8;
                offset += 1;
            }
            if self.read_buffer_bits < width {
                break;
            }

            // Extract the next code word.
            let mask = (1u32 << width) - 1;
            let code = match self.dict.config().order {
                BitOrder::Lsb => {
                    let code = (self.read_buffer & mask) as u16;
                    self.read_buffer >>= width;
                    code
                }
                BitOrder::Msb => {
                    let unused = self.read_buffer_bits - width;
                    let code = ((self.read_buffer >> unused) & mask) as u16;
                    self.read_buffer &= (1u32 << unused) - 1;
                    code
                }
            };
            self.read_buffer_bits -= width;

            let clear_code = self.dict.clear_code();
            if code == clear_code {
                self.dict.reset();
                self.last_code = clear_code;
                continue;
            }
            if code == self.dict.end_code() {
                self.finished = true;
                break;
            }

            let dict_len = self.dict.len() as u16;
            let first_byte;
            if code < dict_len {
                let entry = self
                    .dict
                    .entry(code)
                    .ok_or_else(|| CodecError::undefined_dictionary_code(code))?;
                first_byte = entry[0];
                self.output.extend_from_slice(entry);
            } else if code == dict_len && self.last_code != clear_code {
                // The code for the entry about to be defined: previous
                // string plus its own first byte.
                let previous = self
                    .dict
                    .entry(self.last_code)
                    .ok_or_else(|| CodecError::undefined_dictionary_code(self.last_code))?;
                first_byte = previous[0];
                self.output.extend_from_slice(previous);
                self.output.push(first_byte);
            } else {
                return Err(CodecError::undefined_dictionary_code(code));
            }

            if self.last_code != clear_code && !self.dict.is_full() {
                self.dict.append(self.last_code, first_byte);
            }
            self.last_code = code;
        }

        if complete && !self.finished {
            return Err(CodecError::PrematureEndOfStream);
        }
        Ok(offset)
    }

    fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
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
    fn test_initial_code_width() {
        assert_eq!(LzwDecoder::new_lsb(256).code_width(), 9);
        // 5 literals + clear + end = 7 codes, needing 3 bits.
        assert_eq!(LzwDecoder::new_lsb(5).code_width(), 3);
    }

    #[test]
    fn test_self_referential_code() {
        // "ababab..." style input exercises the code-for-pending-entry case:
        // the encoder emits a code one past the decoder's dictionary.
        let original = b"abababababab";
        let compressed = crate::compress(original, LzwConfig::lsb(256)).unwrap();
        let decompressed = run_to_end(&mut LzwDecoder::new_lsb(256), &compressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_output_survives_error() {
        // "hello" with the final code overwritten to 511.
        let data = [0x00, 0xd1, 0x94, 0x61, 0xc3, 0xe6, 0x7f, 0x40];
        let mut decoder = LzwDecoder::new_lsb(256);
        let err = decoder.push(&data, true).unwrap_err();
        assert!(matches!(err, CodecError::UndefinedDictionaryCode { .. }));
        // Bytes decoded before the bad code are still available.
        assert_eq!(decoder.take_output(), b"hell");
    }
}
