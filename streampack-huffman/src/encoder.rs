//! Huffman encoding.

use crate::code::{generate_canonical, generate_weighted};
use streampack_core::bitseq::BitSeq;
use streampack_core::error::Result;

/// A Huffman code table for encoding.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    /// `(code, width)` per symbol.
    codes: Vec<(u16, u8)>,
}

impl HuffmanEncoder {
    /// Build an encoder from per-symbol weights.
    pub fn new_weighted(weights: &[f64]) -> Self {
        Self {
            codes: generate_weighted(weights),
        }
    }

    /// Build an encoder from an explicit per-symbol width list (canonical
    /// code assignment).
    pub fn new_canonical(widths: &[u8]) -> Result<Self> {
        let codes = generate_canonical(widths)?;
        Ok(Self {
            codes: codes.iter().copied().zip(widths.iter().copied()).collect(),
        })
    }

    /// Number of symbols in the table.
    pub fn symbol_count(&self) -> usize {
        self.codes.len()
    }

    /// The `(code, width)` pair for `symbol`. Panics if the symbol is out of
    /// range.
    pub fn code(&self, symbol: u16) -> (u16, u8) {
        self.codes[symbol as usize]
    }

    /// Append the code for `symbol` to `out`, most significant code bit
    /// (root of the tree) first.
    pub fn append_code(&self, symbol: u16, out: &mut BitSeq) {
        let (code, width) = self.code(symbol);
        for i in (0..width).rev() {
            out.push((code >> i) & 1 != 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup() {
        let encoder = HuffmanEncoder::new_canonical(&[1, 2, 2]).unwrap();
        assert_eq!(encoder.symbol_count(), 3);
        assert_eq!(encoder.code(0), (0b0, 1));
        assert_eq!(encoder.code(1), (0b10, 2));
        assert_eq!(encoder.code(2), (0b11, 2));
    }

    #[test]
    fn test_append_code_is_root_first() {
        let encoder = HuffmanEncoder::new_canonical(&[1, 2, 2]).unwrap();
        let mut out = BitSeq::msb();
        encoder.append_code(1, &mut out);
        encoder.append_code(0, &mut out);
        encoder.append_code(2, &mut out);
        assert_eq!(out.to_bin_string(), "10011");
    }

    #[test]
    fn test_append_code_into_lsb_stream() {
        // The bit order of the stream changes the packing, not the order the
        // code bits are emitted in.
        let encoder = HuffmanEncoder::new_canonical(&[1, 2, 2]).unwrap();
        let mut out = BitSeq::lsb();
        encoder.append_code(1, &mut out);
        assert_eq!(out.to_bin_string(), "10");
        assert_eq!(out.as_bytes(), &[0b0000_0001]);
    }
}
