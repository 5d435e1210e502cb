//! # Streampack Huffman
//!
//! Huffman prefix coding: code construction, encoding, and incremental
//! decoding.
//!
//! Two construction modes are provided:
//!
//! - **Weighted**: an optimal prefix code built from per-symbol weights by
//!   repeatedly merging the two lightest subtrees.
//! - **Canonical**: codes derived from an explicit per-symbol width list,
//!   assigned consecutively within each width in symbol order. This is the
//!   form DEFLATE transmits its dynamic tables in.
//!
//! Decoding is incremental: callers accumulate bits one at a time against a
//! live stream and [`HuffmanDecoder::lookup`] reports a match, asks for more
//! bits, or flags a corrupt pattern.
//!
//! ## Example
//!
//! ```rust
//! use streampack_huffman::{HuffmanDecoder, HuffmanEncoder, Lookup};
//!
//! // A = 0, B = 10, C = 11
//! let encoder = HuffmanEncoder::new_canonical(&[1, 2, 2]).unwrap();
//! assert_eq!(encoder.code(0), (0b0, 1));
//! assert_eq!(encoder.code(1), (0b10, 2));
//! assert_eq!(encoder.code(2), (0b11, 2));
//!
//! let decoder = HuffmanDecoder::new_canonical(&[1, 2, 2]).unwrap();
//! assert_eq!(decoder.lookup(0b1, 1), Lookup::Incomplete);
//! assert_eq!(decoder.lookup(0b10, 2), Lookup::Symbol(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod code;
pub mod decoder;
pub mod encoder;

// Re-exports
pub use code::{MAX_CODE_WIDTH, generate_canonical, generate_weighted};
pub use decoder::{HuffmanDecoder, Lookup};
pub use encoder::HuffmanEncoder;
pub use streampack_core::{CodecError, Result};
