//! # Streampack DEFLATE
//!
//! Pure Rust implementation of the DEFLATE format (RFC 1951), driven through
//! the push-stream contract so both directions work incrementally on
//! arbitrary-sized chunks.
//!
//! ## Decoding
//!
//! [`Inflater`] is an explicit state machine over the block grammar:
//!
//! - Type 0: stored (uncompressed) blocks
//! - Type 1: fixed Huffman codes
//! - Type 2: dynamic Huffman codes, tables transmitted inline
//!
//! Any bit, symbol, or block may span push boundaries; the partial parse
//! lives in the instance.
//!
//! ## Encoding
//!
//! [`Deflater`] emits one streaming fixed-Huffman block with greedy LZ77
//! match finding, or byte-aligned stored blocks in stored mode.
//!
//! ## Example
//!
//! ```rust
//! use streampack_deflate::{deflate, inflate};
//!
//! let compressed = deflate(b"hello hello hello").unwrap();
//! let decompressed = inflate(&compressed).unwrap();
//! assert_eq!(decompressed, b"hello hello hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod inflate;
pub mod lz77;
pub mod tables;

// Re-exports
pub use deflate::{Deflater, deflate, deflate_stored};
pub use inflate::{Inflater, inflate};
pub use lz77::Lz77Window;
pub use streampack_core::{CodecError, Result};
