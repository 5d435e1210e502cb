//! # Streampack Core
//!
//! Core components for the Streampack codec library.
//!
//! This crate provides the building blocks shared by every codec:
//!
//! - [`bitseq`]: a byte buffer viewed as an ordered bit sequence, in either
//!   bit order
//! - [`push`]: the push-stream contract that lets codecs consume input
//!   arriving in arbitrary-sized chunks
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! Streampack is designed as a small layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Codec                                               │
//! │     DEFLATE (LZ77+Huffman), LZW                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Prefix coding                                       │
//! │     Huffman code construction, encode/decode tables     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: This crate                                          │
//! │     BitSeq, PushStream/ChunkFeeder, CodecError          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use streampack_core::bitseq::BitSeq;
//!
//! let mut bits = BitSeq::lsb();
//! bits.append_bits(0b101, 3);
//! assert_eq!(bits.len(), 3);
//! assert_eq!(bits.as_bytes(), &[0b0000_0101]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitseq;
pub mod error;
pub mod push;

// Re-exports for convenience
pub use bitseq::{BitOrder, BitSeq};
pub use error::{CodecError, Result};
pub use push::{ChunkFeeder, PushStream, run_to_end};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitseq::{BitOrder, BitSeq};
    pub use crate::error::{CodecError, Result};
    pub use crate::push::{ChunkFeeder, PushStream, run_to_end};
}
