//! Error types for Streampack operations.
//!
//! All codecs report failures through the single [`CodecError`] type. Errors
//! are terminal for the current encode/decode session: the codec makes no
//! attempt to resynchronize, and the caller may discard the instance and
//! retry with different input.

use thiserror::Error;

/// The error type shared by all Streampack codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No Huffman code matches the accumulated bits.
    #[error("No Huffman code matches the accumulated bits ({context})")]
    MalformedBitPattern {
        /// Which table was being consulted when the match failed.
        context: &'static str,
    },

    /// Reserved or unknown block type in a DEFLATE block header.
    #[error("Invalid DEFLATE block type: {block_type}")]
    InvalidBlockType {
        /// The two-bit block type that was read.
        block_type: u8,
    },

    /// A stored block length and its one's complement disagree.
    #[error("Stored block length check failed: length {length:#06x}, complement {complement:#06x}")]
    StoredLengthMismatch {
        /// The LEN field of the stored block.
        length: u16,
        /// The NLEN field that should be its one's complement.
        complement: u16,
    },

    /// An LZW code that has no dictionary entry.
    #[error("Undefined LZW dictionary code: {code}")]
    UndefinedDictionaryCode {
        /// The offending code.
        code: u16,
    },

    /// A back-reference pointing before the start of the produced output.
    #[error("Invalid back-reference: distance {distance} exceeds {produced} produced bytes")]
    InvalidBackReference {
        /// The decoded distance.
        distance: usize,
        /// Number of bytes produced so far.
        produced: usize,
    },

    /// Input was declared complete while a symbol or block was unfinished.
    #[error("Premature end of stream")]
    PrematureEndOfStream,

    /// A set of code widths that does not form a valid prefix code.
    #[error("Invalid Huffman code widths: {message}")]
    InvalidCodeWidths {
        /// Description of the defect.
        message: String,
    },
}

/// Result type alias for Streampack operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create a malformed bit pattern error.
    pub fn malformed_bit_pattern(context: &'static str) -> Self {
        Self::MalformedBitPattern { context }
    }

    /// Create an invalid block type error.
    pub fn invalid_block_type(block_type: u8) -> Self {
        Self::InvalidBlockType { block_type }
    }

    /// Create a stored length mismatch error.
    pub fn stored_length_mismatch(length: u16, complement: u16) -> Self {
        Self::StoredLengthMismatch { length, complement }
    }

    /// Create an undefined dictionary code error.
    pub fn undefined_dictionary_code(code: u16) -> Self {
        Self::UndefinedDictionaryCode { code }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(distance: usize, produced: usize) -> Self {
        Self::InvalidBackReference { distance, produced }
    }

    /// Create an invalid code widths error.
    pub fn invalid_code_widths(message: impl Into<String>) -> Self {
        Self::InvalidCodeWidths {
            message: message.into(),
        }
    }
}
