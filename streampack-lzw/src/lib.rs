//! # Streampack LZW
//!
//! LZW dictionary coding with growing code widths, packed in either bit
//! order.
//!
//! Variable-width code words start one bit above what the literal alphabet
//! needs (9 bits for a 256-symbol alphabet once the two control codes are
//! added) and widen as the dictionary grows. Two control codes sit directly
//! above the literals: *clear* resets the dictionary and *end* terminates
//! the stream.
//!
//! Index-color image formats pack code words least significant bit first;
//! tag-based archive formats pack them most significant bit first. Both
//! orders are supported for encode and decode.
//!
//! Encoder and decoder implement the
//! [`PushStream`](streampack_core::PushStream) contract, so they accept
//! input in arbitrary-sized chunks; a code word split across chunks is
//! carried over in the instance.
//!
//! ## Example
//!
//! ```rust
//! use streampack_core::run_to_end;
//! use streampack_lzw::{LzwConfig, LzwDecoder, LzwEncoder};
//!
//! let config = LzwConfig::lsb(256);
//! let compressed = run_to_end(&mut LzwEncoder::new(config), b"hello").unwrap();
//! let decompressed = run_to_end(&mut LzwDecoder::new(config), &compressed).unwrap();
//! assert_eq!(decompressed, b"hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decoder;
pub mod dictionary;
pub mod encoder;

// Re-exports
pub use config::LzwConfig;
pub use decoder::LzwDecoder;
pub use dictionary::LzwDictionary;
pub use encoder::LzwEncoder;
pub use streampack_core::{CodecError, Result};

use streampack_core::run_to_end;

/// Decode a complete LZW stream.
pub fn decompress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    run_to_end(&mut LzwDecoder::new(config), data)
}

/// Encode `data` as a complete LZW stream.
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    run_to_end(&mut LzwEncoder::new(config), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_both_orders() {
        let original = b"TOBEORNOTTOBEORTOBEORNOT";
        for config in [LzwConfig::lsb(256), LzwConfig::msb(256)] {
            let compressed = compress(original, config).unwrap();
            let decompressed = decompress(&compressed, config).unwrap();
            assert_eq!(decompressed, original);
        }
    }

    #[test]
    fn test_roundtrip_small_alphabet() {
        let original: Vec<u8> = [0u8, 1, 2, 3, 3, 2, 1, 0, 3, 0, 2].repeat(20);
        for config in [LzwConfig::lsb(4), LzwConfig::msb(4)] {
            let compressed = compress(&original, config).unwrap();
            let decompressed = decompress(&compressed, config).unwrap();
            assert_eq!(decompressed, original);
        }
    }

    #[test]
    fn test_roundtrip_forces_dictionary_reset() {
        // A small capacity forces clear codes mid-stream.
        let original: Vec<u8> = (0u8..=255).cycle().take(4000).collect();
        let config = LzwConfig::lsb(256).with_max_codes(512);
        let compressed = compress(&original, config).unwrap();
        let decompressed = decompress(&compressed, config).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_symbol_outside_alphabet_is_rejected() {
        let err = compress(&[7], LzwConfig::lsb(4)).unwrap_err();
        assert!(matches!(err, CodecError::UndefinedDictionaryCode { .. }));
    }
}
