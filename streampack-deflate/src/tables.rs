//! Constant tables from RFC 1951.
//!
//! Length and distance codes carry a base value plus a fixed number of
//! extra bits (RFC 1951 Section 3.2.5); fixed Huffman blocks use the code
//! widths of Section 3.2.6; dynamic block headers transmit their
//! code-length alphabet in the permuted order of Section 3.2.7.

use std::sync::OnceLock;
use streampack_huffman::{HuffmanDecoder, HuffmanEncoder};

/// End-of-block symbol in the literal/length alphabet.
pub const END_OF_BLOCK: u16 = 256;

/// Base values for length codes 257-285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264: 0 extra bits
    11, 13, 15, 17, // 265-268: 1 extra bit
    19, 23, 27, 31, // 269-272: 2 extra bits
    35, 43, 51, 59, // 273-276: 3 extra bits
    67, 83, 99, 115, // 277-280: 4 extra bits
    131, 163, 195, 227, // 281-284: 5 extra bits
    258, // 285: 0 extra bits
];

/// Extra bits carried by length codes 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, // 257-264
    1, 1, 1, 1, // 265-268
    2, 2, 2, 2, // 269-272
    3, 3, 3, 3, // 273-276
    4, 4, 4, 4, // 277-280
    5, 5, 5, 5, // 281-284
    0, // 285
];

/// Base values for distance codes 0-29.
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, // 0-3: 0 extra bits
    5, 7, // 4-5: 1 extra bit
    9, 13, // 6-7: 2 extra bits
    17, 25, // 8-9: 3 extra bits
    33, 49, // 10-11: 4 extra bits
    65, 97, // 12-13: 5 extra bits
    129, 193, // 14-15: 6 extra bits
    257, 385, // 16-17: 7 extra bits
    513, 769, // 18-19: 8 extra bits
    1025, 1537, // 20-21: 9 extra bits
    2049, 3073, // 22-23: 10 extra bits
    4097, 6145, // 24-25: 11 extra bits
    8193, 12289, // 26-27: 12 extra bits
    16385, 24577, // 28-29: 13 extra bits
];

/// Extra bits carried by distance codes 0-29.
pub const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, // 0-3
    1, 1, // 4-5
    2, 2, // 6-7
    3, 3, // 8-9
    4, 4, // 10-11
    5, 5, // 12-13
    6, 6, // 14-15
    7, 7, // 16-17
    8, 8, // 18-19
    9, 9, // 20-21
    10, 10, // 22-23
    11, 11, // 24-25
    12, 12, // 26-27
    13, 13, // 28-29
];

/// Transmission order of the code-length alphabet in dynamic block headers.
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Fixed literal/length code widths (RFC 1951 Section 3.2.6).
///
/// - Symbols 0-143: 8 bits
/// - Symbols 144-255: 9 bits
/// - Symbols 256-279: 7 bits
/// - Symbols 280-287: 8 bits
pub fn fixed_litlen_widths() -> [u8; 288] {
    let mut widths = [0u8; 288];
    for width in widths.iter_mut().take(144) {
        *width = 8;
    }
    for width in widths.iter_mut().take(256).skip(144) {
        *width = 9;
    }
    for width in widths.iter_mut().take(280).skip(256) {
        *width = 7;
    }
    for width in widths.iter_mut().take(288).skip(280) {
        *width = 8;
    }
    widths
}

/// Fixed distance code widths: all 32 symbols use 5 bits. Symbols 30 and 31
/// never occur in well-formed streams but participate in the code space.
pub fn fixed_distance_widths() -> [u8; 32] {
    [5u8; 32]
}

/// The fixed literal/length decoding table, built once.
pub fn fixed_litlen_decoder() -> &'static HuffmanDecoder {
    static TABLE: OnceLock<HuffmanDecoder> = OnceLock::new();
    TABLE.get_or_init(|| {
        HuffmanDecoder::new_canonical(&fixed_litlen_widths())
            .expect("fixed literal/length widths form a complete code")
    })
}

/// The fixed distance decoding table, built once.
pub fn fixed_distance_decoder() -> &'static HuffmanDecoder {
    static TABLE: OnceLock<HuffmanDecoder> = OnceLock::new();
    TABLE.get_or_init(|| {
        HuffmanDecoder::new_canonical(&fixed_distance_widths())
            .expect("fixed distance widths form a complete code")
    })
}

/// The fixed literal/length encoding table, built once.
pub fn fixed_litlen_encoder() -> &'static HuffmanEncoder {
    static TABLE: OnceLock<HuffmanEncoder> = OnceLock::new();
    TABLE.get_or_init(|| {
        HuffmanEncoder::new_canonical(&fixed_litlen_widths())
            .expect("fixed literal/length widths form a complete code")
    })
}

/// The fixed distance encoding table, built once.
pub fn fixed_distance_encoder() -> &'static HuffmanEncoder {
    static TABLE: OnceLock<HuffmanEncoder> = OnceLock::new();
    TABLE.get_or_init(|| {
        HuffmanEncoder::new_canonical(&fixed_distance_widths())
            .expect("fixed distance widths form a complete code")
    })
}

/// Map a match length (3-258) to `(symbol, extra_bits, extra_value)`.
pub fn length_to_symbol(length: u16) -> (u16, u8, u16) {
    debug_assert!((3..=258).contains(&length), "Length out of range");

    let length = length as usize;
    let symbol = match length {
        3..=10 => length - 3 + 257,
        11..=18 => (length - 11) / 2 + 265,
        19..=34 => (length - 19) / 4 + 269,
        35..=66 => (length - 35) / 8 + 273,
        67..=130 => (length - 67) / 16 + 277,
        131..=257 => (length - 131) / 32 + 281,
        _ => 285,
    };

    let base = LENGTH_BASE[symbol - 257] as usize;
    (
        symbol as u16,
        LENGTH_EXTRA_BITS[symbol - 257],
        (length - base) as u16,
    )
}

/// Map a match distance (1-32768) to `(symbol, extra_bits, extra_value)`.
pub fn distance_to_symbol(distance: u16) -> (u16, u8, u16) {
    debug_assert!(distance >= 1, "Distance out of range");

    let symbol = match distance {
        1 => 0,
        2 => 1,
        3 => 2,
        4 => 3,
        5..=6 => 4,
        7..=8 => 5,
        9..=12 => 6,
        13..=16 => 7,
        17..=24 => 8,
        25..=32 => 9,
        33..=48 => 10,
        49..=64 => 11,
        65..=96 => 12,
        97..=128 => 13,
        129..=192 => 14,
        193..=256 => 15,
        257..=384 => 16,
        385..=512 => 17,
        513..=768 => 18,
        769..=1024 => 19,
        1025..=1536 => 20,
        1537..=2048 => 21,
        2049..=3072 => 22,
        3073..=4096 => 23,
        4097..=6144 => 24,
        6145..=8192 => 25,
        8193..=12288 => 26,
        12289..=16384 => 27,
        16385..=24576 => 28,
        _ => 29,
    };

    let base = DISTANCE_BASE[symbol];
    (
        symbol as u16,
        DISTANCE_EXTRA_BITS[symbol],
        distance - base,
    )
}

/// Reconstruct a length from its code and extra bits.
pub fn decode_length(symbol: u16, extra: u16) -> u16 {
    debug_assert!((257..=285).contains(&symbol), "Invalid length symbol");
    LENGTH_BASE[(symbol - 257) as usize] + extra
}

/// Reconstruct a distance from its code and extra bits.
pub fn decode_distance(symbol: u16, extra: u16) -> u16 {
    debug_assert!(symbol < 30, "Invalid distance symbol");
    DISTANCE_BASE[symbol as usize] + extra
}
