//! Constants and tables for the block transform codec
//!
//! Base quantization tables are the JPEG Annex K tables; the zigzag table
//! follows the same frequency ordering used by JPEG entropy coders.

/// DCT block dimension
pub const DCTSIZE: usize = 8;

/// DCT block size (8x8 = 64)
pub const DCTSIZE2: usize = 64;

/// Both frame dimensions must be a multiple of this.
pub const RESOLUTION_ALIGN: usize = 64;

/// Default quality when none is configured.
pub const DEFAULT_QUALITY: u32 = 75;

/// Quality values above this are clamped.
pub const MAX_QUALITY: u32 = 1024;

/// Smallest forward quantizer after quality scaling.
pub const MIN_QUANT_VALUE: u32 = 2;

/// Largest forward quantizer after quality scaling.
pub const MAX_QUANT_VALUE: u32 = 255;

/// Zigzag scan order: maps natural (row-major) position to zigzag position.
/// Example: zigzag_pos = ZIGZAG[natural_pos]
#[rustfmt::skip]
pub const ZIGZAG: [usize; DCTSIZE2] = [
     0,  1,  5,  6, 14, 15, 27, 28,
     2,  4,  7, 13, 16, 26, 29, 42,
     3,  8, 12, 17, 25, 30, 41, 43,
     9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// Inverse of [`ZIGZAG`]: maps zigzag position to natural position.
pub const NATURAL_ORDER: [usize; DCTSIZE2] = {
    let mut table = [0usize; DCTSIZE2];
    let mut i = 0;
    while i < DCTSIZE2 {
        table[ZIGZAG[i]] = i;
        i += 1;
    }
    table
};

/// Standard JPEG Annex K luminance quantization table
#[rustfmt::skip]
pub const STD_LUMA_QUANT: [u8; DCTSIZE2] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// Standard JPEG Annex K chrominance quantization table
#[rustfmt::skip]
pub const STD_CHROMA_QUANT: [u8; DCTSIZE2] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];
