//! Forward DCT (Discrete Cosine Transform) and block extraction
//!
//! The forward transform is a separable two-pass integer DCT-II. Cosine
//! weights are `cos(k*pi/16) * sqrt(2)` in 10-bit fixed point. Pass 1 leaves
//! each row scaled by sqrt(8); pass 2 removes both the fixed-point scale and
//! the accumulated 2-D gain of 8, so the output matches the orthonormal
//! (JPEG-scaled) coefficients. Quantization is fused into pass 2 using the
//! reciprocal table, and coefficients are stored in zigzag order.

use imgref::ImgRef;

use crate::consts::{DCTSIZE, DCTSIZE2, ZIGZAG};

const C1: i32 = 1420; // cos  PI/16 * sqrt(2)
const C2: i32 = 1338; // cos  PI/8  * sqrt(2)
const C3: i32 = 1204; // cos 3PI/16 * sqrt(2)
const C5: i32 = 805; // cos 5PI/16 * sqrt(2)
const C6: i32 = 554; // cos 3PI/8  * sqrt(2)
const C7: i32 = 283; // cos 7PI/16 * sqrt(2)

/// Copy an 8x8 neighborhood into `block`, level-shifted by -128.
///
/// `input` starts at the block origin and `stride` is the distance in bytes
/// between source rows. Only the first `rows` x `cols` samples are read; the
/// last valid column fills the rest of each row and the last filled row fills
/// the remaining rows.
///
/// # Panics
/// If `rows` or `cols` is outside `1..=8`, or `input` is too short for the
/// requested rows.
pub fn format_block(
    block: &mut [i16; DCTSIZE2],
    input: &[u8],
    rows: usize,
    cols: usize,
    stride: usize,
) {
    assert!(
        (1..=DCTSIZE).contains(&rows) && (1..=DCTSIZE).contains(&cols),
        "block extent {rows}x{cols} outside 1..=8"
    );

    for r in 0..rows {
        let src = &input[r * stride..r * stride + cols];
        let dst = &mut block[r * DCTSIZE..(r + 1) * DCTSIZE];

        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s as i16 - 128;
        }

        // replicate last column
        let edge = dst[cols - 1];
        dst[cols..].fill(edge);
    }

    // replicate last row
    for r in rows..DCTSIZE {
        block.copy_within((r - 1) * DCTSIZE..r * DCTSIZE, r * DCTSIZE);
    }
}

/// Extract the block at (`block_row`, `block_col`) of a plane.
///
/// Blocks that run past the right or bottom edge are padded by replication.
pub fn extract_block(plane: ImgRef<'_, u8>, block_row: usize, block_col: usize) -> [i16; DCTSIZE2] {
    let x = block_col * DCTSIZE;
    let y = block_row * DCTSIZE;
    debug_assert!(x < plane.width() && y < plane.height());

    let rows = (plane.height() - y).min(DCTSIZE);
    let cols = (plane.width() - x).min(DCTSIZE);
    let stride = plane.stride();

    let mut block = [0i16; DCTSIZE2];
    format_block(&mut block, &plane.buf()[y * stride + x..], rows, cols, stride);
    block
}

/// One 8-point DCT-II butterfly.
///
/// Returns coefficients in frequency order. `dc_shift` applies to the
/// unweighted terms (0 and 4), `ac_shift` to the cosine-weighted ones.
#[inline(always)]
fn fdct_1d(p: [i32; DCTSIZE], dc_shift: u32, ac_shift: u32) -> [i32; DCTSIZE] {
    let mut s07 = p[0] + p[7];
    let d07 = p[0] - p[7];
    let mut s16 = p[1] + p[6];
    let d16 = p[1] - p[6];
    let s25 = p[2] + p[5];
    let d25 = p[2] - p[5];
    let mut s34 = p[3] + p[4];
    let d34 = p[3] - p[4];

    let even = s07 + s34;
    s07 -= s34;
    s34 = s16 + s25;
    s16 -= s25;

    [
        (even + s34) >> dc_shift,
        (d07 * C1 + d16 * C3 + d25 * C5 + d34 * C7) >> ac_shift,
        (s07 * C2 + s16 * C6) >> ac_shift,
        (d07 * C3 - d16 * C7 - d25 * C1 - d34 * C5) >> ac_shift,
        (even - s34) >> dc_shift,
        (d07 * C5 - d16 * C1 + d25 * C7 + d34 * C3) >> ac_shift,
        (s07 * C6 - s16 * C2) >> ac_shift,
        (d07 * C7 - d16 * C5 + d25 * C3 - d34 * C1) >> ac_shift,
    ]
}

/// Forward DCT and quantization of one level-shifted block.
///
/// `block` is used as scratch space for the row pass. `reciprocal` is the
/// natural-order `0x8000 / q` table; `output` receives quantized
/// coefficients in zigzag order.
pub fn forward_dct_8x8(
    block: &mut [i16; DCTSIZE2],
    reciprocal: &[u16; DCTSIZE2],
    output: &mut [i16; DCTSIZE2],
) {
    for row in block.chunks_exact_mut(DCTSIZE) {
        let p = std::array::from_fn(|k| row[k] as i32);
        let coeffs = fdct_1d(p, 0, 10);
        for (dst, c) in row.iter_mut().zip(coeffs) {
            *dst = c as i16;
        }
    }

    for col in 0..DCTSIZE {
        let p = std::array::from_fn(|k| block[col + k * DCTSIZE] as i32);
        let coeffs = fdct_1d(p, 3, 13);

        for (k, c) in coeffs.into_iter().enumerate() {
            let natural = col + k * DCTSIZE;
            let v = c as i16 as i32;
            output[ZIGZAG[natural]] = ((v * reciprocal[natural] as i32 + 0x4000) >> 15) as i16;
        }
    }
}

/// Forward-transform every block of one block row of a plane.
///
/// `out` holds the row's coefficient blocks, left to right.
pub fn forward_block_row(
    plane: ImgRef<'_, u8>,
    block_row: usize,
    reciprocal: &[u16; DCTSIZE2],
    out: &mut [[i16; DCTSIZE2]],
) {
    for (block_col, coeffs) in out.iter_mut().enumerate() {
        let mut block = extract_block(plane, block_row, block_col);
        forward_dct_8x8(&mut block, reciprocal, coeffs);
    }
}
