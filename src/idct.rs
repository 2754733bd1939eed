//! Inverse DCT with fused dequantization
//!
//! Fixed-point 8x8 IDCT operating on whole rows at a time: every step works
//! on eight 16-bit lanes (`i16x8`) and widens to eight 32-bit lanes (`i32x8`)
//! for products. The butterfly network is the even/odd decomposition used by
//! libjpeg's islow IDCT, with constants in 12-bit fixed point.
//!
//! Scaling: the column pass keeps 2 guard bits (shift 10 out of 12). The row
//! pass shift of 17 removes the remaining 12 + 2 bits and the 1-D gain of 8,
//! and its bias folds in both rounding and the +128 level shift.

use wide::{i16x8, i32x8};

use crate::consts::{DCTSIZE, DCTSIZE2, ZIGZAG};

const IDCT_PREC: i32 = 12;

// Fixed-point constants: FIX(x) = (int)(x * 4096 + 0.5)
const FIX_0_298631336: i32 = 1223;
const FIX_0_541196100: i32 = 2217;
const FIX_0_765366865: i32 = 3135;
const FIX_1_175875602: i32 = 4816;
const FIX_1_501321110: i32 = 6149;
const FIX_2_053119869: i32 = 8410;
const FIX_3_072711026: i32 = 12586;
const FIX_NEG_0_390180644: i32 = -1597;
const FIX_NEG_0_899976223: i32 = -3685;
const FIX_NEG_1_847759065: i32 = -7567;
const FIX_NEG_1_961570560: i32 = -8034;
const FIX_NEG_2_562915447: i32 = -10497;

/// Coefficient pair of a 2x2 rotation: `out = x * .0 + y * .1`
type Rotation = (i32, i32);

// even part
const ROT0_0: Rotation = (FIX_0_541196100, FIX_0_541196100 + FIX_NEG_1_847759065);
const ROT0_1: Rotation = (FIX_0_541196100 + FIX_0_765366865, FIX_0_541196100);
// odd part
const ROT1_0: Rotation = (FIX_1_175875602 + FIX_NEG_0_899976223, FIX_1_175875602);
const ROT1_1: Rotation = (FIX_1_175875602, FIX_1_175875602 + FIX_NEG_2_562915447);
const ROT2_0: Rotation = (FIX_NEG_1_961570560 + FIX_0_298631336, FIX_NEG_1_961570560);
const ROT2_1: Rotation = (FIX_NEG_1_961570560, FIX_NEG_1_961570560 + FIX_3_072711026);
const ROT3_0: Rotation = (FIX_NEG_0_390180644 + FIX_2_053119869, FIX_NEG_0_390180644);
const ROT3_1: Rotation = (FIX_NEG_0_390180644, FIX_NEG_0_390180644 + FIX_1_501321110);

const COLUMN_SHIFT: i32 = 10;
const COLUMN_BIAS: i32 = 1 << (COLUMN_SHIFT - 1);
const ROW_SHIFT: i32 = 17;
const ROW_BIAS: i32 = (1 << (ROW_SHIFT - 1)) + (128 << ROW_SHIFT);

/// Sign-extend eight 16-bit lanes to 32 bits.
#[inline(always)]
fn extend(v: i16x8) -> i32x8 {
    i32x8::from_i16x8(v)
}

/// Saturating narrow of eight 32-bit lanes to 16 bits.
#[inline(always)]
fn narrow(v: i32x8) -> i16x8 {
    i16x8::from_i32x8_saturate(v)
}

/// `x << IDCT_PREC`, widened.
#[inline(always)]
fn widen(x: i16x8) -> i32x8 {
    extend(x) << IDCT_PREC
}

/// Two dot products of the lane pairs (x, y), widened.
#[inline(always)]
fn rotate(x: i16x8, y: i16x8, c0: Rotation, c1: Rotation) -> (i32x8, i32x8) {
    let x = extend(x);
    let y = extend(y);
    (
        x * i32x8::splat(c0.0) + y * i32x8::splat(c0.1),
        x * i32x8::splat(c1.0) + y * i32x8::splat(c1.1),
    )
}

/// Biased sum and difference of `a` and `b`, shifted and saturated.
#[inline(always)]
fn butterfly(a: i32x8, b: i32x8, bias: i32x8, shift: i32) -> (i16x8, i16x8) {
    let a = a + bias;
    (narrow((a + b) >> shift), narrow((a - b) >> shift))
}

/// One 1-D pass over eight lane groups, in place.
#[inline(always)]
fn idct_pass(rows: &mut [i16x8; DCTSIZE], bias: i32, shift: i32) {
    let [row0, row1, row2, row3, row4, row5, row6, row7] = *rows;

    // even part
    let (t2e, t3e) = rotate(row2, row6, ROT0_0, ROT0_1);
    let t0e = widen(row0 + row4);
    let t1e = widen(row0 - row4);
    let x0 = t0e + t3e;
    let x3 = t0e - t3e;
    let x1 = t1e + t2e;
    let x2 = t1e - t2e;

    // odd part
    let (y0o, y2o) = rotate(row7, row3, ROT2_0, ROT2_1);
    let (y1o, y3o) = rotate(row5, row1, ROT3_0, ROT3_1);
    let (y4o, y5o) = rotate(row1 + row7, row3 + row5, ROT1_0, ROT1_1);
    let x4 = y0o + y4o;
    let x5 = y1o + y5o;
    let x6 = y2o + y5o;
    let x7 = y3o + y4o;

    let bias = i32x8::splat(bias);
    (rows[0], rows[7]) = butterfly(x0, x7, bias, shift);
    (rows[1], rows[6]) = butterfly(x1, x6, bias, shift);
    (rows[2], rows[5]) = butterfly(x2, x5, bias, shift);
    (rows[3], rows[4]) = butterfly(x3, x4, bias, shift);
}

/// 8x8 transpose of the lane groups.
#[inline(always)]
fn transpose(rows: &mut [i16x8; DCTSIZE]) {
    *rows = i16x8::transpose(*rows);
}

/// Dequantize one block and undo the zigzag permutation.
///
/// `coeffs` and `quant` are both in zigzag order; lane group `r` of the
/// result holds natural row `r`.
#[inline(always)]
fn dequantize(coeffs: &[i16; DCTSIZE2], quant: &[u8; DCTSIZE2]) -> [i16x8; DCTSIZE] {
    std::array::from_fn(|r| {
        let base = r * DCTSIZE;
        let c = i16x8::new(std::array::from_fn(|k| coeffs[ZIGZAG[base + k]]));
        let q = i16x8::new(std::array::from_fn(|k| quant[ZIGZAG[base + k]] as i16));
        c * q
    })
}

/// Inverse DCT of one quantized block.
///
/// Writes `rows` x `cols` reconstructed samples (row-major, `stride` bytes
/// apart) into `out`; the rest of the 8x8 result is dropped.
pub fn inverse_dct_8x8(
    coeffs: &[i16; DCTSIZE2],
    quant: &[u8; DCTSIZE2],
    out: &mut [u8],
    rows: usize,
    cols: usize,
    stride: usize,
) {
    let mut data = dequantize(coeffs, quant);

    idct_pass(&mut data, COLUMN_BIAS, COLUMN_SHIFT);
    transpose(&mut data);
    idct_pass(&mut data, ROW_BIAS, ROW_SHIFT);
    transpose(&mut data);

    for (r, lanes) in data.iter().take(rows).enumerate() {
        let samples = lanes.to_array();
        let dst = &mut out[r * stride..r * stride + cols];
        for (d, &s) in dst.iter_mut().zip(&samples) {
            *d = s.clamp(0, 255) as u8;
        }
    }
}

/// Reconstruct one block row of a plane.
///
/// `band` starts at the first pixel row of the block row and covers at most
/// eight rows of `width` samples `stride` bytes apart.
pub fn inverse_block_row(
    coeffs: &[[i16; DCTSIZE2]],
    quant: &[u8; DCTSIZE2],
    band: &mut [u8],
    width: usize,
    stride: usize,
) {
    let rows = band.len().div_ceil(stride).min(DCTSIZE);

    for (block_col, block) in coeffs.iter().enumerate() {
        let x = block_col * DCTSIZE;
        let cols = (width - x).min(DCTSIZE);
        inverse_dct_8x8(block, quant, &mut band[x..], rows, cols, stride);
    }
}
