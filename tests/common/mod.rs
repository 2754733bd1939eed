//! Common test utilities for swapcodec tests.
//!
//! Frame generators for planar YUV420 buffers. Every generator returns a
//! tightly packed frame of `width * height * 3 / 2` bytes.

#![allow(dead_code)]

/// Frame with every sample set to `value`.
pub fn uniform_frame(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height * 3 / 2]
}

/// Smooth gradients: diagonal luma, horizontal U, inverted vertical V.
pub fn gradient_frame(width: usize, height: usize) -> Vec<u8> {
    let (cw, ch) = (width / 2, height / 2);
    let mut frame = Vec::with_capacity(width * height * 3 / 2);

    for y in 0..height {
        for x in 0..width {
            frame.push(((x * 255 / (width - 1) + y * 255 / (height - 1)) / 2) as u8);
        }
    }
    for _ in 0..ch {
        for x in 0..cw {
            frame.push((x * 255 / (cw - 1)) as u8);
        }
    }
    for y in 0..ch {
        for _ in 0..cw {
            frame.push((255 - y * 255 / (ch - 1)) as u8);
        }
    }
    frame
}

/// Deterministic xorshift noise.
pub fn noise_frame(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..width * height * 3 / 2)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Largest absolute sample difference.
pub fn max_abs_diff(a: &[u8], b: &[u8]) -> u8 {
    assert_eq!(a.len(), b.len(), "frame length mismatch");
    a.iter().zip(b).map(|(&x, &y)| x.abs_diff(y)).max().unwrap_or(0)
}

/// Mean absolute sample difference.
pub fn mean_abs_diff(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len(), "frame length mismatch");
    let total: u64 = a.iter().zip(b).map(|(&x, &y)| x.abs_diff(y) as u64).sum();
    total as f64 / a.len() as f64
}
