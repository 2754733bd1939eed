//! Fallible allocation helpers.
//!
//! Frame-sized buffers are reserved with `try_reserve_exact` so that an
//! oversized resolution reports [`Error::AllocationFailed`] instead of
//! aborting the process.

use crate::consts::DCTSIZE2;
use crate::error::{Error, Result};

/// Calculate size with overflow checking.
#[inline]
pub fn checked_size(width: usize, height: usize, bytes_per_sample: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|samples| samples.checked_mul(bytes_per_sample))
        .ok_or(Error::SizeOverflow {
            context: "calculating buffer size",
        })
}

/// Allocate a Vec filled with a specific value using fallible allocation.
#[inline]
pub fn try_alloc_filled<T: Clone>(count: usize, value: T, context: &'static str) -> Result<Vec<T>> {
    let byte_size = count
        .checked_mul(std::mem::size_of::<T>())
        .ok_or(Error::SizeOverflow { context })?;

    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| Error::AllocationFailed {
            bytes: byte_size,
            context,
        })?;
    v.resize(count, value);
    Ok(v)
}

/// Allocate zeroed DCT blocks (64 i16 values each).
#[inline]
pub fn try_alloc_dct_blocks(count: usize, context: &'static str) -> Result<Vec<[i16; DCTSIZE2]>> {
    try_alloc_filled(count, [0i16; DCTSIZE2], context)
}
