//! Core types for swapcodec

use imgref::ImgRef;

use crate::consts::{DCTSIZE, RESOLUTION_ALIGN};
use crate::error::{Error, Result};

/// Plane of a YUV420 frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    /// Luma, full resolution
    Y,
    /// Blue-difference chroma, half resolution in both directions
    U,
    /// Red-difference chroma, half resolution in both directions
    V,
}

impl PlaneKind {
    /// All planes in buffer order
    pub const ALL: [PlaneKind; 3] = [PlaneKind::Y, PlaneKind::U, PlaneKind::V];

    /// Whether this plane uses the chroma quantization table
    #[must_use]
    pub const fn is_chroma(self) -> bool {
        !matches!(self, PlaneKind::Y)
    }
}

/// Geometry of a planar YUV420 frame
///
/// The buffer holds `width * height` luma samples followed by the U plane
/// and then the V plane, each `width/2 * height/2` samples. Rows are tightly
/// packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    width: usize,
    height: usize,
}

impl FrameLayout {
    /// Validate a resolution.
    ///
    /// Both dimensions must be non-zero multiples of 64.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResolution {
                width,
                height,
                reason: "dimensions cannot be zero",
            });
        }
        if width % RESOLUTION_ALIGN != 0 || height % RESOLUTION_ALIGN != 0 {
            return Err(Error::InvalidResolution {
                width,
                height,
                reason: "dimensions must be multiples of 64",
            });
        }
        // frame_len() must not overflow
        crate::alloc::checked_size(width, height, 2)?;

        Ok(Self { width, height })
    }

    /// Luma width
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Luma height
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Dimensions of one plane
    #[must_use]
    pub fn plane_size(&self, kind: PlaneKind) -> (usize, usize) {
        if kind.is_chroma() {
            (self.width / 2, self.height / 2)
        } else {
            (self.width, self.height)
        }
    }

    /// Samples in one plane
    #[must_use]
    pub fn plane_len(&self, kind: PlaneKind) -> usize {
        let (w, h) = self.plane_size(kind);
        w * h
    }

    /// Bytes in one frame
    #[must_use]
    pub fn frame_len(&self) -> usize {
        self.width * self.height * 3 / 2
    }

    /// Blocks per row and block rows of one plane
    #[must_use]
    pub fn block_grid(&self, kind: PlaneKind) -> (usize, usize) {
        let (w, h) = self.plane_size(kind);
        (w.div_ceil(DCTSIZE), h.div_ceil(DCTSIZE))
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let expected = self.frame_len();
        if len < expected {
            return Err(Error::InvalidBufferSize {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    /// Read-only plane views of a frame buffer, in Y, U, V order.
    pub fn planes<'a>(&self, frame: &'a [u8]) -> Result<[ImgRef<'a, u8>; 3]> {
        self.check_len(frame.len())?;
        let (y, rest) = frame.split_at(self.plane_len(PlaneKind::Y));
        let (u, rest) = rest.split_at(self.plane_len(PlaneKind::U));
        let v = &rest[..self.plane_len(PlaneKind::V)];

        let (cw, ch) = self.plane_size(PlaneKind::U);
        Ok([
            ImgRef::new(y, self.width, self.height),
            ImgRef::new(u, cw, ch),
            ImgRef::new(v, cw, ch),
        ])
    }

    /// Mutable plane slices of a frame buffer, in Y, U, V order.
    pub fn planes_mut<'a>(&self, frame: &'a mut [u8]) -> Result<[&'a mut [u8]; 3]> {
        self.check_len(frame.len())?;
        let (y, rest) = frame.split_at_mut(self.plane_len(PlaneKind::Y));
        let (u, rest) = rest.split_at_mut(self.plane_len(PlaneKind::U));
        let v = &mut rest[..self.plane_len(PlaneKind::V)];
        Ok([y, u, v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResultCode;

    #[test]
    fn test_layout_sizes() {
        let layout = FrameLayout::new(128, 64).unwrap();
        assert_eq!(layout.plane_size(PlaneKind::Y), (128, 64));
        assert_eq!(layout.plane_size(PlaneKind::V), (64, 32));
        assert_eq!(layout.frame_len(), 128 * 64 + 2 * 64 * 32);
        assert_eq!(layout.block_grid(PlaneKind::Y), (16, 8));
        assert_eq!(layout.block_grid(PlaneKind::U), (8, 4));
    }

    #[test]
    fn test_invalid_resolutions() {
        for (w, h) in [(100, 64), (64, 100), (0, 64), (64, 0), (32, 32)] {
            let err = FrameLayout::new(w, h).unwrap_err();
            assert!(matches!(err, Error::InvalidResolution { .. }), "{w}x{h}");
            assert_eq!(err.code(), ResultCode::Failure);
        }
    }

    #[test]
    fn test_plane_split() {
        let layout = FrameLayout::new(64, 64).unwrap();
        let mut frame = vec![0u8; layout.frame_len()];
        frame[64 * 64] = 1;
        frame[64 * 64 + 32 * 32] = 2;

        let [y, u, v] = layout.planes(&frame).unwrap();
        assert_eq!((y.width(), y.height()), (64, 64));
        assert_eq!((u.width(), u.height()), (32, 32));
        assert_eq!(u.buf()[0], 1);
        assert_eq!(v.buf()[0], 2);

        let [y, u, v] = layout.planes_mut(&mut frame).unwrap();
        assert_eq!(y.len(), 4096);
        assert_eq!(u.len(), 1024);
        assert_eq!(v.len(), 1024);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let layout = FrameLayout::new(64, 64).unwrap();
        let frame = vec![0u8; layout.frame_len() - 1];
        let err = layout.planes(&frame).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBufferSize {
                expected: 6144,
                actual: 6143
            }
        );
    }

    #[test]
    fn test_oversized_buffer_accepted() {
        let layout = FrameLayout::new(64, 64).unwrap();
        let mut frame = vec![0u8; layout.frame_len() + 10];
        assert!(layout.planes_mut(&mut frame).is_ok());
    }
}
