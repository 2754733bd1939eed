//! Quantized coefficient storage
//!
//! One [`CoefficientGrid`] per plane: a row-major grid of 8x8 blocks, each
//! holding 64 quantized coefficients in zigzag order.

use crate::alloc::try_alloc_dct_blocks;
use crate::consts::DCTSIZE2;
use crate::error::Result;
use crate::types::{FrameLayout, PlaneKind};

/// Coefficient blocks of one plane
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientGrid {
    blocks_wide: usize,
    blocks_tall: usize,
    blocks: Vec<[i16; DCTSIZE2]>,
}

impl CoefficientGrid {
    /// Allocate a zeroed grid.
    pub fn new(blocks_wide: usize, blocks_tall: usize) -> Result<Self> {
        let count = crate::alloc::checked_size(blocks_wide, blocks_tall, 1)?;
        let blocks = try_alloc_dct_blocks(count, "allocating coefficient grid")?;
        Ok(Self {
            blocks_wide,
            blocks_tall,
            blocks,
        })
    }

    /// Blocks per row
    #[inline]
    pub fn blocks_wide(&self) -> usize {
        self.blocks_wide
    }

    /// Block rows
    #[inline]
    pub fn blocks_tall(&self) -> usize {
        self.blocks_tall
    }

    /// Block at (`row`, `col`).
    ///
    /// # Panics
    /// If the position is outside the grid.
    #[inline]
    pub fn block(&self, row: usize, col: usize) -> &[i16; DCTSIZE2] {
        assert!(col < self.blocks_wide, "block column {col} out of range");
        &self.blocks[row * self.blocks_wide + col]
    }

    /// Mutable block at (`row`, `col`).
    #[inline]
    pub fn block_mut(&mut self, row: usize, col: usize) -> &mut [i16; DCTSIZE2] {
        assert!(col < self.blocks_wide, "block column {col} out of range");
        &mut self.blocks[row * self.blocks_wide + col]
    }

    /// Block rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[[i16; DCTSIZE2]]> + '_ {
        self.blocks.chunks_exact(self.blocks_wide)
    }

    /// Disjoint mutable block rows, top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [[i16; DCTSIZE2]]> + '_ {
        self.blocks.chunks_exact_mut(self.blocks_wide)
    }

    /// All blocks in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[[i16; DCTSIZE2]] {
        &self.blocks
    }
}

/// Coefficient grids for the three planes of a YUV420 frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCoefficients {
    pub y: CoefficientGrid,
    pub u: CoefficientGrid,
    pub v: CoefficientGrid,
}

impl FrameCoefficients {
    /// Allocate zeroed grids sized for `layout`.
    pub fn new(layout: &FrameLayout) -> Result<Self> {
        let grid = |kind| {
            let (wide, tall) = layout.block_grid(kind);
            CoefficientGrid::new(wide, tall)
        };
        Ok(Self {
            y: grid(PlaneKind::Y)?,
            u: grid(PlaneKind::U)?,
            v: grid(PlaneKind::V)?,
        })
    }

    /// Grid of one plane
    pub fn plane(&self, kind: PlaneKind) -> &CoefficientGrid {
        match kind {
            PlaneKind::Y => &self.y,
            PlaneKind::U => &self.u,
            PlaneKind::V => &self.v,
        }
    }

    /// Mutable grid of one plane
    pub fn plane_mut(&mut self, kind: PlaneKind) -> &mut CoefficientGrid {
        match kind {
            PlaneKind::Y => &mut self.y,
            PlaneKind::U => &mut self.u,
            PlaneKind::V => &mut self.v,
        }
    }
}
