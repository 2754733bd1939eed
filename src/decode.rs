//! Frame reconstruction
//!
//! Runs the inverse transform over every block row of the three planes as one
//! fork-join batch. The encoder reuses [`inverse_frame`] to reconstruct its
//! input in place.

use crate::coeffs::FrameCoefficients;
use crate::consts::DCTSIZE;
use crate::encode::CodecConfig;
use crate::error::{Error, Result};
use crate::idct::inverse_block_row;
use crate::quant::QuantTables;
use crate::scheduler::{TaskBatch, TaskScheduler};
use crate::types::{FrameLayout, PlaneKind};

/// Inverse-transform `coeffs` into the planes of `frame`.
///
/// Validates the buffer before any task is queued.
pub(crate) fn inverse_frame(
    scheduler: &dyn TaskScheduler,
    layout: &FrameLayout,
    tables: &QuantTables,
    coeffs: &FrameCoefficients,
    frame: &mut [u8],
) -> Result<()> {
    let planes = layout.planes_mut(frame)?;

    let mut batch = TaskBatch::with_capacity(
        PlaneKind::ALL
            .iter()
            .map(|&kind| layout.block_grid(kind).1)
            .sum(),
    );
    for (kind, plane) in PlaneKind::ALL.into_iter().zip(planes) {
        let grid = coeffs.plane(kind);
        let quant = &tables.for_plane(kind).forward;
        let (width, _) = layout.plane_size(kind);

        for (row, band) in grid.rows().zip(plane.chunks_mut(width * DCTSIZE)) {
            batch.submit(move || inverse_block_row(row, quant, band, width, width));
        }
    }

    log::trace!("inverse stage: {} row tasks", batch.len());
    scheduler.wait_all(batch);
    Ok(())
}

/// Reconstructs YUV420 frames from quantized coefficients.
#[derive(Debug)]
pub struct Decoder {
    layout: FrameLayout,
    tables: QuantTables,
    scheduler: Box<dyn TaskScheduler>,
}

impl Decoder {
    /// Create a decoder with the default configuration.
    pub fn create(res_x: usize, res_y: usize) -> Result<Self> {
        Self::with_config(res_x, res_y, &CodecConfig::default())
    }

    /// Create a decoder. `config.quality` must match the encoder's.
    pub fn with_config(res_x: usize, res_y: usize, config: &CodecConfig) -> Result<Self> {
        let layout = FrameLayout::new(res_x, res_y)?;
        let tables = QuantTables::new(config.quality);
        let scheduler = config.build_scheduler()?;

        log::debug!(
            "created decoder {}x{} (quality {}, {} workers)",
            res_x,
            res_y,
            tables.quality,
            scheduler.concurrency()
        );
        Ok(Self {
            layout,
            tables,
            scheduler,
        })
    }

    /// Frame geometry
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Reconstruct one frame into `frame`, which must hold at least one
    /// YUV420 frame.
    pub fn decode_frame_yuv420(&self, coeffs: &FrameCoefficients, frame: &mut [u8]) -> Result<()> {
        for kind in PlaneKind::ALL {
            let grid = coeffs.plane(kind);
            if (grid.blocks_wide(), grid.blocks_tall()) != self.layout.block_grid(kind) {
                return Err(Error::InvalidResolution {
                    width: self.layout.width(),
                    height: self.layout.height(),
                    reason: "coefficient grid does not match frame resolution",
                });
            }
        }

        inverse_frame(
            self.scheduler.as_ref(),
            &self.layout,
            &self.tables,
            coeffs,
            frame,
        )
    }
}
