//! Frame encoder
//!
//! Transforms planar YUV420 frames into per-plane grids of quantized DCT
//! coefficients. Every block row of every plane is an independent task; one
//! fork-join barrier covers the forward stage and, when reconstruction is
//! enabled, a second one covers the inverse stage which writes the decoded
//! frame back over the input.

use crate::coeffs::{CoefficientGrid, FrameCoefficients};
use crate::consts::{DCTSIZE2, DEFAULT_QUALITY};
use crate::dct::forward_block_row;
use crate::decode::inverse_frame;
use crate::error::Result;
use crate::quant::QuantTables;
use crate::scheduler::{InlineScheduler, TaskBatch, TaskScheduler, ThreadPoolScheduler};
use crate::types::{FrameLayout, PlaneKind};

/// How row tasks are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerKind {
    /// Dedicated worker pool
    #[default]
    ThreadPool,
    /// Sequentially on the calling thread
    Inline,
}

/// Codec settings shared by [`Encoder`] and [`crate::Decoder`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Quantizer scale: 64 reproduces the base tables, 0 is the finest,
    /// values above 1024 are clamped.
    pub quality: u32,
    /// Write the reconstructed frame back over the input after encoding
    pub reconstruct: bool,
    /// Worker threads for [`SchedulerKind::ThreadPool`]; `None` uses one per core
    pub threads: Option<usize>,
    pub scheduler: SchedulerKind,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            reconstruct: true,
            threads: None,
            scheduler: SchedulerKind::ThreadPool,
        }
    }
}

impl CodecConfig {
    /// Set quantizer scale
    #[must_use]
    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    /// Enable or disable in-place reconstruction
    #[must_use]
    pub fn reconstruct(mut self, enable: bool) -> Self {
        self.reconstruct = enable;
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Run all tasks on the calling thread
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.scheduler = SchedulerKind::Inline;
        self
    }

    pub(crate) fn build_scheduler(&self) -> Result<Box<dyn TaskScheduler>> {
        Ok(match self.scheduler {
            SchedulerKind::ThreadPool => Box::new(ThreadPoolScheduler::new(self.threads)?),
            SchedulerKind::Inline => Box::new(InlineScheduler),
        })
    }
}

/// Queue one task per block row of each grid, Y then U then V.
///
/// Every task gets exclusive access to its row of blocks.
fn queue_block_rows<'s, F>(
    batch: &mut TaskBatch<'s>,
    grids: [&'s mut CoefficientGrid; 3],
    task: &'s F,
) where
    F: Fn(PlaneKind, usize, &mut [[i16; DCTSIZE2]]) + Sync,
{
    for (kind, grid) in PlaneKind::ALL.into_iter().zip(grids) {
        for (block_row, row) in grid.rows_mut().enumerate() {
            batch.submit(move || task(kind, block_row, row));
        }
    }
}

/// Forward-transform the planes of `frame` into `coeffs`.
fn forward_frame(
    scheduler: &dyn TaskScheduler,
    layout: &FrameLayout,
    tables: &QuantTables,
    frame: &[u8],
    coeffs: &mut FrameCoefficients,
) -> Result<()> {
    let [y, u, v] = layout.planes(frame)?;
    let transform_row = |kind: PlaneKind, block_row: usize, row: &mut [[i16; DCTSIZE2]]| {
        let plane = match kind {
            PlaneKind::Y => y,
            PlaneKind::U => u,
            PlaneKind::V => v,
        };
        forward_block_row(plane, block_row, &tables.for_plane(kind).reciprocal, row);
    };

    let mut batch = TaskBatch::with_capacity(
        PlaneKind::ALL
            .iter()
            .map(|&kind| layout.block_grid(kind).1)
            .sum(),
    );
    queue_block_rows(
        &mut batch,
        [&mut coeffs.y, &mut coeffs.u, &mut coeffs.v],
        &transform_row,
    );

    log::trace!("forward stage: {} row tasks", batch.len());
    scheduler.wait_all(batch);
    Ok(())
}

/// Builder for [`Encoder`]
#[derive(Debug, Clone)]
pub struct EncoderBuilder {
    name: String,
    res_x: usize,
    res_y: usize,
    config: CodecConfig,
}

impl EncoderBuilder {
    pub fn new(name: impl Into<String>, res_x: usize, res_y: usize) -> Self {
        Self {
            name: name.into(),
            res_x,
            res_y,
            config: CodecConfig::default(),
        }
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Set quantizer scale
    #[must_use]
    pub fn quality(mut self, quality: u32) -> Self {
        self.config = self.config.quality(quality);
        self
    }

    /// Enable or disable in-place reconstruction
    #[must_use]
    pub fn reconstruct(mut self, enable: bool) -> Self {
        self.config = self.config.reconstruct(enable);
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.config = self.config.threads(threads);
        self
    }

    /// Run all tasks on the calling thread
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.config = self.config.inline();
        self
    }

    /// Validate the resolution and allocate every buffer the encoder needs.
    ///
    /// Nothing is kept if any step fails.
    pub fn build(self) -> Result<Encoder> {
        let layout = FrameLayout::new(self.res_x, self.res_y)?;
        let tables = QuantTables::new(self.config.quality);
        let coeffs = FrameCoefficients::new(&layout)?;
        let scheduler = self.config.build_scheduler()?;

        log::debug!(
            "created encoder '{}' {}x{} (quality {}, {} workers)",
            self.name,
            self.res_x,
            self.res_y,
            tables.quality,
            scheduler.concurrency()
        );

        Ok(Encoder {
            name: self.name,
            layout,
            config: self.config,
            tables,
            coeffs,
            scheduler,
            frames: 0,
        })
    }
}

/// Block transform encoder for YUV420 frames
#[derive(Debug)]
pub struct Encoder {
    name: String,
    layout: FrameLayout,
    config: CodecConfig,
    tables: QuantTables,
    coeffs: FrameCoefficients,
    scheduler: Box<dyn TaskScheduler>,
    frames: u64,
}

impl Encoder {
    /// Create an encoder with the default configuration.
    ///
    /// Both dimensions must be non-zero multiples of 64.
    pub fn create(name: impl Into<String>, res_x: usize, res_y: usize) -> Result<Self> {
        EncoderBuilder::new(name, res_x, res_y).build()
    }

    /// Start configuring an encoder
    pub fn builder(name: impl Into<String>, res_x: usize, res_y: usize) -> EncoderBuilder {
        EncoderBuilder::new(name, res_x, res_y)
    }

    /// Encode one frame.
    ///
    /// `frame` must hold at least `res_x * res_y * 3 / 2` bytes; anything
    /// beyond that is ignored. With reconstruction enabled the frame is
    /// overwritten with its decoded version. On error neither the frame nor
    /// the coefficients are modified.
    pub fn add_frame_yuv420(&mut self, frame: &mut [u8]) -> Result<()> {
        log::trace!("encoder '{}': frame {}", self.name, self.frames);

        forward_frame(
            self.scheduler.as_ref(),
            &self.layout,
            &self.tables,
            frame,
            &mut self.coeffs,
        )?;

        if self.config.reconstruct {
            inverse_frame(
                self.scheduler.as_ref(),
                &self.layout,
                &self.tables,
                &self.coeffs,
                frame,
            )?;
        }

        self.frames += 1;
        Ok(())
    }

    /// Coefficients of the most recent frame
    pub fn coefficients(&self) -> &FrameCoefficients {
        &self.coeffs
    }

    /// Number of frames encoded so far
    pub fn frame_index(&self) -> u64 {
        self.frames
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Quantization tables in use
    pub fn tables(&self) -> &QuantTables {
        &self.tables
    }

    /// Finish encoding and release all buffers. Returns the frame count.
    pub fn finalize(self) -> u64 {
        log::debug!(
            "finalized encoder '{}' after {} frames",
            self.name,
            self.frames
        );
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ResultCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.quality, 75);
        assert!(config.reconstruct);
        assert_eq!(config.scheduler, SchedulerKind::ThreadPool);
    }

    #[test]
    fn test_builder_applies_settings() {
        let encoder = Encoder::builder("test", 128, 64)
            .quality(0)
            .reconstruct(false)
            .inline()
            .build()
            .unwrap();
        assert_eq!(encoder.name(), "test");
        assert_eq!(encoder.config().quality, 0);
        assert!(!encoder.config().reconstruct);
        assert_eq!(encoder.tables().luma.forward[0], 2);
        assert_eq!(encoder.coefficients().y.blocks_wide(), 16);
    }

    #[test]
    fn test_quality_is_clamped() {
        let encoder = Encoder::builder("test", 64, 64)
            .quality(5000)
            .inline()
            .build()
            .unwrap();
        assert_eq!(encoder.tables().quality, 1024);
    }

    #[test]
    fn test_invalid_resolution() {
        let err = Encoder::create("bad", 100, 64).unwrap_err();
        assert!(matches!(err, Error::InvalidResolution { width: 100, .. }));
        assert_eq!(ResultCode::from(&Encoder::create("bad", 64, 0)), ResultCode::Failure);
    }

    #[test]
    fn test_short_frame_leaves_state_untouched() {
        let mut encoder = Encoder::builder("test", 64, 64).inline().build().unwrap();
        let mut frame = vec![200u8; 100];
        let err = encoder.add_frame_yuv420(&mut frame).unwrap_err();
        assert_eq!(err.code(), ResultCode::Failure);
        assert_eq!(encoder.frame_index(), 0);
        assert!(frame.iter().all(|&p| p == 200));
        assert!(encoder.coefficients().y.as_slice().iter().all(|b| b[0] == 0));
    }

    #[test]
    fn test_frame_counter_and_finalize() {
        let mut encoder = Encoder::builder("test", 64, 64).inline().build().unwrap();
        let mut frame = vec![128u8; encoder.layout().frame_len()];
        encoder.add_frame_yuv420(&mut frame).unwrap();
        encoder.add_frame_yuv420(&mut frame).unwrap();
        assert_eq!(encoder.frame_index(), 2);
        assert_eq!(encoder.finalize(), 2);
    }

    #[test]
    fn test_reconstruct_disabled_keeps_input() {
        let mut encoder = Encoder::builder("test", 64, 64)
            .reconstruct(false)
            .inline()
            .build()
            .unwrap();
        let mut frame: Vec<u8> = (0..encoder.layout().frame_len())
            .map(|i| (i * 7 % 256) as u8)
            .collect();
        let original = frame.clone();
        encoder.add_frame_yuv420(&mut frame).unwrap();
        assert_eq!(frame, original);
        assert!(encoder.coefficients().y.as_slice().iter().any(|b| b[1] != 0));
    }

    #[test]
    fn test_every_block_queued_exactly_once() {
        let layout = FrameLayout::new(192, 128).unwrap();
        let mut coeffs = FrameCoefficients::new(&layout).unwrap();

        let counters: Vec<Vec<AtomicUsize>> = PlaneKind::ALL
            .iter()
            .map(|&kind| {
                let (wide, tall) = layout.block_grid(kind);
                (0..wide * tall).map(|_| AtomicUsize::new(0)).collect()
            })
            .collect();
        let count_row = |kind: PlaneKind, block_row: usize, row: &mut [[i16; DCTSIZE2]]| {
            let plane = &counters[kind as usize];
            let blocks_wide = row.len();
            for (block_col, block) in row.iter_mut().enumerate() {
                plane[block_row * blocks_wide + block_col].fetch_add(1, Ordering::Relaxed);
                block[0] = block_row as i16;
                block[1] = block_col as i16;
            }
        };

        let pool = ThreadPoolScheduler::new(Some(4)).unwrap();
        let mut batch = TaskBatch::new();
        queue_block_rows(
            &mut batch,
            [&mut coeffs.y, &mut coeffs.u, &mut coeffs.v],
            &count_row,
        );
        // one task per block row: 16 luma + 8 + 8 chroma
        assert_eq!(batch.len(), 32);
        pool.wait_all(batch);

        for (kind, plane) in PlaneKind::ALL.into_iter().zip(&counters) {
            assert_eq!(plane.len(), if kind.is_chroma() { 96 } else { 384 });
            for (i, c) in plane.iter().enumerate() {
                assert_eq!(c.load(Ordering::Relaxed), 1, "{kind:?} block {i}");
            }

            let grid = coeffs.plane(kind);
            for r in 0..grid.blocks_tall() {
                for c in 0..grid.blocks_wide() {
                    assert_eq!(&grid.block(r, c)[..2], &[r as i16, c as i16]);
                }
            }
        }
    }

    #[test]
    fn test_uniform_luma_gives_dc_only() {
        let mut encoder = Encoder::builder("test", 64, 64)
            .quality(0)
            .inline()
            .build()
            .unwrap();
        let layout = *encoder.layout();
        let mut frame = vec![128u8; layout.frame_len()];
        frame[..layout.plane_len(PlaneKind::Y)].fill(200);
        encoder.add_frame_yuv420(&mut frame).unwrap();

        // (200 - 128) * 8 / 2
        for block in encoder.coefficients().y.as_slice() {
            assert_eq!(block[0], 288);
            assert!(block[1..].iter().all(|&c| c == 0));
        }
        for block in encoder.coefficients().u.as_slice() {
            assert!(block.iter().all(|&c| c == 0));
        }
        assert!(frame[..4096].iter().all(|&p| p == 200));
    }
}
