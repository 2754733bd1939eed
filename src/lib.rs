//! # swapcodec - block-parallel DCT transform codec
//!
//! swapcodec turns planar YUV420 frames into quantized 8x8 DCT coefficients
//! and back. It is the transform stage of a block codec: entropy coding and
//! bitstream output are left to the caller.
//!
//! ## Pipeline
//!
//! - **Quantization tables**: the JPEG Annex K luma/chroma tables scaled by a
//!   quality factor, stored as a zigzag forward table and a natural-order
//!   reciprocal table
//! - **Forward stage**: edge-replicating block extraction, integer DCT-II and
//!   multiply-shift quantization, coefficients stored in zigzag order
//! - **Inverse stage**: dequantization plus a fixed-point IDCT over 8-lane
//!   vectors, saturated back to 8-bit samples
//! - **Scheduling**: one task per block row, run on a thread pool and joined
//!   at a single barrier per stage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use swapcodec::Encoder;
//!
//! # fn main() -> swapcodec::Result<()> {
//! let mut encoder = Encoder::builder("camera0", 1920, 1088)
//!     .quality(75)
//!     .build()?;
//!
//! let mut frame = vec![128u8; 1920 * 1088 * 3 / 2];
//! encoder.add_frame_yuv420(&mut frame)?;
//!
//! let dc = encoder.coefficients().y.block(0, 0)[0];
//! # let _ = dc;
//! # Ok(())
//! # }
//! ```
//!
//! ## Quality
//!
//! Quality scales the base tables linearly: 64 reproduces them, 0 gives the
//! finest table (every quantizer 2) and 1024 the coarsest. The default is 75.

// Core modules
mod alloc;
mod consts;
mod error;
mod types;

// Transform pipeline
mod coeffs;
mod dct;
mod idct;
mod quant;

// Orchestration
mod decode;
mod encode;
pub mod scheduler;

// Public API
pub use coeffs::{CoefficientGrid, FrameCoefficients};
pub use consts::{DCTSIZE, DCTSIZE2, DEFAULT_QUALITY, MAX_QUALITY, NATURAL_ORDER, ZIGZAG};
pub use dct::{extract_block, format_block, forward_dct_8x8};
pub use decode::Decoder;
pub use encode::{CodecConfig, Encoder, EncoderBuilder, SchedulerKind};
pub use error::{Error, ResultCode};
pub use idct::inverse_dct_8x8;
pub use quant::{QuantTable, QuantTables};
pub use types::{FrameLayout, PlaneKind};

/// Result type for swapcodec operations
pub type Result<T> = std::result::Result<T, Error>;
