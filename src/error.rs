//! Error types for swapcodec

use std::fmt;

/// Result type for swapcodec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for swapcodec operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Frame dimensions rejected at construction
    InvalidResolution {
        width: usize,
        height: usize,
        reason: &'static str,
    },
    /// Frame buffer is smaller than one YUV420 frame
    InvalidBufferSize { expected: usize, actual: usize },
    /// Memory allocation failed (OOM)
    AllocationFailed { bytes: usize, context: &'static str },
    /// Size calculation overflowed
    SizeOverflow { context: &'static str },
    /// Worker pool could not be started
    SchedulerInit { reason: String },
    /// Internal invariant violated
    InternalError { reason: &'static str },
}

/// Coarse outcome of a codec call, for callers that branch on a status code
/// rather than matching on [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    Failure,
    InternalError,
    MemoryAllocationFailure,
}

impl Error {
    /// Status code this error reports as.
    #[must_use]
    pub fn code(&self) -> ResultCode {
        match self {
            Error::InvalidResolution { .. } | Error::InvalidBufferSize { .. } => {
                ResultCode::Failure
            }
            Error::AllocationFailed { .. } | Error::SizeOverflow { .. } => {
                ResultCode::MemoryAllocationFailure
            }
            Error::SchedulerInit { .. } | Error::InternalError { .. } => ResultCode::InternalError,
        }
    }
}

impl<T> From<&Result<T>> for ResultCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.code(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidResolution {
                width,
                height,
                reason,
            } => {
                write!(f, "invalid resolution {}x{}: {}", width, height, reason)
            }
            Error::InvalidBufferSize { expected, actual } => {
                write!(
                    f,
                    "invalid frame buffer size: expected at least {} bytes, got {}",
                    expected, actual
                )
            }
            Error::AllocationFailed { bytes, context } => {
                write!(f, "allocation of {} bytes failed while {}", bytes, context)
            }
            Error::SizeOverflow { context } => {
                write!(f, "size calculation overflow while {}", context)
            }
            Error::SchedulerInit { reason } => {
                write!(f, "failed to start worker pool: {}", reason)
            }
            Error::InternalError { reason } => write!(f, "internal error: {}", reason),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultCode::Success => "success",
            ResultCode::Failure => "failure",
            ResultCode::InternalError => "internal error",
            ResultCode::MemoryAllocationFailure => "memory allocation failure",
        };
        f.write_str(name)
    }
}
