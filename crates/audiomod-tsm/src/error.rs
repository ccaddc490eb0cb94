//! Error types.

use thiserror::Error;

/// TSM error type.
#[derive(Error, Debug)]
pub enum TsmError {
    /// Invalid parameter combination.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// FFT-based algorithms need a power-of-two frame size.
    #[error("Frame size must be a power of two for FFT processing, got {0}")]
    FrameSizeNotPow2(usize),

    /// Resampling failed (pitch scaling path).
    #[error("I/O: {0}")]
    Io(#[from] audiomod_io::IoError),
}

/// Result type.
pub type Result<T> = std::result::Result<T, TsmError>;
