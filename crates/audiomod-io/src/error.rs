//! Error types for audiomod-io

use std::io;
use thiserror::Error;

/// I/O error type
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WAV encoding/decoding error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Unsupported format or sample layout
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Resampling error
    #[error("Resampling error: {0}")]
    Resample(String),

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),
}

/// Result type for I/O operations
pub type Result<T> = std::result::Result<T, IoError>;

// Convert external resampler errors to simple strings for user-facing messages
impl From<rubato::ResamplerConstructionError> for IoError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        IoError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for IoError {
    fn from(e: rubato::ResampleError) -> Self {
        IoError::Resample(e.to_string())
    }
}
