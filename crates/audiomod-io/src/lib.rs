//! # audiomod-io
//!
//! File I/O and sample-rate conversion for the audiomod TSM library.
//!
//! - **WAV decode/encode**: 16-bit, 24-bit and 32-bit float via hound
//! - **Resampling**: FFT-based sample rate conversion via rubato
//! - **AudioBuffer**: planar multi-channel sample storage
//!
//! All audio is `f32` normalized to -1.0..1.0.

pub mod buffer;
pub mod resample;
pub mod wav;

mod error;

pub use buffer::AudioBuffer;
pub use error::{IoError, Result};
pub use resample::{resample_buffer, resample_channel, ResampleQuality};
pub use wav::{read_wav, read_wav_from, write_wav, write_wav_memory, BitDepth};
