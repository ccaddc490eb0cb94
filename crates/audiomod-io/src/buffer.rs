//! Planar audio buffer.
//!
//! Holds one `Vec<f32>` per channel with all channels the same length.
//! Planar layout keeps per-channel DSP (the common case for TSM) free of
//! interleaving logic; interleaving happens only at the WAV boundary.

use crate::error::{IoError, Result};

/// Planar multi-channel audio, samples normalized to -1.0..1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Create a mono buffer.
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            channels: vec![samples],
        }
    }

    /// Create a stereo buffer from left/right channels of equal length.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>) -> Result<Self> {
        if left.len() != right.len() {
            return Err(IoError::InvalidData(
                "Left and right channels have different lengths".into(),
            ));
        }
        Ok(Self {
            channels: vec![left, right],
        })
    }

    /// Create from arbitrary planar channels of equal length.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self> {
        if channels.is_empty() {
            return Err(IoError::InvalidData("No channels provided".into()));
        }
        let len = channels[0].len();
        if channels.iter().any(|c| c.len() != len) {
            return Err(IoError::InvalidData(
                "Channels have different lengths".into(),
            ));
        }
        Ok(Self { channels })
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Duration in seconds at the given sample rate.
    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.num_frames() as f64 / sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono() {
        let buf = AudioBuffer::mono(vec![0.0, 0.5, -0.5]);
        assert_eq!(buf.num_channels(), 1);
        assert_eq!(buf.num_frames(), 3);
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_stereo() {
        let buf = AudioBuffer::stereo(vec![0.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.channel(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_stereo_mismatched_lengths() {
        let result = AudioBuffer::stereo(vec![0.0, 1.0], vec![1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_channels_empty() {
        assert!(AudioBuffer::from_channels(vec![]).is_err());
    }

    #[test]
    fn test_duration() {
        let buf = AudioBuffer::mono(vec![0.0; 44100]);
        assert!((buf.duration_seconds(44100) - 1.0).abs() < 1e-9);
    }
}
