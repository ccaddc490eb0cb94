//! Stretch parameters shared by all TSM algorithms.

use crate::error::{Result, TsmError};

/// Minimum speed factor (4x slower)
pub const MIN_SPEED: f32 = 0.25;
/// Maximum speed factor (4x faster)
pub const MAX_SPEED: f32 = 4.0;
/// Minimum synthesis hop; below this the analysis hop can round to zero
pub const MIN_SYNTHESIS_HOP: usize = 10;
/// Minimum pitch shift (-2 octaves)
pub const MIN_PITCH_CENTS: f32 = -2400.0;
/// Maximum pitch shift (+2 octaves)
pub const MAX_PITCH_CENTS: f32 = 2400.0;

/// Frame size, speed factor and hop sizes driving a time-scale modification.
///
/// `speed < 1.0` slows playback down (longer output), `speed > 1.0` speeds it
/// up. The synthesis hop defaults to a quarter of the frame size (75%
/// overlap) and the analysis hop to `synthesis_hop * speed`, so output
/// length approaches `input_length / speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchParams {
    /// Analysis/synthesis frame size in samples.
    pub frame_size: usize,
    /// Speed factor, clamped to 0.25..4.0.
    pub speed: f32,
    /// Spacing of frames in the output signal.
    pub synthesis_hop: usize,
    /// Spacing of frames taken from the input signal.
    pub analysis_hop: usize,
}

impl StretchParams {
    /// Create parameters with default hop sizes for the given speed.
    pub fn new(frame_size: usize, speed: f32) -> Result<Self> {
        Self::with_hops(frame_size, speed, None, None)
    }

    /// Create parameters, overriding either hop size.
    ///
    /// When `analysis_hop` is `None` it is derived from the synthesis hop and
    /// the speed factor.
    pub fn with_hops(
        frame_size: usize,
        speed: f32,
        synthesis_hop: Option<usize>,
        analysis_hop: Option<usize>,
    ) -> Result<Self> {
        if frame_size == 0 {
            return Err(TsmError::InvalidParams("frame size must be non-zero".into()));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(TsmError::InvalidParams(format!(
                "speed factor must be positive and finite, got {speed}"
            )));
        }
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);

        let synthesis_hop = synthesis_hop.unwrap_or(frame_size / 4);
        if !(MIN_SYNTHESIS_HOP..=frame_size).contains(&synthesis_hop) {
            return Err(TsmError::InvalidParams(format!(
                "synthesis hop {synthesis_hop} outside [{MIN_SYNTHESIS_HOP}, {frame_size}]"
            )));
        }

        let analysis_hop =
            analysis_hop.unwrap_or(((synthesis_hop as f32 * speed).round() as usize).max(1));
        if analysis_hop == 0 {
            return Err(TsmError::InvalidParams(
                "analysis hop must be non-zero".into(),
            ));
        }

        Ok(Self {
            frame_size,
            speed,
            synthesis_hop,
            analysis_hop,
        })
    }

    /// True when the parameters describe a no-op stretch.
    pub fn is_identity(&self) -> bool {
        self.analysis_hop == self.synthesis_hop
    }

    /// Approximate output length for a given input length.
    pub fn output_len_hint(&self, input_len: usize) -> usize {
        if input_len == 0 {
            return 0;
        }
        let ratio = self.synthesis_hop as f64 / self.analysis_hop as f64;
        (input_len as f64 * ratio).round() as usize
    }
}

/// Convert a pitch shift in cents to a frequency ratio.
///
/// 100 cents = 1 semitone; the input is clamped to ±2 octaves.
pub fn pitch_ratio_from_cents(cents: f32) -> f32 {
    2.0_f32.powf(cents.clamp(MIN_PITCH_CENTS, MAX_PITCH_CENTS) / 1200.0)
}
