//! Overlap-Add (OLA) time-scale modification.
//!
//! The simplest TSM: frames taken at the analysis hop are windowed and
//! overlap-added at the synthesis hop. Well suited to percussive and
//! transient material; harmonic content suffers phase artifacts (use the
//! phase vocoder for that).

use crate::error::{Result, TsmError};
use crate::frame::{overlap_add, split_into_frames, window_envelope};
use crate::params::StretchParams;
use crate::window::{hann, WindowKind};
use crate::TimeScaleModifier;

/// Overlap-add time stretcher.
#[derive(Debug, Clone)]
pub struct Ola {
    params: StretchParams,
    synthesis_window: Vec<f32>,
}

impl Ola {
    /// Create an OLA stretcher with a periodic Hann synthesis window.
    pub fn new(params: StretchParams) -> Self {
        let synthesis_window = hann(params.frame_size, WindowKind::Periodic);
        Self {
            params,
            synthesis_window,
        }
    }

    /// Create with a custom synthesis window.
    pub fn with_window(params: StretchParams, synthesis_window: Vec<f32>) -> Result<Self> {
        if synthesis_window.len() != params.frame_size {
            return Err(TsmError::InvalidParams(format!(
                "window length {} does not match frame size {}",
                synthesis_window.len(),
                params.frame_size
            )));
        }
        Ok(Self {
            params,
            synthesis_window,
        })
    }

    /// Window the frames and overlap-add them at the synthesis hop,
    /// normalizing by the summed window envelope.
    ///
    /// Shared with WSOLA, which differs only in how frames are selected.
    pub(crate) fn synthesize(&self, mut frames: Vec<Vec<f32>>) -> Vec<f32> {
        if frames.is_empty() {
            return Vec::new();
        }

        for frame in &mut frames {
            for (sample, &w) in frame.iter_mut().zip(&self.synthesis_window) {
                *sample *= w;
            }
        }

        let hop = self.params.synthesis_hop;
        let mut signal = overlap_add(&frames, hop);

        // At exactly 50% overlap the Hann windows already sum to 1.0 (COLA);
        // any other hop needs pointwise normalization.
        if hop * 2 != self.params.frame_size {
            let envelope = window_envelope(&self.synthesis_window, frames.len(), hop);
            for (sample, &env) in signal.iter_mut().zip(&envelope) {
                *sample /= env;
            }
        }

        signal
    }
}

impl TimeScaleModifier for Ola {
    fn run(&mut self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }
        let frames = split_into_frames(signal, self.params.frame_size, self.params.analysis_hop);
        self.synthesize(frames)
    }

    fn params(&self) -> &StretchParams {
        &self.params
    }
}
