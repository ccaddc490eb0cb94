//! Phase vocoder time-scale modification.
//!
//! STFT-based TSM suited to harmonic material. Each bin's instantaneous
//! frequency is recovered from the phase difference between consecutive
//! analysis frames (after removing the expected per-hop phase advance and
//! wrapping), then re-accumulated at the synthesis hop so sinusoids stay
//! phase-coherent when frames are respaced.

use std::f32::consts::PI;

use rustfft::num_complex::Complex;

use crate::error::Result;
use crate::params::StretchParams;
use crate::stft::Stft;
use crate::TimeScaleModifier;

/// Phase vocoder time stretcher.
pub struct PhaseVocoder {
    params: StretchParams,
    stft: Stft,
    // Expected phase advance per bin over one analysis hop
    expected_advance: Vec<f32>,
}

impl PhaseVocoder {
    /// Create a phase vocoder. The frame size must be a power of two.
    pub fn new(params: StretchParams) -> Result<Self> {
        let stft = Stft::new(params.frame_size, params.analysis_hop)?;
        let num_bins = stft.num_bins();
        let expected_advance: Vec<f32> = (0..num_bins)
            .map(|k| {
                2.0 * PI * k as f32 * params.analysis_hop as f32 / params.frame_size as f32
            })
            .collect();

        Ok(Self {
            params,
            stft,
            expected_advance,
        })
    }

    /// Wrap a phase value to (-PI, PI].
    #[inline]
    fn wrap_phase(phase: f32) -> f32 {
        let wrapped = (phase + PI).rem_euclid(2.0 * PI) - PI;
        if wrapped == -PI {
            PI
        } else {
            wrapped
        }
    }

    /// Replace analysis phases with phases accumulated at the synthesis hop.
    fn propagate_phases(&self, frames: &mut [Vec<Complex<f32>>]) {
        let num_bins = self.stft.num_bins();
        let hop_ratio = self.params.synthesis_hop as f32 / self.params.analysis_hop as f32;

        let mut last_phase = vec![0.0f32; num_bins];
        let mut synth_phase = vec![0.0f32; num_bins];

        for (frame_idx, frame) in frames.iter_mut().enumerate() {
            for (k, bin) in frame.iter_mut().enumerate() {
                let magnitude = bin.norm();
                let phase = bin.arg();

                if frame_idx == 0 {
                    // Seed synthesis phase from the first analysis frame
                    synth_phase[k] = phase;
                } else {
                    let deviation =
                        Self::wrap_phase(phase - last_phase[k] - self.expected_advance[k]);
                    let instantaneous = self.expected_advance[k] + deviation;
                    synth_phase[k] = Self::wrap_phase(synth_phase[k] + instantaneous * hop_ratio);
                }

                last_phase[k] = phase;
                *bin = Complex::from_polar(magnitude, synth_phase[k]);
            }
        }
    }
}

impl TimeScaleModifier for PhaseVocoder {
    fn run(&mut self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }

        let mut spectrogram = self.stft.analyze(signal);
        self.propagate_phases(&mut spectrogram.frames);
        self.stft.synthesize(&spectrogram, self.params.synthesis_hop)
    }

    fn params(&self) -> &StretchParams {
        &self.params
    }
}
