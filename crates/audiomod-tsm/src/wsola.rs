//! Waveform Similarity Overlap-Add (WSOLA) time-scale modification.
//!
//! Improves on plain OLA by allowing each analysis frame to slide a few
//! samples so that it lines up with the natural continuation of the frame
//! already written, which keeps periodic content coherent across overlaps.

use crate::error::Result;
use crate::frame::split_into_frames;
use crate::ola::Ola;
use crate::params::StretchParams;
use crate::TimeScaleModifier;

/// How far a frame may slide from its nominal analysis position, in samples.
/// Negative values shift backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftBounds {
    pub min_shift: i32,
    pub max_shift: i32,
}

impl Default for ShiftBounds {
    fn default() -> Self {
        Self {
            min_shift: -10,
            max_shift: 10,
        }
    }
}

impl ShiftBounds {
    /// Symmetric bounds of ±`radius` samples.
    pub fn symmetric(radius: u32) -> Self {
        Self {
            min_shift: -(radius as i32),
            max_shift: radius as i32,
        }
    }
}

/// Waveform-similarity overlap-add time stretcher.
#[derive(Debug, Clone)]
pub struct Wsola {
    // Windowing and reconstruction are identical to OLA; only frame
    // selection differs.
    ola: Ola,
    bounds: ShiftBounds,
}

impl Wsola {
    /// Create a WSOLA stretcher with the default ±10 sample search range.
    pub fn new(params: StretchParams) -> Self {
        Self {
            ola: Ola::new(params),
            bounds: ShiftBounds::default(),
        }
    }

    /// Create with custom shift bounds.
    pub fn with_bounds(params: StretchParams, bounds: ShiftBounds) -> Result<Self> {
        if bounds.min_shift > bounds.max_shift {
            return Err(crate::error::TsmError::InvalidParams(format!(
                "shift bounds inverted: min {} > max {}",
                bounds.min_shift, bounds.max_shift
            )));
        }
        Ok(Self {
            ola: Ola::new(params),
            bounds,
        })
    }

    /// Select analysis frames, sliding each within the shift bounds to best
    /// match the natural progression of the previously selected frame.
    fn select_frames(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        let p = self.ola.params();
        let frame_size = p.frame_size;
        let analysis_hop = p.analysis_hop;
        let synthesis_hop = p.synthesis_hop;

        if signal.len() < frame_size {
            // Too short to search; fall back to plain framing
            return split_into_frames(signal, frame_size, analysis_hop);
        }

        let last_valid_start = signal.len() - frame_size;
        let mut frames = Vec::with_capacity(signal.len() / analysis_hop + 1);
        let mut shift: i64 = 0;

        for k in 0.. {
            let nominal = (k * analysis_hop) as i64;
            let start = (nominal + shift).clamp(0, last_valid_start as i64) as usize;
            if nominal > last_valid_start as i64 {
                break;
            }
            frames.push(signal[start..start + frame_size].to_vec());

            // The region the output will continue into if the next frame
            // overlapped seamlessly with this one.
            let natural_start = start + synthesis_hop;
            let next_nominal = (k + 1) * analysis_hop;
            if natural_start > last_valid_start || next_nominal > last_valid_start {
                break;
            }
            let target = &signal[natural_start..natural_start + frame_size];
            shift = self.best_shift(signal, target, next_nominal, last_valid_start);
        }

        frames
    }

    /// Find the candidate shift maximizing the normalized cross-correlation
    /// between `target` and the frame at `nominal + shift`.
    fn best_shift(
        &self,
        signal: &[f32],
        target: &[f32],
        nominal: usize,
        last_valid_start: usize,
    ) -> i64 {
        let frame_size = target.len();
        let target_energy: f32 = target.iter().map(|x| x * x).sum();

        let mut best_shift = 0i64;
        let mut best_score = f32::NEG_INFINITY;

        for d in self.bounds.min_shift..=self.bounds.max_shift {
            let start = nominal as i64 + d as i64;
            if start < 0 || start as usize > last_valid_start {
                continue;
            }
            let candidate = &signal[start as usize..start as usize + frame_size];

            let mut dot = 0.0f32;
            let mut energy = 0.0f32;
            for (&t, &c) in target.iter().zip(candidate) {
                dot += t * c;
                energy += c * c;
            }
            // Normalize so loud candidate regions don't dominate the search
            let norm = (target_energy * energy).sqrt();
            let score = if norm > 0.0 { dot / norm } else { 0.0 };

            if score > best_score {
                best_score = score;
                best_shift = d as i64;
            }
        }

        best_shift
    }
}

impl TimeScaleModifier for Wsola {
    fn run(&mut self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }
        let frames = self.select_frames(signal);
        self.ola.synthesize(frames)
    }

    fn params(&self) -> &StretchParams {
        self.ola.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let mut wsola = Wsola::new(StretchParams::new(256, 2.0).unwrap());
        assert!(wsola.run(&[]).is_empty());
    }

    #[test]
    fn test_zero_bounds_degenerates_to_ola() {
        let signal = sine(440.0, 44100.0, 16384);
        let params = StretchParams::new(256, 1.5).unwrap();

        let mut wsola = Wsola::with_bounds(params, ShiftBounds::symmetric(0)).unwrap();
        let mut ola = Ola::new(params);

        let a = wsola.run(&signal);
        let b = ola.run(&signal);

        // Frame selection is identical with no search range; outputs agree
        // except near the tail where OLA pads and WSOLA stops.
        let common = a.len().min(b.len()) / 2;
        for i in 0..common {
            assert!(
                (a[i] - b[i]).abs() < 1e-5,
                "sample {} differs: {} vs {}",
                i,
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn test_double_speed_halves_length() {
        let signal = sine(440.0, 44100.0, 44100);
        let mut wsola = Wsola::new(StretchParams::new(256, 2.0).unwrap());
        let out = wsola.run(&signal);

        let ratio = signal.len() as f64 / out.len() as f64;
        assert!(
            (ratio - 2.0).abs() < 0.15,
            "expected ~2x compression, got ratio {ratio}"
        );
    }

    #[test]
    fn test_periodic_content_stays_coherent() {
        // On a pure sine the similarity search should keep overlapping
        // frames nearly in phase, so the output level stays close to the
        // input level (where plain OLA loses energy to cancellation).
        // Search range must exceed half the waveform period (~100 samples
        // at 440 Hz) for the alignment to succeed.
        let sample_rate = 44100.0;
        let signal = sine(440.0, sample_rate, 44100);
        let params = StretchParams::with_hops(512, 2.0, Some(128), None).unwrap();
        let mut wsola = Wsola::with_bounds(params, ShiftBounds::symmetric(64)).unwrap();
        let out = wsola.run(&signal);

        let center = &out[out.len() / 4..3 * out.len() / 4];
        let rms = (center.iter().map(|x| x * x).sum::<f32>() / center.len() as f32).sqrt();
        let input_rms = (signal.iter().map(|x| x * x).sum::<f32>() / signal.len() as f32).sqrt();
        let ratio = rms / input_rms;
        assert!(
            ratio > 0.7 && ratio < 1.3,
            "WSOLA lost phase coherence: RMS ratio {ratio}"
        );
    }

    #[test]
    fn test_shift_bounds_symmetric() {
        let b = ShiftBounds::symmetric(25);
        assert_eq!(b.min_shift, -25);
        assert_eq!(b.max_shift, 25);
    }
}
