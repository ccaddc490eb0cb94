//! Harmonic-percussive separation TSM.
//!
//! Splits the signal into a harmonic and a percussive component by median
//! filtering the magnitude spectrogram (horizontally for harmonic content,
//! vertically for percussive content) and binary masking, then stretches
//! each component with the algorithm that suits it: phase vocoder for the
//! harmonic part, plain OLA for the percussive part. The two stretched
//! components are summed.

use rustfft::num_complex::Complex;

use crate::error::{Result, TsmError};
use crate::ola::Ola;
use crate::params::StretchParams;
use crate::phase_vocoder::PhaseVocoder;
use crate::stft::Stft;
use crate::TimeScaleModifier;

/// Configuration of the median-filter separation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparationConfig {
    /// FFT size of the separation spectrogram (power of two).
    pub fft_size: usize,
    /// Analysis hop of the separation spectrogram.
    pub hop: usize,
    /// Median filter length, in frames (time direction) and bins
    /// (frequency direction). Must be odd.
    pub median_span: usize,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            hop: 256,
            median_span: 17,
        }
    }
}

/// Harmonic-percussive hybrid time stretcher.
pub struct Hps {
    params: StretchParams,
    phase_vocoder: PhaseVocoder,
    ola: Ola,
    separation: SeparationConfig,
    stft: Stft,
}

impl Hps {
    /// Create with the default separation configuration.
    ///
    /// The frame size must be a power of two (the harmonic component goes
    /// through the phase vocoder).
    pub fn new(params: StretchParams) -> Result<Self> {
        Self::with_separation(params, SeparationConfig::default())
    }

    /// Create with a custom separation stage.
    pub fn with_separation(params: StretchParams, separation: SeparationConfig) -> Result<Self> {
        if separation.median_span % 2 == 0 || separation.median_span == 0 {
            return Err(TsmError::InvalidParams(format!(
                "median span must be odd, got {}",
                separation.median_span
            )));
        }
        let stft = Stft::new(separation.fft_size, separation.hop)?;
        Ok(Self {
            phase_vocoder: PhaseVocoder::new(params)?,
            ola: Ola::new(params),
            params,
            separation,
            stft,
        })
    }

    /// Split a signal into its harmonic and percussive components.
    ///
    /// The components are complementary: their sum reconstructs the input
    /// (up to STFT edge effects).
    pub fn separate(&self, signal: &[f32]) -> (Vec<f32>, Vec<f32>) {
        if signal.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let spectrogram = self.stft.analyze(signal);
        let magnitudes = spectrogram.magnitudes();
        let num_frames = magnitudes.len();
        let num_bins = spectrogram.num_bins();
        let half_span = self.separation.median_span / 2;

        log::debug!(
            "separating {} frames x {} bins, median span {}",
            num_frames,
            num_bins,
            self.separation.median_span
        );

        let mut scratch = Vec::with_capacity(self.separation.median_span);

        // Harmonic enhancement: median across time at each bin
        let mut harmonic_strength = vec![vec![0.0f32; num_bins]; num_frames];
        for bin in 0..num_bins {
            for frame in 0..num_frames {
                let lo = frame.saturating_sub(half_span);
                let hi = (frame + half_span + 1).min(num_frames);
                scratch.clear();
                scratch.extend((lo..hi).map(|f| magnitudes[f][bin]));
                harmonic_strength[frame][bin] = median(&mut scratch);
            }
        }

        // Percussive enhancement: median across frequency in each frame
        let mut percussive_strength = vec![vec![0.0f32; num_bins]; num_frames];
        for (frame, mags) in magnitudes.iter().enumerate() {
            for bin in 0..num_bins {
                let lo = bin.saturating_sub(half_span);
                let hi = (bin + half_span + 1).min(num_bins);
                scratch.clear();
                scratch.extend_from_slice(&mags[lo..hi]);
                percussive_strength[frame][bin] = median(&mut scratch);
            }
        }

        // Binary masks: each bin goes entirely to whichever component
        // dominates, so the two spectrograms partition the original.
        let mut harmonic_spec = spectrogram.clone();
        let mut percussive_spec = spectrogram;
        for frame in 0..num_frames {
            for bin in 0..num_bins {
                let is_harmonic =
                    harmonic_strength[frame][bin] >= percussive_strength[frame][bin];
                if is_harmonic {
                    percussive_spec.frames[frame][bin] = Complex::new(0.0, 0.0);
                } else {
                    harmonic_spec.frames[frame][bin] = Complex::new(0.0, 0.0);
                }
            }
        }

        let hop = self.separation.hop;
        let harmonic = self.stft.synthesize(&harmonic_spec, hop);
        let percussive = self.stft.synthesize(&percussive_spec, hop);
        (harmonic, percussive)
    }
}

impl TimeScaleModifier for Hps {
    fn run(&mut self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }

        let (harmonic, percussive) = self.separate(signal);
        let stretched_harmonic = self.phase_vocoder.run(&harmonic);
        let stretched_percussive = self.ola.run(&percussive);

        // Component lengths can differ by a frame of padding; sum the overlap
        let len = stretched_harmonic.len().min(stretched_percussive.len());
        let mut out = stretched_harmonic;
        out.truncate(len);
        for (sample, &p) in out.iter_mut().zip(&stretched_percussive) {
            *sample += p;
        }
        out
    }

    fn params(&self) -> &StretchParams {
        &self.params
    }
}

/// Median of a scratch slice; sorts in place.
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(f32::total_cmp);
    values[values.len() / 2]
}
