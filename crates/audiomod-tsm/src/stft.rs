//! Short-time Fourier transform analysis and resynthesis.
//!
//! Windowed forward STFT into a half-spectrum `Spectrogram`, and the inverse
//! path: conjugate-symmetric mirror, inverse FFT, synthesis windowing,
//! overlap-add and squared-window normalization.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::{Result, TsmError};
use crate::frame::{overlap_add, split_into_frames};
use crate::window::{hann, WindowKind};

/// Envelope values below this come from a lone window tail at the signal
/// edge; dividing there amplifies the residual instead of normalizing it.
const MIN_ENVELOPE: f32 = 1e-3;

/// Complex half-spectra of successive analysis frames.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// One half-spectrum (`fft_size / 2 + 1` bins) per analysis frame.
    pub frames: Vec<Vec<Complex<f32>>>,
    /// FFT size the spectra were computed with.
    pub fft_size: usize,
    /// Hop between analysis frames in samples.
    pub hop: usize,
}

impl Spectrogram {
    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of bins per frame.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Magnitude of every bin, frames x bins.
    pub fn magnitudes(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|c| c.norm()).collect())
            .collect()
    }
}

/// STFT analyzer/synthesizer with cached FFT plans.
pub struct Stft {
    fft_size: usize,
    hop: usize,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Stft {
    /// Create an STFT processor.
    ///
    /// `fft_size` must be a power of two; `hop` is the analysis hop.
    pub fn new(fft_size: usize, hop: usize) -> Result<Self> {
        if !fft_size.is_power_of_two() {
            return Err(TsmError::FrameSizeNotPow2(fft_size));
        }
        if hop == 0 {
            return Err(TsmError::InvalidParams("hop must be non-zero".into()));
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        Ok(Self {
            fft_size,
            hop,
            window: hann(fft_size, WindowKind::Periodic),
            forward,
            inverse,
        })
    }

    /// FFT size.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Analysis hop.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Bins per half-spectrum.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Forward STFT: window each frame and keep the lower half-spectrum.
    pub fn analyze(&self, signal: &[f32]) -> Spectrogram {
        let num_bins = self.num_bins();
        let frames = split_into_frames(signal, self.fft_size, self.hop);

        let spectra = frames
            .iter()
            .map(|frame| {
                let mut buffer: Vec<Complex<f32>> = frame
                    .iter()
                    .zip(&self.window)
                    .map(|(&s, &w)| Complex::new(s * w, 0.0))
                    .collect();
                self.forward.process(&mut buffer);
                buffer.truncate(num_bins);
                buffer
            })
            .collect();

        Spectrogram {
            frames: spectra,
            fft_size: self.fft_size,
            hop: self.hop,
        }
    }

    /// Inverse STFT with frames respaced at `synthesis_hop`.
    ///
    /// Applies the synthesis window and normalizes by the summed
    /// squared-window envelope (analysis and synthesis each contribute one
    /// window factor).
    pub fn synthesize(&self, spectrogram: &Spectrogram, synthesis_hop: usize) -> Vec<f32> {
        if spectrogram.frames.is_empty() {
            return Vec::new();
        }

        let num_bins = self.num_bins();
        let scale = 1.0 / self.fft_size as f32;

        let time_frames: Vec<Vec<f32>> = spectrogram
            .frames
            .iter()
            .map(|half| {
                // Rebuild the full spectrum by conjugate symmetry
                let mut buffer = vec![Complex::new(0.0, 0.0); self.fft_size];
                let bins = half.len().min(num_bins);
                buffer[..bins].copy_from_slice(&half[..bins]);
                for i in 1..num_bins - 1 {
                    buffer[self.fft_size - i] = buffer[i].conj();
                }

                self.inverse.process(&mut buffer);
                buffer
                    .iter()
                    .zip(&self.window)
                    .map(|(c, &w)| c.re * scale * w)
                    .collect()
            })
            .collect();

        let mut signal = overlap_add(&time_frames, synthesis_hop);

        // Σ w²(t - k·hop) envelope; the outermost samples sit under a single
        // window tail and stay tapered rather than being divided up.
        let mut envelope = vec![0.0f32; signal.len()];
        for k in 0..time_frames.len() {
            let start = k * synthesis_hop;
            for (i, &w) in self.window.iter().enumerate() {
                envelope[start + i] += w * w;
            }
        }
        for (sample, &env) in signal.iter_mut().zip(&envelope) {
            if env >= MIN_ENVELOPE {
                *sample /= env;
            }
        }

        signal
    }
}
