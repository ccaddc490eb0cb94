//! # audiomod-tsm
//!
//! Time-scale modification (TSM) and pitch scaling algorithms.
//!
//! This crate provides the DSP core of audiomod:
//! - **OLA**: overlap-add stretching, best for percussive/transient material
//! - **WSOLA**: waveform-similarity OLA, keeps periodic content coherent
//! - **Phase vocoder**: STFT-based stretching with phase propagation, best
//!   for harmonic material
//! - **HPS**: harmonic-percussive separation routing each component to the
//!   algorithm that suits it
//! - **Pitch scaling**: TSM + resampling chain preserving duration
//! - **Streaming**: block-based phase vocoder with pre-allocated FIFOs
//!
//! All algorithms operate on mono `&[f32]` buffers; multi-channel audio is
//! processed per channel (see the umbrella crate's `Pipeline`).
//!
//! ## Example
//!
//! ```rust
//! use audiomod_tsm::{Ola, PhaseVocoder, StretchParams, TimeScaleModifier};
//!
//! let signal: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! // Half speed with the phase vocoder
//! let params = StretchParams::new(2048, 0.5).unwrap();
//! let mut vocoder = PhaseVocoder::new(params).unwrap();
//! let stretched = vocoder.run(&signal);
//! assert!(stretched.len() > signal.len());
//! ```

pub mod frame;
pub mod hps;
pub mod ola;
pub mod params;
pub mod phase_vocoder;
pub mod pitch;
pub mod stft;
pub mod stream;
pub mod window;
pub mod wsola;

mod error;

pub use error::{Result, TsmError};
pub use hps::{Hps, SeparationConfig};
pub use ola::Ola;
pub use params::{pitch_ratio_from_cents, StretchParams};
pub use phase_vocoder::PhaseVocoder;
pub use pitch::pitch_shift;
pub use stft::{Spectrogram, Stft};
pub use stream::{FftSizePreset, StreamingVocoder};
pub use window::{hann, WindowKind};
pub use wsola::{ShiftBounds, Wsola};

/// A time-scale modification algorithm.
///
/// Implementations stretch or compress a signal in time without changing
/// its pitch. `run` is offline: it consumes a whole signal and returns the
/// modified one (use [`StreamingVocoder`] for block-based processing).
pub trait TimeScaleModifier {
    /// Apply the modification to `signal`.
    fn run(&mut self, signal: &[f32]) -> Vec<f32>;

    /// The parameters driving the modification.
    fn params(&self) -> &StretchParams;
}

/// TSM algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Overlap-add: cheap, best for percussive material.
    Ola,
    /// Waveform-similarity overlap-add.
    Wsola,
    /// Phase vocoder: best for harmonic material.
    #[default]
    PhaseVocoder,
    /// Harmonic-percussive separation hybrid.
    Hps,
}

/// Construct the modifier for an [`Algorithm`].
pub fn modifier(algorithm: Algorithm, params: StretchParams) -> Result<Box<dyn TimeScaleModifier>> {
    Ok(match algorithm {
        Algorithm::Ola => Box::new(Ola::new(params)),
        Algorithm::Wsola => Box::new(Wsola::new(params)),
        Algorithm::PhaseVocoder => Box::new(PhaseVocoder::new(params)?),
        Algorithm::Hps => Box::new(Hps::new(params)?),
    })
}
