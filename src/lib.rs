//! # audiomod - Time-Scale Modification and Pitch Scaling
//!
//! Alter the duration of audio without changing its pitch, or its pitch
//! without changing its duration.
//!
//! ## Architecture
//!
//! audiomod is an umbrella crate that coordinates:
//! - **audiomod-tsm** - The DSP core: OLA, WSOLA, phase vocoder,
//!   harmonic-percussive separation, pitch scaling, streaming vocoder
//! - **audiomod-io** - WAV decode/encode and sample-rate conversion
//!
//! ## Quick Start
//!
//! ```no_run
//! use audiomod::{Algorithm, Pipeline};
//!
//! // Slow a file to half speed, pitched up a fourth
//! let pipeline = Pipeline::builder()
//!     .algorithm(Algorithm::PhaseVocoder)
//!     .speed(0.5)
//!     .pitch_cents(500.0)
//!     .build();
//!
//! pipeline.process_file("in.wav", "out.wav")?;
//! # Ok::<(), audiomod::Error>(())
//! ```
//!
//! For buffer-level control use the algorithms directly:
//!
//! ```rust
//! use audiomod::{StretchParams, TimeScaleModifier, Wsola};
//!
//! let signal = vec![0.0f32; 44100];
//! let mut wsola = Wsola::new(StretchParams::new(512, 1.25)?);
//! let faster = wsola.run(&signal);
//! # Ok::<(), audiomod::Error>(())
//! ```

/// Re-export of audiomod-tsm for direct access
pub use audiomod_tsm as tsm;

/// Re-export of audiomod-io for direct access
pub use audiomod_io as io;

// DSP core
pub use audiomod_tsm::{
    hann,
    modifier,
    pitch_ratio_from_cents,
    pitch_shift,
    Algorithm,
    FftSizePreset,
    Hps,
    Ola,
    PhaseVocoder,
    SeparationConfig,
    ShiftBounds,
    Spectrogram,
    Stft,
    StreamingVocoder,
    StretchParams,
    TimeScaleModifier,
    WindowKind,
    Wsola,
};

// I/O
pub use audiomod_io::{
    read_wav, resample_buffer, resample_channel, write_wav, AudioBuffer, BitDepth, ResampleQuality,
};

mod error;
mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineBuilder};
