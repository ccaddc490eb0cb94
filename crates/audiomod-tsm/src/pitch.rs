//! Pitch scaling without changing duration.
//!
//! Classic TSM + resampling chain: stretch the signal by the pitch ratio
//! (pitch unchanged, duration scaled), then resample it back to the original
//! duration. Played at the original sample rate the result has the shifted
//! pitch and the original length.

use audiomod_io::{resample_channel, ResampleQuality};

use crate::error::Result;
use crate::params::{pitch_ratio_from_cents, StretchParams};
use crate::{modifier, Algorithm};

/// Shift the pitch of `signal` by `cents` (100 cents = 1 semitone, clamped
/// to ±2 octaves) while preserving its duration.
///
/// `algorithm` selects the TSM backend for the stretch leg; the phase
/// vocoder is the usual choice for pitched material.
pub fn pitch_shift(
    signal: &[f32],
    sample_rate: u32,
    cents: f32,
    algorithm: Algorithm,
    frame_size: usize,
) -> Result<Vec<f32>> {
    let ratio = pitch_ratio_from_cents(cents);
    if (ratio - 1.0).abs() < 1e-4 {
        return Ok(signal.to_vec());
    }

    log::debug!("pitch shift {cents} cents (ratio {ratio}) via {algorithm:?}");

    // Stretch duration by the pitch ratio...
    let params = StretchParams::new(frame_size, 1.0 / ratio)?;
    let mut tsm = modifier(algorithm, params)?;
    let stretched = tsm.run(signal);

    // ...then resample back to the original duration. Interpreting the
    // result at the original rate raises (or lowers) the pitch by the ratio.
    let target_rate = (sample_rate as f64 / ratio as f64).round() as u32;
    Ok(resample_channel(
        &stretched,
        sample_rate,
        target_rate,
        ResampleQuality::Medium,
    )?)
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

    /// Estimate frequency from zero crossings over the central region.
    fn estimate_freq(signal: &[f32], sample_rate: f32) -> f32 {
        let slice = &signal[signal.len() / 4..3 * signal.len() / 4];
        let crossings = slice
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count();
        crossings as f32 * sample_rate / slice.len() as f32
    }

    #[test]
    fn test_zero_cents_is_noop() {
        let signal = sine(440.0, 44100.0, 8192);
        let out = pitch_shift(&signal, 44100, 0.0, Algorithm::PhaseVocoder, 1024).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn test_octave_up_doubles_frequency() {
        let sample_rate = 44100.0;
        let signal = sine(440.0, sample_rate, 44100);
        let out = pitch_shift(&signal, 44100, 1200.0, Algorithm::PhaseVocoder, 2048).unwrap();

        let freq = estimate_freq(&out, sample_rate);
        assert!(
            (freq - 880.0).abs() < 60.0,
            "expected ~880 Hz, estimated {freq}"
        );
    }

    #[test]
    fn test_octave_down_halves_frequency() {
        let sample_rate = 44100.0;
        let signal = sine(440.0, sample_rate, 44100);
        let out = pitch_shift(&signal, 44100, -1200.0, Algorithm::PhaseVocoder, 2048).unwrap();

        let freq = estimate_freq(&out, sample_rate);
        assert!(
            (freq - 220.0).abs() < 30.0,
            "expected ~220 Hz, estimated {freq}"
        );
    }

    #[test]
    fn test_duration_roughly_preserved() {
        let signal = sine(440.0, 44100.0, 44100);
        let out = pitch_shift(&signal, 44100, 700.0, Algorithm::PhaseVocoder, 2048).unwrap();

        let ratio = out.len() as f64 / signal.len() as f64;
        assert!(
            (ratio - 1.0).abs() < 0.1,
            "duration changed by factor {ratio}"
        );
    }
}
