//! End-to-end WAV pipeline tests through temporary files.

use std::f32::consts::PI;

use audiomod::{
    read_wav, write_wav, Algorithm, AudioBuffer, BitDepth, Pipeline,
};
use tempfile::tempdir;

fn sine_buffer(freq: f32, sample_rate: u32, num_samples: usize) -> AudioBuffer {
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    AudioBuffer::mono(samples)
}

#[test]
fn wav_roundtrip_16bit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.wav");

    let buffer = sine_buffer(440.0, 44100, 4410);
    write_wav(&path, &buffer, 44100, BitDepth::Int16).unwrap();
    let (decoded, rate) = read_wav(&path).unwrap();

    assert_eq!(rate, 44100);
    assert_eq!(decoded.num_frames(), 4410);
    for (a, b) in buffer.channel(0).iter().zip(decoded.channel(0)) {
        assert!((a - b).abs() < 1e-3, "{a} vs {b}");
    }
}

#[test]
fn wav_roundtrip_float32_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip_f32.wav");

    let buffer = sine_buffer(1000.0, 48000, 4800);
    write_wav(&path, &buffer, 48000, BitDepth::Float32).unwrap();
    let (decoded, rate) = read_wav(&path).unwrap();

    assert_eq!(rate, 48000);
    assert_eq!(decoded.channel(0), buffer.channel(0));
}

#[test]
fn stereo_wav_preserves_channels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stereo.wav");

    let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0) - 0.5).collect();
    let right: Vec<f32> = left.iter().map(|x| -x).collect();
    let buffer = AudioBuffer::stereo(left, right).unwrap();

    write_wav(&path, &buffer, 44100, BitDepth::Int24).unwrap();
    let (decoded, _) = read_wav(&path).unwrap();

    assert_eq!(decoded.num_channels(), 2);
    for i in 0..1000 {
        assert!((decoded.channel(0)[i] + decoded.channel(1)[i]).abs() < 1e-5);
    }
}

#[test]
fn pipeline_file_to_file_stretch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");

    let buffer = sine_buffer(440.0, 44100, 44100);
    write_wav(&input, &buffer, 44100, BitDepth::Int16).unwrap();

    let pipeline = Pipeline::builder()
        .algorithm(Algorithm::PhaseVocoder)
        .speed(2.0)
        .build();
    pipeline.process_file(&input, &output).unwrap();

    let (processed, rate) = read_wav(&output).unwrap();
    assert_eq!(rate, 44100);

    let ratio = buffer.num_frames() as f64 / processed.num_frames() as f64;
    assert!((ratio - 2.0).abs() < 0.15, "ratio {ratio}");
}

#[test]
fn pipeline_file_to_file_pitch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("pitched.wav");

    let buffer = sine_buffer(440.0, 44100, 44100);
    write_wav(&input, &buffer, 44100, BitDepth::Int16).unwrap();

    let pipeline = Pipeline::builder().pitch_cents(1200.0).build();
    pipeline.process_file(&input, &output).unwrap();

    let (processed, _) = read_wav(&output).unwrap();

    // Duration preserved, frequency doubled
    let len_ratio = processed.num_frames() as f64 / buffer.num_frames() as f64;
    assert!((len_ratio - 1.0).abs() < 0.1, "length ratio {len_ratio}");

    let samples = processed.channel(0);
    let center = &samples[samples.len() / 4..3 * samples.len() / 4];
    let crossings = center
        .windows(2)
        .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
        .count();
    let freq = crossings as f64 * 44100.0 / center.len() as f64;
    assert!((freq - 880.0).abs() < 60.0, "expected ~880 Hz, got {freq}");
}

#[test]
fn pipeline_missing_input_errors() {
    let dir = tempdir().unwrap();
    let pipeline = Pipeline::builder().speed(1.5).build();
    let result = pipeline.process_file(
        dir.path().join("does_not_exist.wav"),
        dir.path().join("out.wav"),
    );
    assert!(result.is_err());
}
