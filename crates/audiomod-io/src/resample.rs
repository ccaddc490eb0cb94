//! Audio resampling using rubato
//!
//! High-quality sample rate conversion over planar buffers.

use crate::buffer::AudioBuffer;
use crate::error::Result;
use rubato::{FftFixedIn, Resampler};

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleQuality {
    /// Fast resampling (lower quality)
    Fast,
    /// Balanced quality/speed (default)
    #[default]
    Medium,
    /// High quality
    High,
    /// Best quality (slowest)
    Best,
}

impl ResampleQuality {
    fn chunk_size(&self) -> usize {
        match self {
            ResampleQuality::Fast => 512,
            ResampleQuality::Medium => 1024,
            ResampleQuality::High => 2048,
            ResampleQuality::Best => 4096,
        }
    }

    fn sub_chunks(&self) -> usize {
        match self {
            ResampleQuality::Fast => 1,
            ResampleQuality::Medium => 2,
            ResampleQuality::High => 4,
            ResampleQuality::Best => 8,
        }
    }
}

/// Resample all channels of a planar buffer from `source_rate` to `target_rate`.
///
/// Output length is `input_frames * target_rate / source_rate`, truncated to
/// drop the resampler's trailing zero padding.
pub fn resample_buffer(
    buffer: &AudioBuffer,
    source_rate: u32,
    target_rate: u32,
    quality: ResampleQuality,
) -> Result<AudioBuffer> {
    if source_rate == target_rate {
        return Ok(buffer.clone());
    }

    let num_channels = buffer.num_channels();
    let input_frames = buffer.num_frames();
    let chunk_size = quality.chunk_size();

    log::debug!(
        "resampling {} ch, {} frames: {} Hz -> {} Hz ({:?})",
        num_channels,
        input_frames,
        source_rate,
        target_rate,
        quality
    );

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        chunk_size,
        quality.sub_chunks(),
        num_channels,
    )?;

    let expected_output_frames =
        (input_frames as f64 * target_rate as f64 / source_rate as f64).ceil() as usize;
    let mut outputs: Vec<Vec<f32>> =
        vec![Vec::with_capacity(expected_output_frames + chunk_size); num_channels];

    let mut pos = 0;
    while pos < input_frames {
        let frames_needed = resampler.input_frames_next();
        let remaining = input_frames - pos;
        let copy_frames = remaining.min(frames_needed);

        // Zero-padded chunks of exactly the size the resampler asks for
        let chunks: Vec<Vec<f32>> = buffer
            .channels()
            .iter()
            .map(|ch| {
                let mut chunk = vec![0.0f32; frames_needed];
                chunk[..copy_frames].copy_from_slice(&ch[pos..pos + copy_frames]);
                chunk
            })
            .collect();

        let processed = resampler.process(&chunks, None)?;
        for (out, res) in outputs.iter_mut().zip(&processed) {
            out.extend_from_slice(res);
        }

        pos += frames_needed;
    }

    let final_length = outputs
        .first()
        .map_or(0, |o| expected_output_frames.min(o.len()));
    for out in &mut outputs {
        out.truncate(final_length);
    }

    AudioBuffer::from_channels(outputs)
}

/// Resample a single mono channel.
pub fn resample_channel(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
    quality: ResampleQuality,
) -> Result<Vec<f32>> {
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let buffer = AudioBuffer::mono(samples.to_vec());
    let resampled = resample_buffer(&buffer, source_rate, target_rate, quality)?;
    Ok(resampled.channel(0).to_vec())
}
