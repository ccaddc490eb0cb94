//! WAV decoding and encoding using hound
//!
//! Supports 16-bit, 24-bit, and 32-bit float WAV files, mono or multi-channel.

use crate::buffer::AudioBuffer;
use crate::error::{IoError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// Output bit depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 16-bit signed integer
    #[default]
    Int16,
    /// 24-bit signed integer
    Int24,
    /// 32-bit float
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }
}

/// Read a WAV file into a planar buffer.
///
/// # Returns
///
/// The decoded audio (samples normalized to -1.0..1.0) and its sample rate.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(AudioBuffer, u32)> {
    let reader = WavReader::open(path)?;
    decode_wav(reader)
}

/// Read WAV data from any reader (e.g. an in-memory cursor).
pub fn read_wav_from<R: Read>(reader: R) -> Result<(AudioBuffer, u32)> {
    decode_wav(WavReader::new(reader)?)
}

fn decode_wav<R: Read>(mut reader: WavReader<R>) -> Result<(AudioBuffer, u32)> {
    let spec = reader.spec();
    let num_channels = spec.channels as usize;
    if num_channels == 0 {
        return Err(IoError::InvalidData("WAV file reports zero channels".into()));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32767.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_607.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (format, bits) => {
            return Err(IoError::UnsupportedFormat(format!(
                "{bits}-bit {format:?} WAV"
            )))
        }
    };

    let num_frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(num_frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (ch, &sample) in channels.iter_mut().zip(frame) {
            ch.push(sample);
        }
    }

    Ok((AudioBuffer::from_channels(channels)?, spec.sample_rate))
}

/// Write a planar buffer to a WAV file.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    buffer: &AudioBuffer,
    sample_rate: u32,
    bit_depth: BitDepth,
) -> Result<()> {
    let spec = create_wav_spec(buffer.num_channels() as u16, sample_rate, bit_depth);
    let mut writer = WavWriter::create(path, spec)?;
    write_samples(&mut writer, buffer, bit_depth)?;
    writer.finalize()?;
    Ok(())
}

/// Encode a planar buffer to WAV bytes in memory.
pub fn write_wav_memory(
    buffer: &AudioBuffer,
    sample_rate: u32,
    bit_depth: BitDepth,
) -> Result<Vec<u8>> {
    let spec = create_wav_spec(buffer.num_channels() as u16, sample_rate, bit_depth);
    let mut bytes = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut bytes);
        let mut writer = WavWriter::new(cursor, spec)?;
        write_samples(&mut writer, buffer, bit_depth)?;
        writer.finalize()?;
    }
    Ok(bytes)
}

fn create_wav_spec(channels: u16, sample_rate: u32, bit_depth: BitDepth) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bit_depth.bits(),
        sample_format: match bit_depth {
            BitDepth::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        },
    }
}

/// Write interleaved samples to the writer.
fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    buffer: &AudioBuffer,
    bit_depth: BitDepth,
) -> Result<()> {
    let num_frames = buffer.num_frames();
    let channels = buffer.channels();

    for i in 0..num_frames {
        for ch in channels {
            match bit_depth {
                BitDepth::Int16 => writer.write_sample(float_to_i16(ch[i]))?,
                BitDepth::Int24 => writer.write_sample(float_to_i24(ch[i]))?,
                BitDepth::Float32 => writer.write_sample(ch[i])?,
            }
        }
    }

    Ok(())
}

/// Convert float sample to 16-bit integer with clipping
#[inline]
fn float_to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 32767.0) as i16
}

/// Convert float sample to 24-bit integer (stored as i32) with clipping
#[inline]
fn float_to_i24(sample: f32) -> i32 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 8_388_607.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_i16() {
        assert_eq!(float_to_i16(0.0), 0);
        assert_eq!(float_to_i16(1.0), 32767);
        assert_eq!(float_to_i16(-1.0), -32767);
        // Clipping
        assert_eq!(float_to_i16(1.5), 32767);
        assert_eq!(float_to_i16(-1.5), -32767);
    }

    #[test]
    fn test_float_to_i24() {
        assert_eq!(float_to_i24(0.0), 0);
        assert_eq!(float_to_i24(1.0), 8_388_607);
        assert_eq!(float_to_i24(-1.0), -8_388_607);
    }

    #[test]
    fn test_write_wav_memory_header() {
        let buffer = AudioBuffer::stereo(vec![0.0, 0.5, -0.5], vec![0.1, -0.1, 0.0]).unwrap();
        let bytes = write_wav_memory(&buffer, 44100, BitDepth::Int16).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert!(bytes.len() > 44);
    }

    #[test]
    fn test_roundtrip_memory_i16() {
        let samples: Vec<f32> = (0..64).map(|i| ((i as f32) / 64.0) - 0.5).collect();
        let buffer = AudioBuffer::mono(samples.clone());

        let bytes = write_wav_memory(&buffer, 48000, BitDepth::Int16).unwrap();
        let (decoded, rate) = read_wav_from(std::io::Cursor::new(bytes)).unwrap();

        assert_eq!(rate, 48000);
        assert_eq!(decoded.num_channels(), 1);
        assert_eq!(decoded.num_frames(), 64);
        for (a, b) in samples.iter().zip(decoded.channel(0)) {
            assert!((a - b).abs() < 1.0 / 32000.0, "{a} vs {b}");
        }
    }

    #[test]
    fn test_roundtrip_file_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = AudioBuffer::mono(vec![0.1, -0.2, 0.3, -0.4]);

        write_wav(&path, &buffer, 22050, BitDepth::Float32).unwrap();
        let (decoded, rate) = read_wav(&path).unwrap();

        assert_eq!(rate, 22050);
        assert_eq!(decoded.channel(0), buffer.channel(0));
    }

    #[test]
    fn test_roundtrip_memory_f32() {
        let buffer = AudioBuffer::mono(vec![0.25, -0.25, 0.75]);
        let bytes = write_wav_memory(&buffer, 44100, BitDepth::Float32).unwrap();
        let (decoded, _) = read_wav_from(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.channel(0), buffer.channel(0));
    }
}
