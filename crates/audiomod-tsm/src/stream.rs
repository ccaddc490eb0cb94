//! Streaming phase vocoder for block-based processing.
//!
//! Push/process/pop interface over pre-allocated FIFOs: feed input in
//! arbitrary block sizes, call `process`, and drain whatever output is
//! ready. All buffers are allocated at construction; the process path does
//! not allocate, so the processor is usable from an audio callback.
//!
//! Each FIFO holds `4 * fft_size` samples. `push_input` accepts only what
//! fits and reports it, and `process` stops when the output ring has no
//! room for another frame, so unread data is never overwritten; callers
//! drain with `pop_output` between process calls.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::params::{MAX_SPEED, MIN_SPEED};

/// FFT size presets trading latency against frequency resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FftSizePreset {
    /// 1024-point FFT (~23ms latency @ 44.1kHz)
    Small,
    /// 2048-point FFT (~46ms latency @ 44.1kHz)
    #[default]
    Medium,
    /// 4096-point FFT (~93ms latency @ 44.1kHz)
    Large,
    /// 8192-point FFT (~186ms latency @ 44.1kHz) for extreme stretching
    XLarge,
}

impl FftSizePreset {
    /// FFT size in samples.
    pub fn size(&self) -> usize {
        match self {
            FftSizePreset::Small => 1024,
            FftSizePreset::Medium => 2048,
            FftSizePreset::Large => 4096,
            FftSizePreset::XLarge => 8192,
        }
    }

    /// Analysis hop (75% overlap).
    pub fn hop(&self) -> usize {
        self.size() / 4
    }

    /// Approximate latency in milliseconds at the given sample rate.
    pub fn latency_ms(&self, sample_rate: f64) -> f64 {
        self.size() as f64 / sample_rate * 1000.0
    }
}

/// Block-based phase vocoder with internal input/output FIFOs.
pub struct StreamingVocoder {
    fft_size: usize,
    analysis_hop: usize,

    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,

    // Scratch (pre-allocated, reused every frame)
    spectrum: Vec<Complex<f32>>,

    // Phase tracking per bin
    last_phase: Vec<f32>,
    synth_phase: Vec<f32>,
    expected_advance: Vec<f32>,

    // Ring FIFOs; positions grow monotonically, indices are taken modulo
    // the buffer length
    in_fifo: Vec<f32>,
    out_fifo: Vec<f32>,
    in_write: usize,
    in_read: usize,
    out_write: usize,
    out_read: usize,

    primed: bool,
}

impl StreamingVocoder {
    /// Create a streaming vocoder for the given FFT preset.
    pub fn new(preset: FftSizePreset) -> Self {
        let fft_size = preset.size();
        let hop = preset.hop();
        let num_bins = fft_size / 2 + 1;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / fft_size as f32).cos()))
            .collect();

        let expected_advance: Vec<f32> = (0..num_bins)
            .map(|k| 2.0 * PI * k as f32 * hop as f32 / fft_size as f32)
            .collect();

        Self {
            fft_size,
            analysis_hop: hop,
            window,
            forward,
            inverse,
            spectrum: vec![Complex::new(0.0, 0.0); fft_size],
            last_phase: vec![0.0; num_bins],
            synth_phase: vec![0.0; num_bins],
            expected_advance,
            in_fifo: vec![0.0; fft_size * 4],
            out_fifo: vec![0.0; fft_size * 4],
            in_write: 0,
            in_read: 0,
            out_write: 0,
            out_read: 0,
            primed: false,
        }
    }

    /// Processing latency in samples.
    pub fn latency_samples(&self) -> usize {
        self.fft_size
    }

    /// Capacity of each FIFO in samples.
    pub fn capacity(&self) -> usize {
        self.in_fifo.len()
    }

    /// Clear all state. Call when seeking or restarting a stream.
    pub fn reset(&mut self) {
        self.spectrum.fill(Complex::new(0.0, 0.0));
        self.last_phase.fill(0.0);
        self.synth_phase.fill(0.0);
        self.in_fifo.fill(0.0);
        self.out_fifo.fill(0.0);
        self.in_write = 0;
        self.in_read = 0;
        self.out_write = 0;
        self.out_read = 0;
        self.primed = false;
    }

    /// Feed input samples, returning how many were accepted. Samples beyond
    /// the free FIFO space are dropped; call `process` and `pop_output` to
    /// make room. Does not allocate.
    #[inline]
    pub fn push_input(&mut self, samples: &[f32]) -> usize {
        let len = self.in_fifo.len();
        let room = len - self.input_available();
        let count = samples.len().min(room);
        for &sample in &samples[..count] {
            self.in_fifo[self.in_write % len] = sample;
            self.in_write += 1;
        }
        count
    }

    /// Input samples buffered and not yet consumed.
    #[inline]
    pub fn input_available(&self) -> usize {
        self.in_write.saturating_sub(self.in_read)
    }

    /// Output samples ready to pop.
    #[inline]
    pub fn output_available(&self) -> usize {
        self.out_write.saturating_sub(self.out_read)
    }

    /// Drain ready output into `output`, returning the number of samples
    /// written. Does not allocate.
    #[inline]
    pub fn pop_output(&mut self, output: &mut [f32]) -> usize {
        let count = output.len().min(self.output_available());
        let len = self.out_fifo.len();
        for (i, sample) in output.iter_mut().take(count).enumerate() {
            *sample = self.out_fifo[(self.out_read + i) % len];
        }
        self.out_read += count;
        count
    }

    /// Process all buffered frames.
    ///
    /// `speed` follows the offline convention: above 1.0 consumes input
    /// faster than it produces output. `pitch_ratio` scales every bin's
    /// instantaneous frequency (1.0 = unchanged). Stops early when the
    /// output FIFO has no room for another frame; drain with `pop_output`
    /// and call again.
    pub fn process(&mut self, speed: f32, pitch_ratio: f32) {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        let synthesis_hop = ((self.analysis_hop as f32 / speed).round() as usize).max(1);

        while self.input_available() >= self.fft_size
            && self.output_room() >= self.fft_size + synthesis_hop
        {
            self.process_frame(synthesis_hop, pitch_ratio);
        }
    }

    // Free space in the output FIFO past the overlap tail of the last
    // written frame.
    fn output_room(&self) -> usize {
        let occupied = (self.out_write + self.fft_size).saturating_sub(self.out_read);
        self.out_fifo.len().saturating_sub(occupied)
    }

    fn process_frame(&mut self, synthesis_hop: usize, pitch_ratio: f32) {
        let in_len = self.in_fifo.len();
        let out_len = self.out_fifo.len();
        let num_bins = self.fft_size / 2 + 1;
        let hop_ratio = synthesis_hop as f32 / self.analysis_hop as f32;

        // Windowed analysis frame straight into the FFT buffer
        for i in 0..self.fft_size {
            let sample = self.in_fifo[(self.in_read + i) % in_len];
            self.spectrum[i] = Complex::new(sample * self.window[i], 0.0);
        }
        self.in_read += self.analysis_hop;

        self.forward.process(&mut self.spectrum);

        // Phase propagation on the lower half-spectrum
        for k in 0..num_bins {
            let magnitude = self.spectrum[k].norm();
            let phase = self.spectrum[k].arg();

            if self.primed {
                let deviation = wrap_phase(phase - self.last_phase[k] - self.expected_advance[k]);
                let instantaneous = (self.expected_advance[k] + deviation) * pitch_ratio;
                self.synth_phase[k] = wrap_phase(self.synth_phase[k] + instantaneous * hop_ratio);
            } else {
                self.synth_phase[k] = phase;
            }
            self.last_phase[k] = phase;
            self.spectrum[k] = Complex::from_polar(magnitude, self.synth_phase[k]);
        }
        self.primed = true;

        // Conjugate-symmetric mirror for a real-valued inverse transform
        for i in 1..num_bins - 1 {
            self.spectrum[self.fft_size - i] = self.spectrum[i].conj();
        }

        self.inverse.process(&mut self.spectrum);

        // Overlap-add the windowed synthesis frame into the output FIFO.
        // 1/N undoes the unnormalized inverse transform; the squared Hann
        // envelope at hop ss sums to 3N/(8·ss), so its reciprocal flattens
        // the overlap gain.
        let n = self.fft_size as f32;
        let norm = (1.0 / n) * (8.0 * synthesis_hop as f32) / (3.0 * n);
        for i in 0..self.fft_size {
            let sample = self.spectrum[i].re * norm * self.window[i];
            self.out_fifo[(self.out_write + i) % out_len] += sample;
        }

        // Zero the region the next frame will extend into
        let clear_from = self.out_write + self.fft_size;
        for i in 0..synthesis_hop {
            self.out_fifo[(clear_from + i) % out_len] = 0.0;
        }

        self.out_write += synthesis_hop;
    }
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
