//! Frame splitting and overlap-add reconstruction.
//!
//! The building blocks every TSM algorithm shares: cutting a signal into
//! fixed-size frames spaced one hop apart, and summing frames back into a
//! signal at a (possibly different) hop.

/// Split `signal` into frames of `frame_size` samples spaced `hop` apart.
///
/// The tail is zero-padded so the final frame is always complete. Hop may be
/// smaller than, equal to, or larger than the frame size.
///
/// # Panics
///
/// Panics if `frame_size` or `hop` is zero.
pub fn split_into_frames(signal: &[f32], frame_size: usize, hop: usize) -> Vec<Vec<f32>> {
    assert!(frame_size > 0, "frame_size must be non-zero");
    assert!(hop > 0, "hop must be non-zero");

    if signal.is_empty() {
        return Vec::new();
    }

    let num_frames = if signal.len() <= frame_size {
        1
    } else {
        // Ceiling division: enough hops to cover everything past the first frame
        (signal.len() - frame_size).div_ceil(hop) + 1
    };

    let mut frames = Vec::with_capacity(num_frames);
    for k in 0..num_frames {
        let start = k * hop;
        let mut frame = vec![0.0f32; frame_size];
        if start < signal.len() {
            let available = (signal.len() - start).min(frame_size);
            frame[..available].copy_from_slice(&signal[start..start + available]);
        }
        frames.push(frame);
    }
    frames
}

/// Reconstruct a signal by accumulating frames spaced `hop` apart.
///
/// Output length is `(num_frames - 1) * hop + frame_size`.
pub fn overlap_add(frames: &[Vec<f32>], hop: usize) -> Vec<f32> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };
    let frame_size = first.len();

    let mut signal = vec![0.0f32; (frames.len() - 1) * hop + frame_size];
    for (k, frame) in frames.iter().enumerate() {
        let start = k * hop;
        for (i, &sample) in frame.iter().enumerate() {
            signal[start + i] += sample;
        }
    }
    signal
}

/// The summed envelope of `num_frames` copies of `window` overlapped at `hop`.
///
/// Used to normalize overlap-added output so overlapping windows don't cause
/// amplitude fluctuation. Zeros are replaced with 1.0 so callers can divide
/// directly.
pub fn window_envelope(window: &[f32], num_frames: usize, hop: usize) -> Vec<f32> {
    if num_frames == 0 || window.is_empty() {
        return Vec::new();
    }

    let mut envelope = vec![0.0f32; (num_frames - 1) * hop + window.len()];
    for k in 0..num_frames {
        let start = k * hop;
        for (i, &w) in window.iter().enumerate() {
            envelope[start + i] += w;
        }
    }
    for value in &mut envelope {
        if *value == 0.0 {
            *value = 1.0;
        }
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{hann, WindowKind};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_split_exact_fit() {
        // 10 samples, frame 4, hop 2: frames at 0,2,4,6 cover exactly
        let signal: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let frames = split_into_frames(&signal, 4, 2);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(frames[3], vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_split_pads_tail() {
        let signal: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let frames = split_into_frames(&signal, 4, 2);
        assert_eq!(frames.len(), 4);
        // Final frame zero-padded past the end of the signal
        assert_eq!(frames[3], vec![6.0, 7.0, 8.0, 0.0]);
    }

    #[test]
    fn test_split_hop_larger_than_frame() {
        let signal: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let frames = split_into_frames(&signal, 2, 4);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], vec![4.0, 5.0]);
        assert_eq!(frames[2], vec![8.0, 9.0]);
    }

    #[test]
    fn test_split_short_signal() {
        let frames = split_into_frames(&[1.0, 2.0], 8, 4);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][..2], [1.0, 2.0]);
        assert!(frames[0][2..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_split_empty() {
        assert!(split_into_frames(&[], 8, 4).is_empty());
    }

    #[test]
    fn test_non_overlapping_roundtrip() {
        let signal: Vec<f32> = (0..32).map(|i| (i as f32).sin()).collect();
        let frames = split_into_frames(&signal, 8, 8);
        let rebuilt = overlap_add(&frames, 8);
        assert_eq!(&rebuilt[..signal.len()], &signal[..]);
    }

    #[test]
    fn test_overlap_add_length() {
        let frames = vec![vec![1.0f32; 8]; 5];
        let out = overlap_add(&frames, 2);
        assert_eq!(out.len(), 4 * 2 + 8);
    }

    #[test]
    fn test_window_envelope_interior_constant() {
        // Periodic Hann at 75% overlap sums to 2.0 in the interior
        let window = hann(64, WindowKind::Periodic);
        let envelope = window_envelope(&window, 16, 16);
        for &value in &envelope[64..envelope.len() - 64] {
            assert_abs_diff_eq!(value, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_window_envelope_no_zeros() {
        let window = hann(64, WindowKind::Periodic);
        let envelope = window_envelope(&window, 4, 64);
        assert!(envelope.iter().all(|&v| v > 0.0));
    }
}
