//! Hann window generation.
//!
//! Follows the matlab `hann` convention: the symmetric variant reaches zero
//! at both endpoints, while the periodic variant places the right zero one
//! sample past the end so that overlapped copies sum to a constant.
//! Overlap-add processing uses the periodic variant.

use std::f32::consts::PI;

/// Window sampling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// Right zero endpoint lies one sample outside the window.
    #[default]
    Periodic,
    /// Zero at both endpoints.
    Symmetric,
}

/// Generate a causal Hann window of the given length.
pub fn hann(len: usize, kind: WindowKind) -> Vec<f32> {
    match (len, kind) {
        (0, _) => Vec::new(),
        // Degenerate lengths, defined to match matlab's hann(1)
        (1, WindowKind::Symmetric) => vec![1.0],
        (1, WindowKind::Periodic) => vec![0.0],
        (n, kind) => {
            let denominator = match kind {
                WindowKind::Periodic => n as f32,
                WindowKind::Symmetric => (n - 1) as f32,
            };
            (0..n)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denominator).cos()))
                .collect()
        }
    }
}
