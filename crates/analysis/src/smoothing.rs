//! Wrist height track smoothing.
//!
//! Operates on the valid samples only, so undetected frames never pull
//! the track toward a placeholder value. Frame indices pass through
//! unchanged; only the heights are filtered.

use shotform_pose_model::{FrameIndex, WristSmoothing};

/// Gaussian kernels are truncated at this many standard deviations.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Wrist track smoothing engine.
pub struct TrackSmoother {
    algorithm: WristSmoothing,
}

impl TrackSmoother {
    pub fn new(algorithm: WristSmoothing) -> Self {
        Self { algorithm }
    }

    /// Smooth `(frame_index, height)` samples. Output has the same length and indices.
    pub fn smooth(&self, track: &[(FrameIndex, f64)]) -> Vec<(FrameIndex, f64)> {
        match self.algorithm {
            WristSmoothing::None => track.to_vec(),
            WristSmoothing::MovingAverage { window } => smooth_moving_average(track, window),
            WristSmoothing::Gaussian { sigma } => smooth_gaussian(track, sigma),
        }
    }
}

/// Centered moving average; the window shrinks at the ends.
fn smooth_moving_average(track: &[(FrameIndex, f64)], window: usize) -> Vec<(FrameIndex, f64)> {
    if track.is_empty() || window <= 1 {
        return track.to_vec();
    }

    let mut result = Vec::with_capacity(track.len());

    for i in 0..track.len() {
        let start = i.saturating_sub(window / 2);
        let end = (i + window / 2 + 1).min(track.len());
        let count = (end - start) as f64;
        let sum: f64 = track[start..end].iter().map(|(_, y)| y).sum();
        result.push((track[i].0, sum / count));
    }

    result
}

/// Gaussian filter with mirror-reflected edges (`d c b a | a b c d | d c b a`).
fn smooth_gaussian(track: &[(FrameIndex, f64)], sigma: f64) -> Vec<(FrameIndex, f64)> {
    if track.len() < 2 || !(sigma.is_finite() && sigma > 0.0) {
        return track.to_vec();
    }

    let n = track.len();
    // Taps farther than `n` away only revisit reflected samples.
    let kernel = gaussian_kernel(sigma, n);
    let radius = (kernel.len() / 2) as isize;

    (0..n)
        .map(|i| {
            let value: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let j = reflect_index(i as isize + k as isize - radius, n);
                    weight * track[j].1
                })
                .sum();
            (track[i].0, value)
        })
        .collect()
}

/// Normalized Gaussian weights over `[-radius, radius]`, with `radius <= max_radius`.
fn gaussian_kernel(sigma: f64, max_radius: usize) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5).min(max_radius as f64) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Map an out-of-range index into `[0, n)` by half-sample reflection.
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
