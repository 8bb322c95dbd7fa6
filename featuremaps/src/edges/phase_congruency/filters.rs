//! Frequency-domain filter construction and noise statistics.
//!
//! Every array here is laid out in FFT order: the zero frequency sits at
//! index `[0, 0]`.

use std::f64::consts::PI;

use ndarray::{Array2, Zip};

use crate::edges::config::PhaseCongruencyConfig;

const LOWPASS_CUTOFF: f64 = 0.45;
const LOWPASS_ORDER: i32 = 15;
const RAYLEIGH_BINS: usize = 50;

/// Normalized frequency of each FFT bin along an axis of length `n`, in
/// `[-0.5, 0.5]`.
pub(super) fn frequency_axis(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![0.0];
    }
    let centered: Vec<f64> = if n % 2 == 1 {
        let half = ((n - 1) / 2) as f64;
        (0..n).map(|j| (j as f64 - half) / (n - 1) as f64).collect()
    } else {
        let half = (n / 2) as f64;
        (0..n).map(|j| (j as f64 - half) / n as f64).collect()
    };
    (0..n).map(|i| centered[(i + n / 2) % n]).collect()
}

/// Polar frequency coordinates and the low-pass filtered log-Gabor bank for
/// one image shape.
pub(super) struct FrequencyGrid {
    pub(super) sin_theta: Array2<f64>,
    pub(super) cos_theta: Array2<f64>,
    log_gabors: Vec<Array2<f64>>,
}

impl FrequencyGrid {
    pub(super) fn new(rows: usize, cols: usize, config: &PhaseCongruencyConfig) -> Self {
        let u = frequency_axis(cols);
        let v = frequency_axis(rows);

        let mut radius = Array2::from_shape_fn((rows, cols), |(r, c)| u[c].hypot(v[r]));
        let lowpass = radius.mapv(|r| {
            1.0 / (1.0 + (r / LOWPASS_CUTOFF).powi(2 * LOWPASS_ORDER))
        });
        // Avoids 0/0 at DC.
        radius[[0, 0]] = 1.0;

        // Angles run anticlockwise with rows pointing down.
        let sin_theta = Array2::from_shape_fn((rows, cols), |(r, c)| -v[r] / radius[[r, c]]);
        let cos_theta = Array2::from_shape_fn((rows, cols), |(r, c)| u[c] / radius[[r, c]]);

        let log_gabors = (0..config.nscale)
            .map(|scale| {
                let wavelength = config.min_wavelength * config.mult.powi(scale as i32);
                log_gabor(&radius, &lowpass, 1.0 / wavelength, config.sigma_onf)
            })
            .collect();

        Self {
            sin_theta,
            cos_theta,
            log_gabors,
        }
    }

    /// Radial log-Gabor transfer function of one scale, low-pass filtered.
    #[inline]
    pub(super) fn log_gabor(&self, scale: usize) -> &Array2<f64> {
        &self.log_gabors[scale]
    }

    /// Angular weighting of orientation `angle`: a raised cosine that falls
    /// to zero `2 pi / norient` away from `angle`.
    pub(super) fn spread(&self, angle: f64, norient: usize) -> Array2<f64> {
        let (sin_angle, cos_angle) = angle.sin_cos();
        let half_orient = norient as f64 / 2.0;
        Zip::from(&self.sin_theta)
            .and(&self.cos_theta)
            .map_collect(|&s, &c| {
                let ds = s * cos_angle - c * sin_angle;
                let dc = c * cos_angle + s * sin_angle;
                let dtheta = (ds.atan2(dc).abs() * half_orient).min(PI);
                (dtheta.cos() + 1.0) / 2.0
            })
    }
}

fn log_gabor(radius: &Array2<f64>, lowpass: &Array2<f64>, fo: f64, sigma_onf: f64) -> Array2<f64> {
    let denom = 2.0 * sigma_onf.ln().powi(2);
    let mut filter = Zip::from(radius).and(lowpass).map_collect(|&r, &lp| {
        let log_ratio = (r / fo).ln();
        (-(log_ratio * log_ratio) / denom).exp() * lp
    });
    filter[[0, 0]] = 0.0;
    filter
}

/// Median with the two middle samples averaged for even lengths.
/// Returns 0 for an empty slice.
pub(super) fn median(mut values: Vec<f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        upper
    } else {
        let lower = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) / 2.0
    }
}

/// Mode of Rayleigh-distributed samples: center of the fullest of 50
/// equal bins spanning `[0, max]`.
pub(super) fn rayleigh_mode(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return 0.0;
    }
    let mut histogram = [0usize; RAYLEIGH_BINS];
    for &v in values {
        let bin = ((v / max) * RAYLEIGH_BINS as f64) as usize;
        histogram[bin.min(RAYLEIGH_BINS - 1)] += 1;
    }
    let fullest = histogram
        .iter()
        .enumerate()
        .fold((0, 0), |best, (bin, &count)| {
            if count > best.1 {
                (bin, count)
            } else {
                best
            }
        })
        .0;
    (fullest as f64 + 0.5) * max / RAYLEIGH_BINS as f64
}
