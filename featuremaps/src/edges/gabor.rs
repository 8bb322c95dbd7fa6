//! Gabor kernel synthesis, kernel banks and periodic convolution.

use std::f64::consts::PI;

use common::parallel::WorkerPool;
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::config::GaborBankConfig;
use crate::error::{Error, Result};

/// Produces one 2D filter kernel from Gabor parameters.
pub trait KernelSynthesizer: Sync {
    fn synthesize(
        &self,
        frequency: f64,
        theta: f64,
        sigma_x: f64,
        sigma_y: f64,
    ) -> Result<Array2<f64>>;
}

/// Real part of the complex Gabor kernel.
///
/// The kernel is a Gaussian envelope rotated by `theta`, normalized by
/// `2 pi sigma_x sigma_y`, times `cos(2 pi f x' + offset)`. It spans
/// `n_stds` deviations of the rotated envelope, and at least one pixel, on
/// each side of the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealGaborSynthesizer {
    pub n_stds: f64,
    pub offset: f64,
}

impl Default for RealGaborSynthesizer {
    fn default() -> Self {
        Self {
            n_stds: 3.0,
            offset: 0.0,
        }
    }
}

impl KernelSynthesizer for RealGaborSynthesizer {
    fn synthesize(
        &self,
        frequency: f64,
        theta: f64,
        sigma_x: f64,
        sigma_y: f64,
    ) -> Result<Array2<f64>> {
        if !(sigma_x > 0.0 && sigma_y > 0.0) {
            return Err(Error::invalid_parameter(
                "sigma",
                format!("must be positive, got ({sigma_x}, {sigma_y})"),
            ));
        }

        let (st, ct) = theta.sin_cos();
        let n_stds = self.n_stds;
        let x0 = (n_stds * sigma_x * ct)
            .abs()
            .max((n_stds * sigma_y * st).abs())
            .max(1.0)
            .ceil() as isize;
        let y0 = (n_stds * sigma_y * ct)
            .abs()
            .max((n_stds * sigma_x * st).abs())
            .max(1.0)
            .ceil() as isize;

        let shape = ((2 * y0 + 1) as usize, (2 * x0 + 1) as usize);
        let norm = 2.0 * PI * sigma_x * sigma_y;
        let kernel = Array2::from_shape_fn(shape, |(row, col)| {
            let y = row as f64 - y0 as f64;
            let x = col as f64 - x0 as f64;
            let rot_x = x * ct + y * st;
            let rot_y = -x * st + y * ct;
            let exponent =
                rot_x * rot_x / (sigma_x * sigma_x) + rot_y * rot_y / (sigma_y * sigma_y);
            let envelope = (-0.5 * exponent).exp();
            envelope / norm * (2.0 * PI * frequency * rot_x + self.offset).cos()
        });
        Ok(kernel)
    }
}

/// Parameters a bank kernel was synthesized with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaborKernelParams {
    pub frequency: f64,
    pub theta: f64,
    pub sigma_y: f64,
    pub sigma_x: f64,
}

/// Kernels and their parameters, positionally matched.
///
/// Ordered by orientation first and frequency second:
/// `(theta0, f0), (theta0, f1), ..., (theta1, f0), ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaborKernelBank {
    pub kernels: Vec<Array2<f64>>,
    pub params: Vec<GaborKernelParams>,
}

impl GaborKernelBank {
    #[inline]
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Array2<f64>, &GaborKernelParams)> {
        self.kernels.iter().zip(&self.params)
    }
}

/// Builds a bank of real Gabor kernels.
///
/// `n_theta` orientations in `[0, pi]` times `n_freq` frequencies in
/// `freq_range`, with envelope sigmas derived from `win_size`
/// (`(height, width)`).
pub fn gabor_kernel_bank(
    n_freq: usize,
    freq_range: (f64, f64),
    n_theta: usize,
    win_size: (f64, f64),
) -> Result<GaborKernelBank> {
    let config = GaborBankConfig {
        n_freq,
        freq_range,
        n_theta,
        win_size,
    };
    gabor_kernel_bank_with(&config, &RealGaborSynthesizer::default())
}

/// [`gabor_kernel_bank`] with a caller-supplied synthesizer.
pub fn gabor_kernel_bank_with<K>(
    config: &GaborBankConfig,
    synthesizer: &K,
) -> Result<GaborKernelBank>
where
    K: KernelSynthesizer + ?Sized,
{
    config.validate()?;

    let (sigma_y, sigma_x) = config.sigmas();
    let thetas = Array1::linspace(0.0, PI, config.n_theta);
    let freqs = Array1::linspace(config.freq_range.0, config.freq_range.1, config.n_freq);

    let capacity = thetas.len() * freqs.len();
    let mut kernels = Vec::with_capacity(capacity);
    let mut params = Vec::with_capacity(capacity);
    for &theta in &thetas {
        for &frequency in &freqs {
            kernels.push(synthesizer.synthesize(frequency, theta, sigma_x, sigma_y)?);
            params.push(GaborKernelParams {
                frequency,
                theta,
                sigma_y,
                sigma_x,
            });
        }
    }

    tracing::debug!(
        "Gabor bank: {} kernels, sigma=({:.3}, {:.3})",
        kernels.len(),
        sigma_y,
        sigma_x
    );

    Ok(GaborKernelBank { kernels, params })
}

/// Convolves `image` with `kernel`, wrapping around the image borders.
///
/// `out[y, x] = sum over (a, b) of kernel[a, b] * image[y + cy - a, x + cx - b]`
/// with `(cy, cx) = kernel_shape / 2` and indices taken modulo the image shape.
pub fn convolve_wrap(image: ArrayView2<'_, f64>, kernel: ArrayView2<'_, f64>) -> Array2<f64> {
    let (height, width) = image.dim();
    let (k_h, k_w) = kernel.dim();
    let (cy, cx) = ((k_h / 2) as isize, (k_w / 2) as isize);
    let (h, w) = (height as isize, width as isize);

    // Wrapped column index per (x, b), shared by every row.
    let columns: Vec<usize> = (0..w)
        .flat_map(|x| (0..k_w as isize).map(move |b| (x + cx - b).rem_euclid(w) as usize))
        .collect();

    Array2::from_shape_fn((height, width), |(y, x)| {
        let mut acc = 0.0;
        for (a, kernel_row) in kernel.rows().into_iter().enumerate() {
            let image_row = image.row((y as isize + cy - a as isize).rem_euclid(h) as usize);
            let cols = &columns[x * k_w..(x + 1) * k_w];
            for (&k, &col) in kernel_row.iter().zip(cols) {
                acc += k * image_row[col];
            }
        }
        acc
    })
}

/// Filters `image` with every kernel of `bank` on `pool`. Maps come back in
/// bank order.
pub fn filter_bank(
    image: ArrayView2<'_, f64>,
    bank: &GaborKernelBank,
    pool: &WorkerPool,
) -> Result<Vec<Array2<f64>>> {
    tracing::info!(
        "Filtering {:?} image with {} kernels on {} workers",
        image.dim(),
        bank.len(),
        pool.workers()
    );
    Ok(pool.map(&bank.kernels, |kernel| convolve_wrap(image, kernel.view()))?)
}
