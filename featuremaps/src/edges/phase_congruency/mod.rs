//! Phase congruency from a bank of log-Gabor quadrature filters.
//!
//! Each orientation filters the image at `nscale` wavelengths in the
//! frequency domain. Where the local phases of all scales agree, the summed
//! response energy approaches the summed amplitude and phase congruency
//! approaches 1, independent of contrast. Per orientation:
//!
//! 1. Energy is projected on the mean phase direction and penalized by the
//!    phase deviation, then reduced by a noise threshold `T` estimated from
//!    the smallest-scale amplitude.
//! 2. The result is normalized by the summed amplitude and weighted by a
//!    sigmoid of the frequency spread, which suppresses responses that only
//!    a single scale supports.
//!
//! The per-orientation maps are combined through their second moments:
//! the maximum moment `M` marks edges, the minimum moment `m` marks corners
//! and blobs.

mod fft;
mod filters;

#[cfg(test)]
mod tests;

use std::f64::consts::PI;

use common::parallel::WorkerPool;
use ndarray::{Array2, ArrayView2, Zip};
use rustfft::num_complex::Complex64;

use self::fft::Fft2d;
use self::filters::{median, rayleigh_mode, FrequencyGrid};
use super::config::{NoiseMethod, PhaseCongruencyConfig};
use crate::error::{Error, Result};

const EPSILON: f64 = 1e-4;

/// Computes phase congruency maps of a 2D image.
pub trait PhaseCongruencyPrimitive: Sync {
    fn compute(
        &self,
        image: ArrayView2<'_, f64>,
        config: &PhaseCongruencyConfig,
    ) -> Result<PhaseCongruency>;
}

/// Outputs of a phase congruency computation. All maps have the image
/// shape.
#[derive(Debug, Clone)]
pub struct PhaseCongruency {
    /// Maximum moment of the phase congruency covariance. Edge strength.
    pub max_moment: Array2<f64>,
    /// Minimum moment of the phase congruency covariance. Corner and blob
    /// strength.
    pub min_moment: Array2<f64>,
    /// Feature orientation in degrees, in `[0, 180)`.
    pub orientation: Array2<f64>,
    /// Local weighted mean phase angle: `pi / 2` for bright lines, `-pi / 2`
    /// for dark lines, 0 for steps.
    pub feature_type: Array2<f64>,
    /// Phase congruency of each orientation.
    pub pc: Vec<Array2<f64>>,
    /// Complex filter responses, indexed `[orientation][scale]`.
    pub eo: Vec<Vec<Array2<Complex64>>>,
    /// Noise threshold of the last orientation.
    pub threshold: f64,
}

/// Kovesi's phase congruency with log-Gabor filters, one orientation per
/// pool task.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogGaborPhaseCongruency {
    pool: WorkerPool,
}

impl LogGaborPhaseCongruency {
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }
}

impl PhaseCongruencyPrimitive for LogGaborPhaseCongruency {
    fn compute(
        &self,
        image: ArrayView2<'_, f64>,
        config: &PhaseCongruencyConfig,
    ) -> Result<PhaseCongruency> {
        config.validate()?;
        if image.is_empty() {
            return Err(Error::EmptyImage);
        }

        let (rows, cols) = image.dim();
        let fft = Fft2d::new(rows, cols);
        let bank = FilterBank {
            config,
            grid: FrequencyGrid::new(rows, cols, config),
            spectrum: fft.forward(image),
            fft,
        };

        tracing::debug!(
            "Phase congruency: {}x{} image, {} scales, {} orientations, noise {}",
            rows,
            cols,
            config.nscale,
            config.norient,
            config.noise_method
        );

        let orientations: Vec<usize> = (0..config.norient).collect();
        let responses = self.pool.map(&orientations, |&o| bank.orientation(o))?;

        Ok(combine(responses, config.norient, (rows, cols)))
    }
}

/// Filtering state shared by every orientation task.
struct FilterBank<'a> {
    config: &'a PhaseCongruencyConfig,
    grid: FrequencyGrid,
    spectrum: Array2<Complex64>,
    fft: Fft2d,
}

struct OrientationResponse {
    angle: f64,
    pc: Array2<f64>,
    eo: Vec<Array2<Complex64>>,
    sum_e: Array2<f64>,
    sum_o: Array2<f64>,
    threshold: f64,
}

impl FilterBank<'_> {
    fn orientation(&self, index: usize) -> OrientationResponse {
        let config = self.config;
        let angle = index as f64 * PI / config.norient as f64;
        let spread = self.grid.spread(angle, config.norient);

        let shape = self.spectrum.raw_dim();
        let mut sum_e = Array2::<f64>::zeros(shape);
        let mut sum_o = Array2::<f64>::zeros(shape);
        let mut sum_an = Array2::<f64>::zeros(shape);
        let mut max_an = Array2::<f64>::zeros(shape);
        let mut tau = 0.0;
        let mut eo = Vec::with_capacity(config.nscale);

        for scale in 0..config.nscale {
            let filtered = Zip::from(&self.spectrum)
                .and(self.grid.log_gabor(scale))
                .and(&spread)
                .map_collect(|&c, &radial, &angular| c * (radial * angular));
            let response = self.fft.inverse(filtered);

            Zip::from(&mut sum_e)
                .and(&mut sum_o)
                .and(&mut sum_an)
                .and(&mut max_an)
                .and(&response)
                .for_each(|e, o, an, max, c| {
                    let amplitude = c.norm();
                    *e += c.re;
                    *o += c.im;
                    *an += amplitude;
                    *max = max.max(amplitude);
                });

            if scale == 0 {
                let amplitudes: Vec<f64> = sum_an.iter().copied().collect();
                tau = match config.noise_method {
                    NoiseMethod::Median => median(amplitudes) / 4f64.ln().sqrt(),
                    NoiseMethod::RayleighMode => rayleigh_mode(&amplitudes),
                    NoiseMethod::Fixed(_) => 0.0,
                };
            }
            eo.push(response);
        }

        let threshold = match config.noise_method {
            NoiseMethod::Fixed(threshold) => threshold,
            NoiseMethod::Median | NoiseMethod::RayleighMode => {
                // Noise energy of `nscale` Rayleigh-distributed amplitudes
                // shrinking by `1 / mult` per scale.
                let inv_mult = 1.0 / config.mult;
                let total_tau =
                    tau * (1.0 - inv_mult.powi(config.nscale as i32)) / (1.0 - inv_mult);
                let noise_mean = total_tau * (PI / 2.0).sqrt();
                let noise_sigma = total_tau * ((4.0 - PI) / 2.0).sqrt();
                noise_mean + config.k * noise_sigma
            }
        };

        // Phase deviation weighted energy against the mean phase direction.
        let mut energy = Array2::<f64>::zeros(shape);
        for response in &eo {
            Zip::from(&mut energy)
                .and(response)
                .and(&sum_e)
                .and(&sum_o)
                .for_each(|acc, c, &se, &so| {
                    let norm = se.hypot(so) + EPSILON;
                    let (mean_e, mean_o) = (se / norm, so / norm);
                    let deviation = (c.re * mean_o - c.im * mean_e).abs();
                    *acc += c.re * mean_e + c.im * mean_o - deviation;
                });
        }

        let scale_span = (config.nscale - 1) as f64;
        let pc = Zip::from(&energy)
            .and(&sum_an)
            .and(&max_an)
            .map_collect(|&energy, &an, &max| {
                let energy = (energy - threshold).max(0.0);
                let width = (an / (max + EPSILON) - 1.0) / scale_span;
                let weight = 1.0 / (1.0 + (config.g * (config.cut_off - width)).exp());
                weight * energy / (an + EPSILON)
            });

        OrientationResponse {
            angle,
            pc,
            eo,
            sum_e,
            sum_o,
            threshold,
        }
    }
}

/// Folds orientation responses, in orientation order, into moments,
/// orientation and feature type.
fn combine(
    responses: Vec<OrientationResponse>,
    norient: usize,
    shape: (usize, usize),
) -> PhaseCongruency {
    let mut even = Array2::<f64>::zeros(shape);
    let mut odd_x = Array2::<f64>::zeros(shape);
    let mut odd_y = Array2::<f64>::zeros(shape);
    let mut cov_x2 = Array2::<f64>::zeros(shape);
    let mut cov_y2 = Array2::<f64>::zeros(shape);
    let mut cov_xy = Array2::<f64>::zeros(shape);

    let mut pc = Vec::with_capacity(responses.len());
    let mut eo = Vec::with_capacity(responses.len());
    let mut threshold = 0.0;

    for response in responses {
        let (sin_angle, cos_angle) = response.angle.sin_cos();

        Zip::from(&mut even)
            .and(&mut odd_x)
            .and(&mut odd_y)
            .and(&response.sum_e)
            .and(&response.sum_o)
            .for_each(|even, odd_x, odd_y, &se, &so| {
                *even += se;
                *odd_x += cos_angle * so;
                *odd_y += sin_angle * so;
            });

        Zip::from(&mut cov_x2)
            .and(&mut cov_y2)
            .and(&mut cov_xy)
            .and(&response.pc)
            .for_each(|x2, y2, xy, &pc| {
                let (cx, cy) = (pc * cos_angle, pc * sin_angle);
                *x2 += cx * cx;
                *y2 += cy * cy;
                *xy += cx * cy;
            });

        threshold = response.threshold;
        pc.push(response.pc);
        eo.push(response.eo);
    }

    let n = norient as f64;
    let mut max_moment = Array2::<f64>::zeros(shape);
    let mut min_moment = Array2::<f64>::zeros(shape);
    Zip::from(&mut max_moment)
        .and(&mut min_moment)
        .and(&cov_x2)
        .and(&cov_y2)
        .and(&cov_xy)
        .for_each(|max, min, &x2, &y2, &xy| {
            let (x2, y2, xy) = (x2 * 2.0 / n, y2 * 2.0 / n, xy * 4.0 / n);
            let denom = xy.hypot(x2 - y2) + EPSILON;
            *max = (y2 + x2 + denom) / 2.0;
            *min = (y2 + x2 - denom) / 2.0;
        });

    let orientation = Zip::from(&odd_x).and(&odd_y).map_collect(|&ox, &oy| {
        let mut angle = oy.atan2(ox);
        if angle < 0.0 {
            angle += PI;
        }
        if angle >= PI {
            angle -= PI;
        }
        angle.to_degrees()
    });

    let feature_type = Zip::from(&even)
        .and(&odd_x)
        .and(&odd_y)
        .map_collect(|&e, &ox, &oy| e.atan2(ox.hypot(oy)));

    PhaseCongruency {
        max_moment,
        min_moment,
        orientation,
        feature_type,
        pc,
        eo,
        threshold,
    }
}
