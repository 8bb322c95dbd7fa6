//! Separable Sobel and Prewitt derivative operators for N-d images.
//!
//! The derivative along one axis correlates that axis with `[-1, 0, 1]` and
//! every other axis with the operator's smoothing kernel. Borders are
//! reflected about the half-sample (`d c b a | a b c d | d c b a`).

use ndarray::{ArrayD, Axis, Zip};
use serde::{Deserialize, Serialize};

const DERIVATIVE: [f64; 3] = [-1.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivativeOperator {
    /// Smoothing kernel `[1, 2, 1]`.
    Sobel,
    /// Smoothing kernel `[1, 1, 1]`.
    Prewitt,
}

impl DerivativeOperator {
    #[inline]
    pub fn smoothing(self) -> [f64; 3] {
        match self {
            Self::Sobel => [1.0, 2.0, 1.0],
            Self::Prewitt => [1.0, 1.0, 1.0],
        }
    }

    /// First derivative along `axis`.
    pub fn derivative(self, image: &ArrayD<f64>, axis: usize) -> ArrayD<f64> {
        self.smooth_except(correlate_axis(image, axis, DERIVATIVE), axis)
    }

    /// Second derivative along `axis`: the derivative kernel applied twice
    /// along `axis`, the smoothing kernel once along every other axis.
    pub fn second_derivative(self, image: &ArrayD<f64>, axis: usize) -> ArrayD<f64> {
        let twice = correlate_axis(&correlate_axis(image, axis, DERIVATIVE), axis, DERIVATIVE);
        self.smooth_except(twice, axis)
    }

    /// `sqrt(sum over axes of derivative^2)`.
    pub fn gradient_magnitude(self, image: &ArrayD<f64>) -> ArrayD<f64> {
        let mut sum_sq = ArrayD::<f64>::zeros(image.raw_dim());
        for axis in 0..image.ndim() {
            let derivative = self.derivative(image, axis);
            Zip::from(&mut sum_sq)
                .and(&derivative)
                .for_each(|acc, &d| *acc += d * d);
        }
        sum_sq.mapv_inplace(f64::sqrt);
        sum_sq
    }

    /// Laplacian-style response: sum over axes of the second derivative.
    pub fn second_derivative_sum(self, image: &ArrayD<f64>) -> ArrayD<f64> {
        let mut sum = ArrayD::<f64>::zeros(image.raw_dim());
        for axis in 0..image.ndim() {
            sum += &self.second_derivative(image, axis);
        }
        sum
    }

    fn smooth_except(self, mut image: ArrayD<f64>, skip: usize) -> ArrayD<f64> {
        let smoothing = self.smoothing();
        for axis in (0..image.ndim()).filter(|&axis| axis != skip) {
            image = correlate_axis(&image, axis, smoothing);
        }
        image
    }
}

/// 3-tap correlation along one axis with reflected borders.
fn correlate_axis(input: &ArrayD<f64>, axis: usize, weights: [f64; 3]) -> ArrayD<f64> {
    let mut output = ArrayD::<f64>::zeros(input.raw_dim());
    if input.is_empty() {
        return output;
    }
    Zip::from(output.lanes_mut(Axis(axis)))
        .and(input.lanes(Axis(axis)))
        .for_each(|mut out, lane| {
            let last = lane.len() - 1;
            for i in 0..=last {
                // Half-sample reflection of a 3-tap window repeats the edge sample.
                let prev = lane[i.saturating_sub(1)];
                let next = lane[(i + 1).min(last)];
                out[i] = weights[0] * prev + weights[1] * lane[i] + weights[2] * next;
            }
        });
    output
}
