use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Planned 2D transforms for one image shape, by row-column decomposition.
/// The inverse is normalized by `1 / (rows * cols)`.
pub(super) struct Fft2d {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    pub(super) fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    pub(super) fn forward(&self, image: ArrayView2<'_, f64>) -> Array2<Complex64> {
        let mut data = image.mapv(|v| Complex64::new(v, 0.0));
        transform(&mut data, &*self.row_forward, &*self.col_forward);
        data
    }

    pub(super) fn inverse(&self, mut spectrum: Array2<Complex64>) -> Array2<Complex64> {
        transform(&mut spectrum, &*self.row_inverse, &*self.col_inverse);
        let norm = 1.0 / (self.rows * self.cols) as f64;
        spectrum.mapv_inplace(|c| c * norm);
        spectrum
    }
}

fn transform(data: &mut Array2<Complex64>, along_rows: &dyn Fft<f64>, along_cols: &dyn Fft<f64>) {
    let mut buffer = Vec::with_capacity(data.nrows().max(data.ncols()));
    for (axis, fft) in [(Axis(1), along_rows), (Axis(0), along_cols)] {
        for mut lane in data.lanes_mut(axis) {
            buffer.clear();
            buffer.extend(lane.iter().copied());
            fft.process(&mut buffer);
            lane.iter_mut().zip(&buffer).for_each(|(dst, &src)| *dst = src);
        }
    }
}
