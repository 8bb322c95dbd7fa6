//! Test fixtures shared across modules.

#![allow(dead_code)]

use ndarray::{Array2, Array3};

/// Installs a test-writer subscriber. Safe to call from every test.
pub fn init_tracing() {
    common::log_setup::init_test_logging();
}

/// `height × width` ramp holding `0, 1, 2, ...` in row-major order.
pub fn ramp_2d(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(y, x)| (y * width + x) as f64)
}

/// `depth × height × width` ramp holding `0, 1, 2, ...` in row-major order.
pub fn ramp_3d(depth: usize, height: usize, width: usize) -> Array3<f64> {
    Array3::from_shape_fn((depth, height, width), |(z, y, x)| {
        ((z * height + y) * width + x) as f64
    })
}

/// Dark left half, bright right half, split at column `width / 2`.
pub fn vertical_step(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(_, x)| if x < width / 2 { 0.0 } else { 1.0 })
}
