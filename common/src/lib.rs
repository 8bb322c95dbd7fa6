//! Utilities shared by the featuremaps workspace crates.

pub mod float_ext;
pub mod log_setup;
pub mod parallel;

/// Default absolute tolerance of [`float_ext::FloatExt::approximately_eq`].
pub const EPSILON: f64 = 1e-6;
