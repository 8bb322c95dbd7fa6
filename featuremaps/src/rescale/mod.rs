//! Linear gray-level quantization ahead of co-occurrence statistics.
//!
//! `level = round((x - min) * levels / (max - min))`, rounding half to even.
//! Samples inside `[min, max]` land in `0..=levels`; samples outside the
//! range are not clamped.

#[cfg(test)]
mod tests;

use ndarray::{Array, ArrayBase, ArrayD, Data, Dimension};
use num_traits::AsPrimitive;

use crate::error::{Error, Result};
use crate::image::{min_max, to_f64};

/// Validated quantization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayLevelRescaler {
    levels: f64,
    min: f64,
    max: f64,
    scale: f64,
}

impl GrayLevelRescaler {
    /// Fails with `InvalidRange` if `min > max` and with `DivisionByZero` if
    /// `min == max`.
    pub fn new(levels: f64, (min, max): (f64, f64)) -> Result<Self> {
        if !levels.is_finite() || levels < 0.0 {
            return Err(Error::invalid_parameter(
                "n_gray_levels",
                format!("must be finite and non-negative, got {levels}"),
            ));
        }
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        if min == max {
            return Err(Error::DivisionByZero { value: min });
        }

        Ok(Self {
            levels,
            min,
            max,
            scale: levels / (max - min),
        })
    }

    /// Fills unset parameters from the image: `levels = max(image)`,
    /// limits `= (min(image), max(image))`.
    pub fn with_image_defaults(
        image: &ArrayD<f64>,
        levels: Option<f64>,
        limits: Option<(f64, f64)>,
    ) -> Result<Self> {
        if image.is_empty() {
            return Err(Error::EmptyImage);
        }
        let (lo, hi) = min_max(image);
        Self::new(levels.unwrap_or(hi), limits.unwrap_or((lo, hi)))
    }

    #[inline]
    pub fn levels(&self) -> f64 {
        self.levels
    }

    #[inline]
    pub fn limits(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    pub fn rescale_value(&self, value: f64) -> i64 {
        ((value - self.min) * self.scale).round_ties_even() as i64
    }

    pub fn rescale<S, D, A>(&self, image: &ArrayBase<S, D>) -> Array<i64, D>
    where
        S: Data<Elem = A>,
        D: Dimension,
        A: AsPrimitive<f64>,
    {
        image.mapv(|v| self.rescale_value(v.as_()))
    }
}

/// One-shot rescale with image-derived defaults for unset parameters.
pub fn rescale_gray_levels<S, D, A>(
    image: &ArrayBase<S, D>,
    levels: Option<f64>,
    limits: Option<(f64, f64)>,
) -> Result<ArrayD<i64>>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
{
    let image = to_f64(image);
    let rescaler = GrayLevelRescaler::with_image_defaults(&image, levels, limits)?;
    Ok(rescaler.rescale(&image))
}
