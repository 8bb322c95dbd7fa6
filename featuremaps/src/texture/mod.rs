//! Per-patch texture primitives.
//!
//! The map pipeline only depends on [`TexturePrimitive`]; [`Haralick`] is the
//! default implementation: gray-level co-occurrence statistics computed per
//! direction, one feature row per direction.

mod cooccurrence;
mod statistics;


use ndarray::{Array2, ArrayViewD};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use cooccurrence::{DIRECTIONS_2D, DIRECTIONS_3D};

/// Maps one gray-level patch to a fixed-shape `(rows, statistics)` array.
///
/// Implementations must be pure: the output depends only on the patch, and
/// every patch of the same rank yields the same output shape.
pub trait TexturePrimitive: Sync {
    fn compute(&self, patch: ArrayViewD<'_, i64>) -> Result<Array2<f64>>;
}

impl<F> TexturePrimitive for F
where
    F: Fn(ArrayViewD<'_, i64>) -> Result<Array2<f64>> + Sync,
{
    fn compute(&self, patch: ArrayViewD<'_, i64>) -> Result<Array2<f64>> {
        self(patch)
    }
}

/// Number of Haralick statistics without the maximal correlation coefficient.
pub const BASE_STATISTICS: usize = 13;

/// Haralick texture statistics over symmetric co-occurrence matrices.
///
/// 2D patches use the 4 directions of [`DIRECTIONS_2D`], 3D patches the 13
/// of [`DIRECTIONS_3D`]. Rows of the output follow that direction order; the
/// columns are:
///
/// | # | statistic |
/// |---|-----------|
/// | 0 | angular second moment |
/// | 1 | contrast |
/// | 2 | correlation |
/// | 3 | sum of squares: variance |
/// | 4 | inverse difference moment |
/// | 5 | sum average |
/// | 6 | sum variance |
/// | 7 | sum entropy |
/// | 8 | entropy |
/// | 9 | difference variance |
/// | 10 | difference entropy |
/// | 11 | information measure of correlation 1 |
/// | 12 | information measure of correlation 2 |
/// | 13 | maximal correlation coefficient (when enabled) |
///
/// A direction without any voxel pair inside the patch yields a zero row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Haralick {
    /// Step between paired samples along each direction.
    pub distance: usize,
    /// Drop pairs involving gray level 0 (useful for masked images).
    pub ignore_zeros: bool,
    /// Append the maximal correlation coefficient as the 14th statistic.
    pub compute_14th_feature: bool,
}

impl Default for Haralick {
    fn default() -> Self {
        Self {
            distance: 1,
            ignore_zeros: false,
            compute_14th_feature: true,
        }
    }
}

impl Haralick {
    pub fn validate(&self) -> Result<()> {
        if self.distance == 0 {
            return Err(Error::invalid_parameter("distance", "must be at least 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn n_statistics(&self) -> usize {
        if self.compute_14th_feature {
            BASE_STATISTICS + 1
        } else {
            BASE_STATISTICS
        }
    }

    /// Output shape for patches of rank `ndim`.
    pub fn output_shape(&self, ndim: usize) -> Result<(usize, usize)> {
        Ok((directions(ndim)?.len(), self.n_statistics()))
    }
}

impl TexturePrimitive for Haralick {
    fn compute(&self, patch: ArrayViewD<'_, i64>) -> Result<Array2<f64>> {
        let directions = directions(patch.ndim())?;

        let mut max_level = 0i64;
        for &level in patch.iter() {
            if level < 0 {
                return Err(Error::NegativeGrayLevel(level));
            }
            max_level = max_level.max(level);
        }
        let n_levels = max_level as usize + 1;

        let mut features = Array2::zeros((directions.len(), self.n_statistics()));
        for (offset, row) in directions.iter().zip(features.rows_mut()) {
            let mut counts =
                cooccurrence::symmetric_counts(&patch, offset, self.distance, n_levels);
            if self.ignore_zeros {
                counts.row_mut(0).fill(0.0);
                counts.column_mut(0).fill(0.0);
            }
            statistics::haralick_row(&counts, self.compute_14th_feature, row);
        }
        Ok(features)
    }
}

fn directions(ndim: usize) -> Result<&'static [&'static [isize]]> {
    match ndim {
        2 => Ok(DIRECTIONS_2D),
        3 => Ok(DIRECTIONS_3D),
        _ => Err(Error::UnsupportedDimension {
            ndim,
            reason: "texture statistics are defined for 2D and 3D patches",
        }),
    }
}
