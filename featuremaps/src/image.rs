//! Input image conversion and validation shared by the extraction facades.

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use num_traits::AsPrimitive;

use crate::error::{Error, Result};

/// Spatial rank of an accepted input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRank {
    /// height × width
    Planar,
    /// depth × height × width
    Volumetric,
}

impl ImageRank {
    /// Classifies `shape`, rejecting ranks other than 2 and 3 and empty images.
    pub fn of(shape: &[usize]) -> Result<Self> {
        let rank = match shape.len() {
            2 => Self::Planar,
            3 => Self::Volumetric,
            ndim => {
                return Err(Error::UnsupportedDimension {
                    ndim,
                    reason: "only 2D and 3D images are supported",
                })
            }
        };
        if shape.contains(&0) {
            return Err(Error::EmptyImage);
        }
        Ok(rank)
    }

    #[inline]
    pub fn ndim(self) -> usize {
        match self {
            Self::Planar => 2,
            Self::Volumetric => 3,
        }
    }

    /// Fails with `UnsupportedDimension` unless the image is 2D.
    pub(crate) fn require_planar(self, reason: &'static str) -> Result<()> {
        match self {
            Self::Planar => Ok(()),
            Self::Volumetric => Err(Error::UnsupportedDimension {
                ndim: self.ndim(),
                reason,
            }),
        }
    }
}

/// Copies any numeric array into a dynamic-rank `f64` array.
pub(crate) fn to_f64<S, D, A>(image: &ArrayBase<S, D>) -> ArrayD<f64>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: AsPrimitive<f64>,
{
    image.mapv(|v| v.as_()).into_dyn()
}

/// Minimum and maximum sample. The image must not be empty.
pub(crate) fn min_max(image: &ArrayD<f64>) -> (f64, f64) {
    image
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
